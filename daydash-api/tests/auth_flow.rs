/// Integration tests for the authentication core
///
/// These tests exercise the full credential path as the handlers use it,
/// without a database:
/// - Password hashing and verification
/// - Token issuance and validation
/// - Actor construction and the ownership policy

use daydash_shared::auth::{jwt, password, policy};
use daydash_shared::models::user::Role;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Register-then-login path: hash once, verify later
#[test]
fn test_password_roundtrip_as_handlers_use_it() {
    let hash = password::hash_password("SecureP@ss123").unwrap();

    // Login with the right password succeeds
    assert!(password::verify_password("SecureP@ss123", &hash));

    // Login with the wrong password fails quietly
    assert!(!password::verify_password("wrong-password", &hash));

    // A corrupted stored hash cannot authenticate anyone
    assert!(!password::verify_password("SecureP@ss123", "not-a-phc-string"));
}

/// Token issued at login round-trips through the auth middleware path
#[test]
fn test_token_issue_then_validate() {
    let user_id = Uuid::new_v4();

    let claims = jwt::Claims::new(user_id, Role::Customer);
    let token = jwt::create_token(&claims, SECRET).unwrap();

    let validated = jwt::validate_token(&token, SECRET).unwrap();
    assert_eq!(validated.sub, user_id);
    assert_eq!(validated.role, Role::Customer);

    // The actor handed to handlers carries the same identity
    let actor = policy::Actor::from(&validated);
    assert_eq!(actor.id, user_id);
    assert!(!actor.is_admin());
}

/// A token signed with a different secret never validates
#[test]
fn test_token_rejects_wrong_secret() {
    let claims = jwt::Claims::new(Uuid::new_v4(), Role::Customer);
    let token = jwt::create_token(&claims, SECRET).unwrap();

    let result = jwt::validate_token(&token, "another-secret-also-32-bytes-long!!");
    assert!(matches!(result, Err(jwt::JwtError::Invalid(_))));
}

/// Ownership policy: owners and admins pass, others are rejected
#[test]
fn test_ownership_policy() {
    let owner_id = Uuid::new_v4();

    let owner = policy::Actor {
        id: owner_id,
        role: Role::Customer,
    };
    let stranger = policy::Actor {
        id: Uuid::new_v4(),
        role: Role::Customer,
    };
    let admin = policy::Actor {
        id: Uuid::new_v4(),
        role: Role::Admin,
    };

    assert!(policy::authorize(&owner, owner_id).is_ok());
    assert!(policy::authorize(&stranger, owner_id).is_err());
    assert!(policy::authorize(&admin, owner_id).is_ok());

    assert!(policy::require_admin(&admin).is_ok());
    assert!(policy::require_admin(&owner).is_err());
}

/// An admin token carries the admin role through validation
#[test]
fn test_admin_token_roundtrip() {
    let claims = jwt::Claims::new(Uuid::new_v4(), Role::Admin);
    let token = jwt::create_token(&claims, SECRET).unwrap();

    let validated = jwt::validate_token(&token, SECRET).unwrap();
    let actor = policy::Actor::from(&validated);
    assert!(actor.is_admin());
}
