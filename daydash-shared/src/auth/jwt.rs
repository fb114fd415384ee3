/// JWT token generation and validation module
///
/// Session tokens are signed with HS256 (HMAC-SHA256) using a process-wide
/// secret provided by configuration. Every token carries the subject user
/// id and the user's role, and expires exactly 24 hours after issuance.
/// There is no refresh or revocation mechanism: an expired token requires a
/// fresh login, and a compromised secret requires rotation.
///
/// # Example
///
/// ```
/// use daydash_shared::auth::jwt::{create_token, validate_token, Claims};
/// use daydash_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, Role::Customer);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Issuer claim stamped on and required from every token
const ISSUER: &str = "daydash";

/// Session token lifetime
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, malformed token, or missing claims
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: Subject (user ID)
/// - `role`: The user's role at issuance time
/// - `iss`: Issuer (always "daydash")
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration, 24 hours after `iat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Role carried as a bearer claim; authorization trusts this value
    /// for the token's lifetime
    pub role: Role,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring 24 hours from now
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self::with_expiration(user_id, role, Duration::hours(TOKEN_LIFETIME_HOURS))
    }

    /// Creates claims with a custom expiration, used by tests to produce
    /// already-expired tokens
    pub fn with_expiration(user_id: Uuid, role: Role, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, the expiration, and the issuer.
///
/// # Errors
///
/// - `JwtError::Expired` if the current time is at or past the `exp` claim
/// - `JwtError::Invalid` for a bad signature, wrong issuer, or missing claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    // No grace period: the token is dead the moment `exp` passes
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Role::Admin);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "daydash");
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_HOURS * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, Role::Customer);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, Role::Customer);
        assert_eq!(validated.iss, "daydash");
    }

    #[test]
    fn test_role_claim_roundtrip() {
        for role in [Role::Customer, Role::Admin] {
            let claims = Claims::new(Uuid::new_v4(), role);
            let token = create_token(&claims, SECRET).unwrap();
            let validated = validate_token(&token, SECRET).unwrap();
            assert_eq!(validated.role, role);
        }
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), Role::Customer);
        let token = create_token(&claims, "secret-one-at-least-32-bytes-long!!").unwrap();

        let result = validate_token(&token, "wrong-secret-at-least-32-bytes-long");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // Token that expired an hour ago
        let claims =
            Claims::with_expiration(Uuid::new_v4(), Role::Customer, Duration::seconds(-3600));

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_just_expired_token() {
        // Expired only seconds ago; a default leeway would still accept it
        let claims =
            Claims::with_expiration(Uuid::new_v4(), Role::Customer, Duration::seconds(-5));

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.jwt", SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }
}
