/// Authentication and authorization utilities
///
/// This module provides the security primitives for daydash:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`policy`]: The ownership-or-admin access-control policy
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with a per-call random salt
/// - **JWT Tokens**: HS256 signing with a 24-hour lifetime
/// - **Constant-time Comparison**: Password verification never leaks timing
///
/// # Example
///
/// ```no_run
/// use daydash_shared::auth::password::{hash_password, verify_password};
/// use daydash_shared::auth::jwt::{create_token, Claims};
/// use daydash_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let claims = Claims::new(Uuid::new_v4(), Role::Customer);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
pub mod policy;
