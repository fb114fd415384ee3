/// Access-control policy
///
/// Every resource in daydash is owned by exactly one user, and the same
/// predicate guards every single-item read, update, and delete across all
/// resource types: the actor may proceed iff they are an ADMIN or they own
/// the resource. List-everything endpoints are admin-only.
///
/// Handlers check existence before permission, so a nonexistent id yields
/// "not found" even to non-owners, while an existing foreign item yields
/// "forbidden".
///
/// # Example
///
/// ```
/// use daydash_shared::auth::policy::{authorize, Actor};
/// use daydash_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let actor = Actor { id: owner, role: Role::Customer };
///
/// assert!(authorize(&actor, owner).is_ok());
/// assert!(authorize(&actor, Uuid::new_v4()).is_err());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::Role;

/// Error type for policy checks
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Actor is neither the resource owner nor an admin
    #[error("Not authorized to access this resource")]
    NotOwner,

    /// Endpoint is restricted to admin users
    #[error("Admin access required")]
    AdminOnly,
}

/// The authenticated identity making a request
///
/// Built from validated token claims by the authentication layer and stored
/// in request extensions; handlers extract it with Axum's `Extension`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Actor {
    /// Authenticated user ID
    pub id: Uuid,

    /// Role carried by the token
    pub role: Role,
}

impl Actor {
    /// Checks whether the actor holds the ADMIN role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// The ownership-or-admin predicate
///
/// Allows iff `actor.role == ADMIN` or `actor.id == resource_owner_id`.
/// Applied before every single-item read, update, and delete.
pub fn authorize(actor: &Actor, resource_owner_id: Uuid) -> Result<(), PolicyError> {
    if actor.is_admin() || actor.id == resource_owner_id {
        return Ok(());
    }

    Err(PolicyError::NotOwner)
}

/// Restricts an endpoint to admin users, regardless of ownership
pub fn require_admin(actor: &Actor) -> Result<(), PolicyError> {
    if actor.is_admin() {
        return Ok(());
    }

    Err(PolicyError::AdminOnly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_authorized() {
        let owner = Uuid::new_v4();
        let actor = Actor {
            id: owner,
            role: Role::Customer,
        };

        assert!(authorize(&actor, owner).is_ok());
    }

    #[test]
    fn test_non_owner_is_denied() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::Customer,
        };

        let result = authorize(&actor, Uuid::new_v4());
        assert!(matches!(result, Err(PolicyError::NotOwner)));
    }

    #[test]
    fn test_admin_can_access_any_resource() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };

        assert!(authorize(&actor, Uuid::new_v4()).is_ok());
        assert!(authorize(&actor, actor.id).is_ok());
    }

    #[test]
    fn test_require_admin() {
        let admin = Actor {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let customer = Actor {
            id: Uuid::new_v4(),
            role: Role::Customer,
        };

        assert!(require_admin(&admin).is_ok());
        assert!(matches!(
            require_admin(&customer),
            Err(PolicyError::AdminOnly)
        ));
    }

    #[test]
    fn test_actor_from_claims() {
        let claims = crate::auth::jwt::Claims::new(Uuid::new_v4(), Role::Admin);
        let actor = Actor::from(&claims);

        assert_eq!(actor.id, claims.sub);
        assert_eq!(actor.role, Role::Admin);
        assert!(actor.is_admin());
    }
}
