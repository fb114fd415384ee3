/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Account endpoints (register, login) and user management
/// - `tasks`: Task CRUD
/// - `habits`: Habit CRUD and completion stats
/// - `notes`: Note CRUD
/// - `daily_goals`: Daily goal CRUD

pub mod health;
pub mod users;
pub mod tasks;
pub mod habits;
pub mod notes;
pub mod daily_goals;

use crate::error::{ApiError, ApiResult};
use daydash_shared::auth::policy::{self, Actor};
use daydash_shared::models::Page;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Confirmation body returned by delete endpoints
#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Common pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Resolves a resource and checks the actor may touch it
///
/// Existence is checked before permission: a missing resource is 404 for
/// everyone, and only an existing resource someone else owns is 403.
fn authorize_found<T>(
    actor: &Actor,
    resource: Option<T>,
    owner_of: impl Fn(&T) -> Uuid,
    not_found: &str,
) -> ApiResult<T> {
    let resource = resource.ok_or_else(|| ApiError::NotFound(not_found.to_string()))?;
    policy::authorize(actor, owner_of(&resource))?;
    Ok(resource)
}

/// Checks the actor holds the admin role
fn require_admin(actor: &Actor) -> ApiResult<()> {
    policy::require_admin(actor)?;
    Ok(())
}

/// Confirms a user row exists, for admin listings keyed by user
async fn ensure_user_exists(pool: &PgPool, user_id: Uuid) -> ApiResult<()> {
    daydash_shared::models::user::User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use daydash_shared::models::user::Role;

    #[test]
    fn test_authorize_found_missing_is_not_found() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::Customer,
        };
        let result = authorize_found(&actor, None::<(Uuid,)>, |r| r.0, "Task not found");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_authorize_found_foreign_resource_is_forbidden() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::Customer,
        };
        let foreign = (Uuid::new_v4(),);
        let result = authorize_found(&actor, Some(foreign), |r| r.0, "Task not found");
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_authorize_found_admin_passes() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let foreign = (Uuid::new_v4(),);
        assert!(authorize_found(&actor, Some(foreign), |r| r.0, "Task not found").is_ok());
    }
}
