/// Habit endpoints
///
/// # Endpoints
///
/// - `POST /api/habits` - Create a habit
/// - `GET /api/habits` - List own habits
/// - `GET /api/habits/stats` - Completion counts for own habits
/// - `GET /api/habits/:id` - Fetch a habit (owner or admin)
/// - `PUT /api/habits/:id` - Update a habit (owner or admin)
/// - `DELETE /api/habits/:id` - Delete a habit (owner or admin)
/// - `GET /api/admin/habits` - List all habits (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{authorize_found, require_admin, MessageResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use daydash_shared::{
    auth::policy::Actor,
    models::double_option,
    models::habit::{CreateHabit, Habit, HabitFilter, HabitStats, UpdateHabit},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request for a habit
#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Update request for a habit
///
/// Applies the same field constraints as create to whichever fields are
/// present. `description` distinguishes absent from explicit null, and the
/// inner value is bounded when one is supplied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<Option<String>>,

    pub is_completed: Option<bool>,
}

impl UpdateHabitRequest {
    fn into_update(self) -> UpdateHabit {
        UpdateHabit {
            title: self.title,
            description: self.description,
            is_completed: self.is_completed,
        }
    }
}

/// List query parameters for habits
#[derive(Debug, Default, Deserialize)]
pub struct HabitListQuery {
    pub completed: Option<bool>,
    pub search: Option<String>,

    /// Restrict to one user's habits; admin listings only
    pub user_id: Option<Uuid>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl HabitListQuery {
    fn filter(&self) -> HabitFilter {
        HabitFilter {
            completed: self.completed,
            search: self.search.clone(),
        }
    }

    fn page(&self) -> daydash_shared::models::Page {
        daydash_shared::models::Page::new(self.limit, self.offset)
    }
}

/// Create a habit owned by the authenticated user
pub async fn create_habit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateHabitRequest>,
) -> ApiResult<(StatusCode, Json<Habit>)> {
    req.validate()?;

    let habit = Habit::create(
        &state.db,
        CreateHabit {
            user_id: actor.id,
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// List the authenticated user's habits
pub async fn list_habits(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<HabitListQuery>,
) -> ApiResult<Json<Vec<Habit>>> {
    let habits = Habit::list(&state.db, Some(actor.id), &query.filter(), query.page()).await?;
    Ok(Json(habits))
}

/// Completion counts for the authenticated user's habits
pub async fn habit_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<HabitStats>> {
    let stats = Habit::stats(&state.db, actor.id).await?;
    Ok(Json(stats))
}

/// Fetch a habit by ID (owner or admin)
pub async fn get_habit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Habit>> {
    let habit = Habit::find_by_id(&state.db, id).await?;
    let habit = authorize_found(&actor, habit, |h| h.user_id, "Habit not found")?;
    Ok(Json(habit))
}

/// Update a habit (owner or admin)
///
/// Flipping `is_completed` moves `completed_at` with it; the timestamp
/// itself cannot be set by the client.
pub async fn update_habit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateHabitRequest>,
) -> ApiResult<Json<Habit>> {
    req.validate()?;

    let habit = Habit::find_by_id(&state.db, id).await?;
    authorize_found(&actor, habit, |h| h.user_id, "Habit not found")?;

    let updated = Habit::update(&state.db, id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Habit not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a habit (owner or admin)
pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let habit = Habit::find_by_id(&state.db, id).await?;
    authorize_found(&actor, habit, |h| h.user_id, "Habit not found")?;

    Habit::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Habit deleted successfully")))
}

/// List habits across all users (admin only)
pub async fn list_all_habits(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<HabitListQuery>,
) -> ApiResult<Json<Vec<Habit>>> {
    require_admin(&actor)?;

    let habits = Habit::list(&state.db, query.user_id, &query.filter(), query.page()).await?;
    Ok(Json(habits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_habit_request_allows_missing_description() {
        let req: CreateHabitRequest =
            serde_json::from_str(r#"{"title": "drink water"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.description.is_none());
    }

    #[test]
    fn test_update_habit_request_enforces_create_constraints() {
        // Over-limit title rejected
        let req: UpdateHabitRequest =
            serde_json::from_str(&format!(r#"{{"title": "{}"}}"#, "x".repeat(201))).unwrap();
        assert!(req.validate().is_err());

        // Over-limit description inside an explicit value rejected
        let req: UpdateHabitRequest =
            serde_json::from_str(&format!(r#"{{"description": "{}"}}"#, "d".repeat(501)))
                .unwrap();
        assert!(req.validate().is_err());

        // Explicit null clears and validates fine
        let req: UpdateHabitRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.into_update().description, Some(None));
    }

    #[test]
    fn test_create_habit_request_rejects_long_title() {
        let req = CreateHabitRequest {
            title: "x".repeat(201),
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
