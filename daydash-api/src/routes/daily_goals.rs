/// Daily goal endpoints
///
/// # Endpoints
///
/// - `POST /api/daily-goals` - Create a daily goal
/// - `GET /api/daily-goals` - List own daily goals
/// - `GET /api/daily-goals/:id` - Fetch a goal (owner or admin)
/// - `PUT /api/daily-goals/:id` - Update a goal (owner or admin)
/// - `DELETE /api/daily-goals/:id` - Delete a goal (owner or admin)
/// - `GET /api/users/:id/daily-goals` - List one user's goals (self or admin)
/// - `GET /api/admin/daily-goals` - List all goals (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{authorize_found, ensure_user_exists, require_admin, MessageResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use daydash_shared::{
    auth::policy::{self, Actor},
    models::daily_goal::{CreateDailyGoal, DailyGoal, DailyGoalFilter, UpdateDailyGoal},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request for a daily goal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDailyGoalRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,

    pub goal_date: NaiveDate,
}

/// Update request for a daily goal
///
/// Applies the same field constraints as create to whichever fields are
/// present.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDailyGoalRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: Option<String>,

    pub goal_date: Option<NaiveDate>,

    pub is_completed: Option<bool>,
}

impl UpdateDailyGoalRequest {
    fn into_update(self) -> UpdateDailyGoal {
        UpdateDailyGoal {
            title: self.title,
            description: self.description,
            goal_date: self.goal_date,
            is_completed: self.is_completed,
        }
    }
}

/// List query parameters for daily goals
#[derive(Debug, Default, Deserialize)]
pub struct DailyGoalListQuery {
    pub completed: Option<bool>,
    pub search: Option<String>,
    pub goal_date: Option<NaiveDate>,

    /// Restrict to one user's goals; admin listings only
    pub user_id: Option<Uuid>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl DailyGoalListQuery {
    fn filter(&self) -> DailyGoalFilter {
        DailyGoalFilter {
            completed: self.completed,
            search: self.search.clone(),
            goal_date: self.goal_date,
        }
    }

    fn page(&self) -> daydash_shared::models::Page {
        daydash_shared::models::Page::new(self.limit, self.offset)
    }
}

/// Create a daily goal owned by the authenticated user
pub async fn create_daily_goal(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateDailyGoalRequest>,
) -> ApiResult<(StatusCode, Json<DailyGoal>)> {
    req.validate()?;

    let goal = DailyGoal::create(
        &state.db,
        CreateDailyGoal {
            user_id: actor.id,
            title: req.title,
            description: req.description,
            goal_date: req.goal_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// List the authenticated user's daily goals
pub async fn list_daily_goals(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<DailyGoalListQuery>,
) -> ApiResult<Json<Vec<DailyGoal>>> {
    let goals = DailyGoal::list(&state.db, Some(actor.id), &query.filter(), query.page()).await?;
    Ok(Json(goals))
}

/// List one user's daily goals (self or admin)
///
/// The user must exist before the permission check runs, so an unknown
/// user ID is 404 even for non-admins.
pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<DailyGoalListQuery>,
) -> ApiResult<Json<Vec<DailyGoal>>> {
    ensure_user_exists(&state.db, user_id).await?;
    policy::authorize(&actor, user_id)?;

    let goals = DailyGoal::list(&state.db, Some(user_id), &query.filter(), query.page()).await?;
    Ok(Json(goals))
}

/// Fetch a daily goal by ID (owner or admin)
pub async fn get_daily_goal(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DailyGoal>> {
    let goal = DailyGoal::find_by_id(&state.db, id).await?;
    let goal = authorize_found(&actor, goal, |g| g.user_id, "Daily goal not found")?;
    Ok(Json(goal))
}

/// Update a daily goal (owner or admin)
pub async fn update_daily_goal(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDailyGoalRequest>,
) -> ApiResult<Json<DailyGoal>> {
    req.validate()?;

    let goal = DailyGoal::find_by_id(&state.db, id).await?;
    authorize_found(&actor, goal, |g| g.user_id, "Daily goal not found")?;

    let updated = DailyGoal::update(&state.db, id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Daily goal not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a daily goal (owner or admin)
pub async fn delete_daily_goal(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let goal = DailyGoal::find_by_id(&state.db, id).await?;
    authorize_found(&actor, goal, |g| g.user_id, "Daily goal not found")?;

    DailyGoal::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Daily goal deleted successfully")))
}

/// List daily goals across all users (admin only)
pub async fn list_all_daily_goals(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<DailyGoalListQuery>,
) -> ApiResult<Json<Vec<DailyGoal>>> {
    require_admin(&actor)?;

    let goals = DailyGoal::list(&state.db, query.user_id, &query.filter(), query.page()).await?;
    Ok(Json(goals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_daily_goal_request_enforces_create_constraints() {
        let req: UpdateDailyGoalRequest =
            serde_json::from_str(&format!(r#"{{"title": "{}"}}"#, "x".repeat(101))).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateDailyGoalRequest =
            serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateDailyGoalRequest =
            serde_json::from_str(r#"{"is_completed": true}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.into_update().is_completed, Some(true));
    }

    #[test]
    fn test_daily_goal_query_parses_date() {
        let query: DailyGoalListQuery =
            serde_json::from_str(r#"{"goal_date": "2026-08-30", "completed": false}"#).unwrap();
        assert_eq!(
            query.filter().goal_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 30).unwrap())
        );
        assert_eq!(query.filter().completed, Some(false));
    }
}
