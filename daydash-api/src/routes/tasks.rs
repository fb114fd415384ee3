/// Task endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create a task
/// - `GET /api/tasks` - List own tasks
/// - `GET /api/tasks/:id` - Fetch a task (owner or admin)
/// - `PUT /api/tasks/:id` - Update a task (owner or admin)
/// - `DELETE /api/tasks/:id` - Delete a task (owner or admin)
/// - `GET /api/admin/tasks` - List all tasks (admin)

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
use chrono::{DateTime, Utc};
use daydash_shared::{
    auth::policy::Actor,
    models::double_option,
    models::task::{CreateTask, Task, TaskFilter, UpdateTask},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request for a task
///
/// Completion state is not accepted here; tasks always start incomplete.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    pub due_date: Option<DateTime<Utc>>,
}

/// Update request for a task
///
/// Applies the same field constraints as create to whichever fields are
/// present. `due_date` distinguishes absent from explicit null.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    pub is_completed: Option<bool>,
}

impl UpdateTaskRequest {
    fn into_update(self) -> UpdateTask {
        UpdateTask {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            is_completed: self.is_completed,
        }
    }
}

/// List query parameters for tasks
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
    pub search: Option<String>,

    /// Restrict to one user's tasks; admin listings only
    pub user_id: Option<Uuid>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TaskListQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter {
            completed: self.completed,
            search: self.search.clone(),
        }
    }

    fn page(&self) -> daydash_shared::models::Page {
        daydash_shared::models::Page::new(self.limit, self.offset)
    }
}

/// Create a task owned by the authenticated user
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: actor.id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the authenticated user's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db, Some(actor.id), &query.filter(), query.page()).await?;
    Ok(Json(tasks))
}

/// Fetch a task by ID (owner or admin)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id).await?;
    let task = authorize_found(&actor, task, |t| t.user_id, "Task not found")?;
    Ok(Json(task))
}

/// Update a task (owner or admin)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::find_by_id(&state.db, id).await?;
    authorize_found(&actor, task, |t| t.user_id, "Task not found")?;

    let updated = Task::update(&state.db, id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a task (owner or admin)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = Task::find_by_id(&state.db, id).await?;
    authorize_found(&actor, task, |t| t.user_id, "Task not found")?;

    Task::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// List tasks across all users (admin only)
pub async fn list_all_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    require_admin(&actor)?;

    let tasks = Task::list(&state.db, query.user_id, &query.filter(), query.page()).await?;
    Ok(Json(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let req = CreateTaskRequest {
            title: "".to_string(),
            description: "d".to_string(),
            due_date: None,
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: "walk the dog".to_string(),
            description: "around the block".to_string(),
            due_date: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_task_request_enforces_create_constraints() {
        // Over-limit title is rejected before it can reach the column
        let req: UpdateTaskRequest =
            serde_json::from_str(&format!(r#"{{"title": "{}"}}"#, "x".repeat(10_000))).unwrap();
        assert!(req.validate().is_err());

        // Empty title is rejected too
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());

        // Absent fields validate fine and map through unchanged
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"is_completed": true, "due_date": null}"#).unwrap();
        assert!(req.validate().is_ok());
        let update = req.into_update();
        assert!(update.title.is_none());
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.is_completed, Some(true));
    }

    #[test]
    fn test_task_list_query_defaults() {
        let query: TaskListQuery = serde_json::from_str("{}").unwrap();
        assert!(query.completed.is_none());
        assert!(query.search.is_none());
        assert_eq!(query.page().limit(), 20);
        assert_eq!(query.page().offset(), 0);
    }
}
