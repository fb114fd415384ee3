/// Task model and database operations
///
/// Tasks are to-do items with an optional due date. New tasks always start
/// incomplete regardless of anything the client sends: `CreateTask` simply
/// has no completion field and the column default applies.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(500) NOT NULL,
///     due_date TIMESTAMPTZ,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{double_option, Page};

/// Task model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Completion flag; always false on creation
    pub is_completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// `user_id` comes from the authenticated actor, never from the request
/// body, and there is deliberately no completion field.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for a task
///
/// Absent fields are left untouched. `due_date` distinguishes absent from
/// explicit null: `null` clears the due date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    pub is_completed: Option<bool>,
}

/// Filters for task lists
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Exact-match completion filter
    pub completed: Option<bool>,

    /// Case-insensitive substring match against title or description
    pub search: Option<String>,
}

impl Task {
    /// Creates a new task in the incomplete state
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, due_date, is_completed,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, is_completed,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks newest-first with optional filters
    ///
    /// `owner` restricts to one user's tasks; None lists across all users
    /// (admin listings). Filter predicates are NULL-tolerant so the SQL
    /// stays static.
    pub async fn list(
        pool: &PgPool,
        owner: Option<Uuid>,
        filter: &TaskFilter,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, is_completed,
                   created_at, updated_at
            FROM tasks
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::boolean IS NULL OR is_completed = $2)
              AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(owner)
        .bind(filter.completed)
        .bind(search_pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task, applying only the supplied fields
    ///
    /// # Returns
    ///
    /// The updated task, or None if the id doesn't resolve
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.is_completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, title, description, due_date, is_completed, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID (hard delete)
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the task didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_partial_deserialization() {
        // Only title supplied: everything else stays None
        let update: UpdateTask = serde_json::from_str(r#"{"title": "new title"}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("new title"));
        assert!(update.description.is_none());
        assert!(update.due_date.is_none());
        assert!(update.is_completed.is_none());
    }

    #[test]
    fn test_update_task_due_date_null_clears() {
        let update: UpdateTask = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(update.due_date, Some(None));

        let update: UpdateTask =
            serde_json::from_str(r#"{"due_date": "2026-01-15T10:00:00Z"}"#).unwrap();
        assert!(matches!(update.due_date, Some(Some(_))));
    }

    #[test]
    fn test_create_task_has_no_completion_field() {
        // CreateTask carries no is_completed; the column default applies and
        // clients cannot pre-complete a task.
        let create = CreateTask {
            user_id: Uuid::new_v4(),
            title: "t1".to_string(),
            description: "d1".to_string(),
            due_date: None,
        };
        assert_eq!(create.title, "t1");
    }
}
