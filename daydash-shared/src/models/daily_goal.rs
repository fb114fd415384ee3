/// Daily goal model and database operations
///
/// Daily goals are date-anchored objectives. Like tasks they always start
/// incomplete; unlike habits the completion flag carries no timestamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;

/// Daily goal model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyGoal {
    /// Unique goal ID
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Goal title
    pub title: String,

    /// What this goal sets out to do
    pub description: String,

    /// The calendar day this goal belongs to
    pub goal_date: NaiveDate,

    /// Completion flag; always false on creation
    pub is_completed: bool,

    /// When the goal was created
    pub created_at: DateTime<Utc>,

    /// When the goal was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new daily goal
#[derive(Debug, Clone)]
pub struct CreateDailyGoal {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal_date: NaiveDate,
}

/// Partial update for a daily goal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDailyGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_date: Option<NaiveDate>,
    pub is_completed: Option<bool>,
}

/// Filters for daily goal lists
#[derive(Debug, Clone, Default)]
pub struct DailyGoalFilter {
    /// Exact-match completion filter
    pub completed: Option<bool>,

    /// Case-insensitive substring match against title or description
    pub search: Option<String>,

    /// Restrict to goals for one calendar day
    pub goal_date: Option<NaiveDate>,
}

impl DailyGoal {
    /// Creates a new daily goal in the incomplete state
    pub async fn create(pool: &PgPool, data: CreateDailyGoal) -> Result<Self, sqlx::Error> {
        let goal = sqlx::query_as::<_, DailyGoal>(
            r#"
            INSERT INTO daily_goals (user_id, title, description, goal_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, goal_date, is_completed,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.goal_date)
        .fetch_one(pool)
        .await?;

        Ok(goal)
    }

    /// Finds a daily goal by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let goal = sqlx::query_as::<_, DailyGoal>(
            r#"
            SELECT id, user_id, title, description, goal_date, is_completed,
                   created_at, updated_at
            FROM daily_goals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(goal)
    }

    /// Lists daily goals newest-first with optional filters
    ///
    /// `owner` restricts to one user's goals; None lists across all users
    /// (admin listings).
    pub async fn list(
        pool: &PgPool,
        owner: Option<Uuid>,
        filter: &DailyGoalFilter,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let goals = sqlx::query_as::<_, DailyGoal>(
            r#"
            SELECT id, user_id, title, description, goal_date, is_completed,
                   created_at, updated_at
            FROM daily_goals
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::boolean IS NULL OR is_completed = $2)
              AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
              AND ($4::date IS NULL OR goal_date = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(owner)
        .bind(filter.completed)
        .bind(search_pattern)
        .bind(filter.goal_date)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok(goals)
    }

    /// Updates a daily goal, applying only the supplied fields
    ///
    /// # Returns
    ///
    /// The updated goal, or None if the id doesn't resolve
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateDailyGoal,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE daily_goals SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.goal_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", goal_date = ${}", bind_count));
        }
        if data.is_completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, title, description, goal_date, is_completed, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, DailyGoal>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(goal_date) = data.goal_date {
            q = q.bind(goal_date);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }

        let goal = q.fetch_optional(pool).await?;

        Ok(goal)
    }

    /// Deletes a daily goal by ID (hard delete)
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the goal didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM daily_goals WHERE id = $1")
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
    fn test_update_daily_goal_parses_goal_date() {
        let update: UpdateDailyGoal =
            serde_json::from_str(r#"{"goal_date": "2026-03-01"}"#).unwrap();
        assert_eq!(
            update.goal_date,
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.is_completed.is_none());
    }

    #[test]
    fn test_update_daily_goal_rejects_bad_date() {
        let result: Result<UpdateDailyGoal, _> =
            serde_json::from_str(r#"{"goal_date": "not-a-date"}"#);
        assert!(result.is_err());
    }
}
