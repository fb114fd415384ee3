/// Habit model and database operations
///
/// Habits track recurring behaviors. The `completed_at` timestamp is wholly
/// derived from `is_completed`: flipping it true stamps NOW(), flipping it
/// false clears the timestamp, and clients cannot set `completed_at`
/// directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{double_option, Page};

/// Habit model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Habit {
    /// Unique habit ID
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Habit title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Completion flag; always false on creation
    pub is_completed: bool,

    /// Server-managed completion timestamp, coupled to `is_completed`
    pub completed_at: Option<DateTime<Utc>>,

    /// When the habit was created
    pub created_at: DateTime<Utc>,

    /// When the habit was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new habit
#[derive(Debug, Clone)]
pub struct CreateHabit {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Partial update for a habit
///
/// `description` distinguishes absent from explicit null. There is no
/// `completed_at` field here on purpose: the timestamp follows
/// `is_completed` and nothing else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHabit {
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub is_completed: Option<bool>,
}

/// Filters for habit lists
#[derive(Debug, Clone, Default)]
pub struct HabitFilter {
    /// Exact-match completion filter
    pub completed: Option<bool>,

    /// Case-insensitive substring match against title or description
    pub search: Option<String>,
}

/// Aggregate completion counts for one user's habits
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HabitStats {
    pub total_habits: i64,
    pub completed_habits: i64,
    pub incomplete_habits: i64,
}

impl Habit {
    /// Creates a new habit in the incomplete state
    pub async fn create(pool: &PgPool, data: CreateHabit) -> Result<Self, sqlx::Error> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, is_completed, completed_at,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(habit)
    }

    /// Finds a habit by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, user_id, title, description, is_completed, completed_at,
                   created_at, updated_at
            FROM habits
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(habit)
    }

    /// Lists habits newest-first with optional filters
    ///
    /// `owner` restricts to one user's habits; None lists across all users
    /// (admin listings).
    pub async fn list(
        pool: &PgPool,
        owner: Option<Uuid>,
        filter: &HabitFilter,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let habits = sqlx::query_as::<_, Habit>(
            r#"
            SELECT id, user_id, title, description, is_completed, completed_at,
                   created_at, updated_at
            FROM habits
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

        Ok(habits)
    }

    /// Updates a habit, applying only the supplied fields
    ///
    /// When `is_completed` changes, `completed_at` moves with it: NOW() on
    /// completion, NULL on un-completion.
    ///
    /// # Returns
    ///
    /// The updated habit, or None if the id doesn't resolve
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateHabit,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE habits SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        match data.is_completed {
            Some(true) => {
                bind_count += 1;
                query.push_str(&format!(
                    ", is_completed = ${}, completed_at = NOW()",
                    bind_count
                ));
            }
            Some(false) => {
                bind_count += 1;
                query.push_str(&format!(
                    ", is_completed = ${}, completed_at = NULL",
                    bind_count
                ));
            }
            None => {}
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, title, description, is_completed, completed_at, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Habit>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(is_completed) = data.is_completed {
            q = q.bind(is_completed);
        }

        let habit = q.fetch_optional(pool).await?;

        Ok(habit)
    }

    /// Deletes a habit by ID (hard delete)
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the habit didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Computes completion counts over one user's habits
    pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<HabitStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, HabitStats>(
            r#"
            SELECT COUNT(*) AS total_habits,
                   COUNT(*) FILTER (WHERE is_completed) AS completed_habits,
                   COUNT(*) FILTER (WHERE NOT is_completed) AS incomplete_habits
            FROM habits
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_habit_ignores_completed_at() {
        // completed_at is not a recognized update field; serde(deny) is not
        // used, so unknown fields are silently dropped rather than rejected.
        let update: UpdateHabit = serde_json::from_str(
            r#"{"is_completed": true, "completed_at": "2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(update.is_completed, Some(true));
    }

    #[test]
    fn test_update_habit_description_null_clears() {
        let update: UpdateHabit = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(update.description, Some(None));

        let update: UpdateHabit = serde_json::from_str(r#"{"title": "drink water"}"#).unwrap();
        assert!(update.description.is_none());
    }

    #[test]
    fn test_habit_stats_serializes_counts() {
        let stats = HabitStats {
            total_habits: 5,
            completed_habits: 2,
            incomplete_habits: 3,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_habits"], 5);
        assert_eq!(json["completed_habits"], 2);
        assert_eq!(json["incomplete_habits"], 3);
    }
}
