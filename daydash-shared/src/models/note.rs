/// Note model and database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{double_option, Page};

/// Note model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Note title
    pub title: String,

    /// Free-form note body
    pub content: Option<String>,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new note
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
}

/// Partial update for a note
///
/// `content` distinguishes absent from explicit null: `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
}

/// Filters for note lists
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Case-insensitive substring match against title or content
    pub search: Option<String>,
}

impl Note {
    /// Creates a new note
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.content)
        .fetch_one(pool)
        .await?;

        Ok(note)
    }

    /// Finds a note by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, content, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Lists notes newest-first with optional filters
    ///
    /// `owner` restricts to one user's notes; None lists across all users
    /// (admin listings).
    pub async fn list(
        pool: &PgPool,
        owner: Option<Uuid>,
        filter: &NoteFilter,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, content, created_at, updated_at
            FROM notes
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(search_pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Updates a note, applying only the supplied fields
    ///
    /// # Returns
    ///
    /// The updated note, or None if the id doesn't resolve
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE notes SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.content.is_some() {
            bind_count += 1;
            query.push_str(&format!(", content = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, user_id, title, content, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Note>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(content) = data.content {
            q = q.bind(content);
        }

        let note = q.fetch_optional(pool).await?;

        Ok(note)
    }

    /// Deletes a note by ID (hard delete)
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the note didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
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
    fn test_update_note_content_null_clears() {
        let update: UpdateNote = serde_json::from_str(r#"{"content": null}"#).unwrap();
        assert_eq!(update.content, Some(None));
    }

    #[test]
    fn test_update_note_absent_content_leaves_untouched() {
        let update: UpdateNote = serde_json::from_str(r#"{"title": "groceries"}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("groceries"));
        assert!(update.content.is_none());
    }
}
