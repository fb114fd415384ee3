/// Note endpoints
///
/// # Endpoints
///
/// - `POST /api/notes` - Create a note
/// - `GET /api/notes` - List own notes
/// - `GET /api/notes/:id` - Fetch a note (owner or admin)
/// - `PUT /api/notes/:id` - Update a note (owner or admin)
/// - `DELETE /api/notes/:id` - Delete a note (owner or admin)
/// - `GET /api/admin/notes` - List all notes (admin)

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
    models::note::{CreateNote, Note, NoteFilter, UpdateNote},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create request for a note
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub content: Option<String>,
}

/// Update request for a note
///
/// Applies the same title constraint as create when a title is present.
/// `content` distinguishes absent from explicit null.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
}

impl UpdateNoteRequest {
    fn into_update(self) -> UpdateNote {
        UpdateNote {
            title: self.title,
            content: self.content,
        }
    }
}

/// List query parameters for notes
#[derive(Debug, Default, Deserialize)]
pub struct NoteListQuery {
    pub search: Option<String>,

    /// Restrict to one user's notes; admin listings only
    pub user_id: Option<Uuid>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl NoteListQuery {
    fn filter(&self) -> NoteFilter {
        NoteFilter {
            search: self.search.clone(),
        }
    }

    fn page(&self) -> daydash_shared::models::Page {
        daydash_shared::models::Page::new(self.limit, self.offset)
    }
}

/// Create a note owned by the authenticated user
pub async fn create_note(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    req.validate()?;

    let note = Note::create(
        &state.db,
        CreateNote {
            user_id: actor.id,
            title: req.title,
            content: req.content,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// List the authenticated user's notes
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<NoteListQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    let notes = Note::list(&state.db, Some(actor.id), &query.filter(), query.page()).await?;
    Ok(Json(notes))
}

/// Fetch a note by ID (owner or admin)
pub async fn get_note(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Note>> {
    let note = Note::find_by_id(&state.db, id).await?;
    let note = authorize_found(&actor, note, |n| n.user_id, "Note not found")?;
    Ok(Json(note))
}

/// Update a note (owner or admin)
pub async fn update_note(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    req.validate()?;

    let note = Note::find_by_id(&state.db, id).await?;
    authorize_found(&actor, note, |n| n.user_id, "Note not found")?;

    let updated = Note::update(&state.db, id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a note (owner or admin)
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let note = Note::find_by_id(&state.db, id).await?;
    authorize_found(&actor, note, |n| n.user_id, "Note not found")?;

    Note::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Note deleted successfully")))
}

/// List notes across all users (admin only)
pub async fn list_all_notes(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<NoteListQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    require_admin(&actor)?;

    let notes = Note::list(&state.db, query.user_id, &query.filter(), query.page()).await?;
    Ok(Json(notes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_note_request_enforces_title_constraint() {
        let req: UpdateNoteRequest =
            serde_json::from_str(&format!(r#"{{"title": "{}"}}"#, "x".repeat(201))).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateNoteRequest = serde_json::from_str(r#"{"content": null}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.into_update().content, Some(None));
    }
}
