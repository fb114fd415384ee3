/// Account and user management endpoints
///
/// # Endpoints
///
/// - `POST /api/users/register` - Register a new account (public)
/// - `POST /api/users/login` - Login and get a token (public)
/// - `GET /api/users/:id` - Fetch a user (self or admin)
/// - `PUT /api/users/:id` - Update a user (self or admin)
/// - `DELETE /api/users/:id` - Delete a user (self or admin)
/// - `GET /api/admin/users` - List all users (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::{authorize_found, require_admin, MessageResponse, PageQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use daydash_shared::{
    auth::{jwt, password, policy::Actor},
    models::user::{CreateUser, Role, UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name, unique across accounts
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address, unique across accounts
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional role name, case-insensitive; defaults to CUSTOMER
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Authentication response, returned by both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token, valid for 24 hours
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    /// The authenticated user
    pub user: User,
}

/// Update request for a user
///
/// All fields optional; only supplied fields change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// Role name, case-insensitive; only admins may change roles
    pub role: Option<String>,
}

/// Parses a role name, mapping unknown names to a validation error
fn parse_role(raw: &str) -> ApiResult<Role> {
    raw.parse::<Role>().map_err(|_| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "role".to_string(),
            message: format!("Unknown role: {}", raw),
        }])
    })
}

/// Register a new account
///
/// Creates the user and returns a token immediately, so clients need no
/// follow-up login call.
///
/// # Errors
///
/// - `409 Conflict`: Username or email already registered
/// - `422 Unprocessable Entity`: Validation failed or unknown role
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let role = match req.role.as_deref() {
        Some(raw) => parse_role(raw)?,
        None => Role::default(),
    };

    // Give a precise conflict message before the unique index would fire
    if let Some(existing) =
        User::find_by_username_or_email(&state.db, &req.username, &req.email).await?
    {
        if existing.username == req.username {
            return Err(ApiError::Conflict("Username already registered".to_string()));
        }
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, user.role);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }),
    ))
}

/// Login with username and password
///
/// The failure message never says whether the username or the password was
/// wrong.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.role);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user,
    }))
}

/// Fetch a user by ID (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id).await?;
    let user = authorize_found(&actor, user, |u| u.id, "User not found")?;
    Ok(Json(user))
}

/// Update a user (self or admin)
///
/// Role changes are admin-only even on one's own account.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = User::find_by_id(&state.db, id).await?;
    authorize_found(&actor, user, |u| u.id, "User not found")?;

    let role = match req.role.as_deref() {
        Some(raw) => {
            if !actor.is_admin() {
                return Err(ApiError::Forbidden("Admin access required".to_string()));
            }
            Some(parse_role(raw)?)
        }
        None => None,
    };

    let password_hash = match req.password.as_deref() {
        Some(password) => Some(password::hash_password(password)?),
        None => None,
    };

    let updated = User::update(
        &state.db,
        id,
        UpdateUser {
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a user (self or admin)
///
/// Removal cascades to the user's tasks, habits, notes, and daily goals.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let user = User::find_by_id(&state.db, id).await?;
    authorize_found(&actor, user, |u| u.id, "User not found")?;

    User::delete(&state.db, id).await?;

    tracing::info!(user_id = %id, "Deleted user");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// List all users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<User>>> {
    require_admin(&actor)?;

    let users = User::list(&state.db, query.page()).await?;
    Ok(Json(users))
}
