/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use daydash_shared::auth::{jwt, policy::Actor};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /api/
///     ├── /users/
///     │   ├── POST /register         # Create account (public)
///     │   ├── POST /login            # Obtain token (public)
///     │   ├── GET/PUT/DELETE /:id    # Self or admin
///     │   └── GET /:id/daily-goals   # Self or admin
///     ├── /tasks/                    # Owner-scoped CRUD
///     ├── /habits/                   # Owner-scoped CRUD + /stats
///     ├── /notes/                    # Owner-scoped CRUD
///     ├── /daily-goals/              # Owner-scoped CRUD
///     └── /admin/                    # Cross-user listings (admin only)
///         └── GET /users|tasks|habits|notes|daily-goals
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Account endpoints (public, no auth required)
    let public_user_routes = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login));

    // User management (self or admin)
    let user_routes = Router::new()
        .route("/:id", get(routes::users::get_user))
        .route("/:id", put(routes::users::update_user))
        .route("/:id", delete(routes::users::delete_user))
        .route(
            "/:id/daily-goals",
            get(routes::daily_goals::list_for_user),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task));

    let habit_routes = Router::new()
        .route("/", post(routes::habits::create_habit))
        .route("/", get(routes::habits::list_habits))
        .route("/stats", get(routes::habits::habit_stats))
        .route("/:id", get(routes::habits::get_habit))
        .route("/:id", put(routes::habits::update_habit))
        .route("/:id", delete(routes::habits::delete_habit));

    let note_routes = Router::new()
        .route("/", post(routes::notes::create_note))
        .route("/", get(routes::notes::list_notes))
        .route("/:id", get(routes::notes::get_note))
        .route("/:id", put(routes::notes::update_note))
        .route("/:id", delete(routes::notes::delete_note));

    let daily_goal_routes = Router::new()
        .route("/", post(routes::daily_goals::create_daily_goal))
        .route("/", get(routes::daily_goals::list_daily_goals))
        .route("/:id", get(routes::daily_goals::get_daily_goal))
        .route("/:id", put(routes::daily_goals::update_daily_goal))
        .route("/:id", delete(routes::daily_goals::delete_daily_goal));

    // Cross-user listings; handlers enforce the admin role
    let admin_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/tasks", get(routes::tasks::list_all_tasks))
        .route("/habits", get(routes::habits::list_all_habits))
        .route("/notes", get(routes::notes::list_all_notes))
        .route("/daily-goals", get(routes::daily_goals::list_all_daily_goals));

    // Everything past register/login requires a valid token
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/habits", habit_routes)
        .nest("/notes", note_routes)
        .nest("/daily-goals", daily_goal_routes)
        .nest("/admin", admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/users", public_user_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the authenticated `Actor` into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    // Parse Bearer token; the scheme name is case-insensitive
    let token = bearer_token(auth_header)
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    // Validate token
    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // Insert the authenticated actor into request extensions
    req.extensions_mut().insert(Actor::from(&claims));

    Ok(next.run(req).await)
}

/// Extracts the token from an Authorization header value
///
/// Accepts any casing of the "Bearer" scheme per RFC 7235.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim_start())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("BEARER abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
