/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Signup
/// - Login
/// - Current user lookup
///
/// # Endpoints
///
/// - `POST /v1/auth/signup` - Create a new account
/// - `POST /v1/auth/login` - Login and get a session token
/// - `GET /v1/auth/me` - Fetch the logged-in user

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::session::{self, Claims, SessionLifetime},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,

    /// Keep the session alive for 30 days instead of 24 hours
    #[serde(default)]
    pub remember_me: bool,
}

/// Response for signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed session token, sent back as `Authorization: Bearer <token>`
    pub token: String,

    /// The authenticated user
    pub user: User,
}

/// Create a new account
///
/// Registers a user and opens a standard session so the client can start
/// making authenticated requests immediately.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/signup
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "correct-horse"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": 1, "name": "Ada Lovelace", "email": "ada@example.com" }
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Friendly conflict answer before attempting the insert; the unique
    // index on email still catches concurrent signups
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "New account created");

    let claims = Claims::new(user.id, SessionLifetime::Standard);
    let token = session::create_token(&claims, state.session_secret())?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "correct-horse",
///   "remember_me": true
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": 1, "name": "Ada Lovelace", "email": "ada@example.com" }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    // Same answer for unknown email and wrong password
    let user = User::verify_credentials(&state.db, &req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let lifetime = SessionLifetime::from_remember(req.remember_me);
    let claims = Claims::new(user.id, lifetime);
    let token = session::create_token(&claims, state.session_secret())?;

    tracing::debug!(user_id = user.id, remember = req.remember_me, "User logged in");

    Ok(Json(AuthResponse { token, user }))
}

/// Fetch the currently logged-in user
///
/// # Endpoint
///
/// ```text
/// GET /v1/auth/me
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token, or the account
///   was deleted after the token was issued
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, current_user.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

    Ok(Json(user))
}
