// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints: registration, login, current user, profile lookup and edit.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};

use super::multipart::{read_profile_form, ProfileUploadForm};
use crate::{
    auth::{Auth, OptionalAuth},
    error::ApiError,
    models::{LoginRequest, MessageResponse, RegisterRequest, SessionResponse, UserEnvelope},
    services::Session,
    state::AppState,
    storage::UserProfile,
};

const AUTHENTICATED_MESSAGE: &str = "You are now authenticated!";

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        message: AUTHENTICATED_MESSAGE.to_string(),
        token: session.token,
        user_id: session.user.id.clone(),
        user: session.user,
    }
}

/// Register a new user and log them in.
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = SessionResponse),
        (status = 422, description = "Missing fields, password mismatch or email in use", body = MessageResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let Json(request) = payload?;
    let session = state.users().register(request).await?;
    Ok((StatusCode::CREATED, Json(session_response(session))))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 422, description = "Missing fields, unknown email or wrong password", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = payload?;
    let session = state.users().login(request).await?;
    Ok(Json(session_response(session)))
}

/// The user behind the bearer token, or `null` without one.
#[utoipa::path(
    get,
    path = "/users/checkuser",
    tag = "Users",
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user or null", body = UserProfile),
        (status = 401, description = "Token present but invalid")
    )
)]
pub async fn check_user(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
) -> Result<Json<Option<UserProfile>>, ApiError> {
    let current = state.users().resolve_current_user(user.as_ref())?;
    Ok(Json(current))
}

/// Public profile of a user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserEnvelope),
        (status = 422, description = "User not found", body = MessageResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state.users().get_by_id(&id)?;
    Ok(Json(UserEnvelope { user }))
}

/// Edit the authenticated user's own profile.
#[utoipa::path(
    patch,
    path = "/users/edit/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID; must be the caller's own")
    ),
    request_body(content = ProfileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not your profile", body = MessageResponse),
        (status = 422, description = "Missing fields, password mismatch, email in use or bad image", body = MessageResponse)
    )
)]
pub async fn edit_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (form, image) = read_profile_form(multipart?).await?;
    state.users().edit_profile(&user, &id, form, image).await?;
    Ok(Json(MessageResponse::new("User updated successfully!")))
}
