//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
};

use crate::{
    domain::{Identity, RoomId},
    infrastructure::dto::http::{
        ApiResponse, LoginDto, LoginForm, RoomDeletedDto, RoomDetailDto, RoomSummaryDto,
        SessionDto, UserDto,
    },
    ui::state::AppState,
    usecase::{
        CreateRoomError, DeleteRoomError, GetRoomDetailError, LoginError, ProfileError,
        RoomDetail,
    },
};
use puppet_shared::time::timestamp_to_rfc3339;

use super::auth::{ApiError, AuthenticatedAdmin, AuthenticatedUser};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Landing endpoint
pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Puppet Server"}))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn login_error(error: LoginError) -> ApiError {
    tracing::warn!("Login rejected: {}", error);
    ApiError::unauthorized("Incorrect username or password")
}

/// Log in as a user
pub async fn user_login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<LoginDto> {
    let (identity, token) = state
        .login_usecase
        .login_user(form.username, &form.password)
        .await
        .map_err(login_error)?;

    Ok(Json(ApiResponse::ok(
        "Login successful",
        LoginDto {
            username: identity.into_string(),
            token: token.as_str().to_string(),
        },
    )))
}

/// Log in as an admin
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<LoginDto> {
    let (identity, token) = state
        .login_usecase
        .login_admin(form.username, &form.password)
        .await
        .map_err(login_error)?;

    Ok(Json(ApiResponse::ok(
        "Login successful",
        LoginDto {
            username: identity.into_string(),
            token: token.as_str().to_string(),
        },
    )))
}

fn profile_error(identity: &Identity, error: ProfileError) -> ApiError {
    match error {
        ProfileError::UserNotFound(_) => ApiError::not_found("User not found"),
        ProfileError::Repository(e) => {
            tracing::error!("Profile of '{}' unavailable: {}", identity, e);
            ApiError::internal("Internal server error")
        }
    }
}

/// Get the profile of the logged-in user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> ApiResult<UserDto> {
    let profile = state
        .get_profile_usecase
        .execute(&session.identity)
        .await
        .map_err(|e| profile_error(&session.identity, e))?;

    Ok(Json(ApiResponse::ok("User found", UserDto::from(profile))))
}

/// Replace the profile of the logged-in user
pub async fn put_me(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(session): AuthenticatedUser,
    Json(profile): Json<serde_json::Value>,
) -> ApiResult<UserDto> {
    let profile = state
        .update_profile_usecase
        .execute(&session.identity, profile)
        .await
        .map_err(|e| profile_error(&session.identity, e))?;

    Ok(Json(ApiResponse::ok("User updated", UserDto::from(profile))))
}

/// Create a room with the given attributes
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(room_id): Path<String>,
    Json(attributes): Json<serde_json::Value>,
) -> ApiResult<RoomSummaryDto> {
    let room_id = RoomId::try_from(room_id).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let room = state
        .create_room_usecase
        .execute(room_id, attributes)
        .await
        .map_err(|e| match e {
            CreateRoomError::AlreadyExists(_) => ApiError::bad_request("Room already exists"),
            CreateRoomError::Repository(e) => {
                tracing::error!("Failed to create room: {}", e);
                ApiError::internal("Internal server error")
            }
        })?;

    Ok(Json(ApiResponse::ok(
        "Room created",
        RoomSummaryDto::from(room),
    )))
}

/// Get room detail by ID
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(room_id): Path<String>,
) -> ApiResult<RoomDetailDto> {
    let room_id = RoomId::try_from(room_id).map_err(|_| ApiError::not_found("Room not found"))?;

    let RoomDetail { room, connected } = state
        .get_room_detail_usecase
        .execute(&room_id)
        .await
        .map_err(|GetRoomDetailError::RoomNotFound(_)| ApiError::not_found("Room not found"))?;

    // Domain Model から DTO への変換
    let detail = RoomDetailDto {
        id: room.id.as_str().to_string(),
        room: room.attributes,
        members: room.members.into_iter().map(String::from).collect(),
        connected: connected.into_iter().map(String::from).collect(),
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    };

    Ok(Json(ApiResponse::ok("Room found", detail)))
}

/// Delete a room, closing every live connection in it
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(room_id): Path<String>,
) -> ApiResult<RoomDeletedDto> {
    let room_id = RoomId::try_from(room_id).map_err(|_| ApiError::not_found("Room not found"))?;

    let closed = state
        .delete_room_usecase
        .execute(&room_id)
        .await
        .map_err(|DeleteRoomError::RoomNotFound(_)| ApiError::not_found("Room not found"))?;

    tracing::info!(
        "Room {} deleted by '{}', {} connection(s) closed",
        room_id,
        admin.identity,
        closed
    );

    Ok(Json(ApiResponse::ok(
        "Room deleted",
        RoomDeletedDto {
            id: room_id.into(),
        },
    )))
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> ApiResult<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    Ok(Json(ApiResponse::ok(
        "Rooms found",
        rooms.into_iter().map(RoomSummaryDto::from).collect(),
    )))
}

/// Get list of users who have logged in
pub async fn get_users(
    State(state): State<Arc<AppState>>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> ApiResult<Vec<UserDto>> {
    let users = state.get_users_usecase.execute().await;

    Ok(Json(ApiResponse::ok(
        "Users found",
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// Get list of active sessions
pub async fn get_sessions(
    State(state): State<Arc<AppState>>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> ApiResult<Vec<SessionDto>> {
    let sessions = state.get_sessions_usecase.execute().await;

    Ok(Json(ApiResponse::ok(
        "Sessions found",
        sessions.into_iter().map(SessionDto::from).collect(),
    )))
}
