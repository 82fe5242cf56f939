//! User handlers: registration and lookup.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use couponhub_entity::CreateUser;

use crate::dto::request::RegisterUserRequest;
use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiResult;
use crate::handlers::validate;
use crate::state::AppState;

/// POST /api/users
pub async fn register_user(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    validate(&input)?;

    let user = state
        .user_service
        .register(&CreateUser {
            username: input.username,
            display_name: input.display_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /api/users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get(&username).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
