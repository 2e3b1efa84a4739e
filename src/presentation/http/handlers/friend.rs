//! Friend Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::SendFriendRequest;
use crate::application::dto::response::{AckResponse, FriendResponse};
use crate::application::services::{FriendError, FriendService, FriendServiceImpl};
use crate::infrastructure::repositories::{PgFriendshipRepository, PgUserRepository};
use crate::presentation::http::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn friend_service(
    state: &AppState,
) -> FriendServiceImpl<PgUserRepository, PgFriendshipRepository> {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let friendship_repo = Arc::new(PgFriendshipRepository::new(state.db.clone()));
    FriendServiceImpl::new(user_repo, friendship_repo)
}

/// List all friends and pending requests for the caller
pub async fn list_friends(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FriendResponse>>, AppError> {
    let links = friend_service(&state)
        .list_for(auth.user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let responses: Vec<FriendResponse> = links.into_iter().map(FriendResponse::from).collect();

    Ok(Json(responses))
}

/// Send a friend request by public id
pub async fn send_friend_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SendFriendRequest>,
) -> Result<(StatusCode, Json<AckResponse>), AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    friend_service(&state)
        .send_request(auth.user_id, &body.public_id)
        .await
        .map_err(|e| match e {
            FriendError::TargetNotFound => AppError::NotFound("User not found".into()),
            FriendError::SelfRequest => AppError::Validation("Cannot add yourself".into()),
            FriendError::AlreadyLinked => {
                AppError::Conflict("Friend request already exists".into())
            }
            e => AppError::Internal(e.to_string()),
        })?;

    Ok((StatusCode::CREATED, Json(AckResponse::new("Friend request sent"))))
}

/// Accept a pending friend request sent by `user_id`
pub async fn accept_friend_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<AckResponse>, AppError> {
    friend_service(&state)
        .accept_request(auth.user_id, user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AckResponse::new("Friend request accepted")))
}

/// Remove a friend (or reject a pending request)
pub async fn remove_friend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    friend_service(&state)
        .remove(auth.user_id, user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}
