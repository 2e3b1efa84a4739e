//! Message Handlers
//!
//! Channel messages and direct messages share one service; the route
//! determines the destination.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{MessageQueryParams, SendMessageRequest};
use crate::application::dto::response::{MessageAckResponse, MessageResponse};
use crate::application::services::{
    MessageError, MessageService, MessageServiceImpl, SendMessageDto,
};
use crate::domain::MessageDestination;
use crate::infrastructure::repositories::PgMessageRepository;
use crate::presentation::http::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn message_service(state: &AppState) -> MessageServiceImpl<PgMessageRepository> {
    let message_repo = Arc::new(PgMessageRepository::new(state.db.clone()));
    MessageServiceImpl::new(message_repo)
}

fn map_message_error(e: MessageError) -> AppError {
    match e {
        MessageError::ContentRequired => {
            AppError::Validation("Message content required".into())
        }
        e => AppError::Internal(e.to_string()),
    }
}

async fn list(
    state: &AppState,
    viewer_id: i64,
    destination: MessageDestination,
    limit: Option<i64>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let page = message_service(state)
        .list(viewer_id, destination, limit)
        .await
        .map_err(map_message_error)?;

    let responses: Vec<MessageResponse> = page.into_iter().map(MessageResponse::from).collect();

    Ok(Json(responses))
}

async fn send(
    state: &AppState,
    sender_id: i64,
    destination: MessageDestination,
    body: SendMessageRequest,
) -> Result<(StatusCode, Json<MessageAckResponse>), AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    let message = message_service(state)
        .send(SendMessageDto {
            sender_id,
            destination,
            content: body.content,
        })
        .await
        .map_err(map_message_error)?;

    Ok((StatusCode::CREATED, Json(MessageAckResponse::from(message))))
}

/// Get the latest messages of a channel, oldest-first within the page
pub async fn get_channel_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<i64>,
    Query(query): Query<MessageQueryParams>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    list(
        &state,
        auth.user_id,
        MessageDestination::Channel(channel_id),
        query.limit,
    )
    .await
}

/// Send a message to a channel
pub async fn send_channel_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<i64>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageAckResponse>), AppError> {
    send(
        &state,
        auth.user_id,
        MessageDestination::Channel(channel_id),
        body,
    )
    .await
}

/// Get the latest direct messages exchanged with another user
pub async fn get_direct_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
    Query(query): Query<MessageQueryParams>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    list(
        &state,
        auth.user_id,
        MessageDestination::Direct(user_id),
        query.limit,
    )
    .await
}

/// Send a direct message to another user
pub async fn send_direct_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageAckResponse>), AppError> {
    send(
        &state,
        auth.user_id,
        MessageDestination::Direct(user_id),
        body,
    )
    .await
}

/// Delete an own message; silently succeeds for anything else
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    message_service(&state)
        .delete(message_id, auth.user_id)
        .await
        .map_err(map_message_error)?;

    Ok(StatusCode::NO_CONTENT)
}
