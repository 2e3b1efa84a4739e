//! Server and Channel Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateChannelRequest, CreateServerRequest};
use crate::application::dto::response::{ChannelResponse, MemberResponse, ServerResponse};
use crate::application::services::{
    CreateChannelDto, CreateServerDto, ServerError, ServerService, ServerServiceImpl,
};
use crate::domain::ChannelType;
use crate::infrastructure::repositories::{
    PgChannelRepository, PgMemberRepository, PgServerRepository,
};
use crate::presentation::http::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn server_service(
    state: &AppState,
) -> ServerServiceImpl<PgServerRepository, PgChannelRepository, PgMemberRepository> {
    let server_repo = Arc::new(PgServerRepository::new(state.db.clone()));
    let channel_repo = Arc::new(PgChannelRepository::new(state.db.clone()));
    let member_repo = Arc::new(PgMemberRepository::new(state.db.clone()));
    ServerServiceImpl::new(server_repo, channel_repo, member_repo)
}

fn map_server_error(e: ServerError) -> AppError {
    match e {
        ServerError::NameRequired => AppError::Validation("Name is required".into()),
        ServerError::NotFound => AppError::NotFound("Server not found".into()),
        e => AppError::Internal(e.to_string()),
    }
}

/// Create a server; the caller becomes its owner
pub async fn create_server(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateServerRequest>,
) -> Result<(StatusCode, Json<ServerResponse>), AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    let server = server_service(&state)
        .create_server(
            auth.user_id,
            CreateServerDto {
                name: body.name,
                icon_url: body.icon_url,
            },
        )
        .await
        .map_err(map_server_error)?;

    Ok((StatusCode::CREATED, Json(ServerResponse::from(server))))
}

/// List the caller's servers
pub async fn list_servers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ServerResponse>>, AppError> {
    let servers = server_service(&state)
        .list_servers(auth.user_id)
        .await
        .map_err(map_server_error)?;

    let responses: Vec<ServerResponse> = servers.into_iter().map(ServerResponse::from).collect();

    Ok(Json(responses))
}

/// List the channels of a server
pub async fn list_channels(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(server_id): Path<i64>,
) -> Result<Json<Vec<ChannelResponse>>, AppError> {
    let channels = server_service(&state)
        .list_channels(server_id)
        .await
        .map_err(map_server_error)?;

    let responses: Vec<ChannelResponse> =
        channels.into_iter().map(ChannelResponse::from).collect();

    Ok(Json(responses))
}

/// Create a channel in a server
pub async fn create_channel(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(server_id): Path<i64>,
    Json(body): Json<CreateChannelRequest>,
) -> Result<(StatusCode, Json<ChannelResponse>), AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    let channel_type = body
        .channel_type
        .as_deref()
        .map(ChannelType::from_str)
        .unwrap_or_default();

    let channel = server_service(&state)
        .create_channel(
            server_id,
            CreateChannelDto {
                name: body.name,
                channel_type,
            },
        )
        .await
        .map_err(map_server_error)?;

    Ok((StatusCode::CREATED, Json(ChannelResponse::from(channel))))
}

/// List the members of a server
pub async fn list_members(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(server_id): Path<i64>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let members = server_service(&state)
        .list_members(server_id)
        .await
        .map_err(map_server_error)?;

    let responses: Vec<MemberResponse> = members.into_iter().map(MemberResponse::from).collect();

    Ok(Json(responses))
}
