//! User Profile Handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::application::dto::request::UpdateProfileRequest;
use crate::application::dto::response::UserResponse;
use crate::application::services::{
    AccountError, AccountService, AccountServiceImpl, Sha256CredentialHasher, UpdateProfileDto,
};
use crate::domain::UserStatus;
use crate::infrastructure::repositories::PgUserRepository;
use crate::presentation::http::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Get the current user's profile
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let service = AccountServiceImpl::new(user_repo, Sha256CredentialHasher);

    let user = service
        .get_profile(auth.user_id)
        .await
        .map_err(|e| match e {
            AccountError::NotFound => AppError::NotFound("User not found".into()),
            e => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(UserResponse::from_user(user, true)))
}

/// Update the current user's profile
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let service = AccountServiceImpl::new(user_repo, Sha256CredentialHasher);

    let update = UpdateProfileDto {
        avatar_url: body.avatar_url,
        bio: body.bio,
        custom_status: body.custom_status,
        status: body.status.as_deref().map(UserStatus::from_str),
    };

    let user = service
        .update_profile(auth.user_id, update)
        .await
        .map_err(|e| match e {
            AccountError::NotFound => AppError::NotFound("User not found".into()),
            e => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(UserResponse::from_user(user, true)))
}
