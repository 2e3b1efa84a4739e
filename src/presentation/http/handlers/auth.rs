//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::{RegisterResponse, UserResponse};
use crate::application::services::{
    AccountError, AccountService, AccountServiceImpl, RegisterAccountDto, Sha256CredentialHasher,
};
use crate::infrastructure::repositories::PgUserRepository;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn account_service(
    state: &AppState,
) -> AccountServiceImpl<PgUserRepository, Sha256CredentialHasher> {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    AccountServiceImpl::new(user_repo, Sha256CredentialHasher)
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    let service = account_service(&state);

    let user = service
        .register(RegisterAccountDto {
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await
        .map_err(|e| match e {
            AccountError::MissingFields => AppError::Validation("Missing required fields".into()),
            AccountError::EmailTaken => AppError::Conflict("Email already registered".into()),
            e => AppError::Internal(e.to_string()),
        })?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    // Validate request
    body.validate()
        .map_err(validation_error)?;

    let service = account_service(&state);

    let user = service
        .login(&body.email, &body.password)
        .await
        .map_err(|e| match e {
            AccountError::MissingFields => {
                AppError::Validation("Missing email or password".into())
            }
            AccountError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".into())
            }
            e => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(UserResponse::from_user(user, true)))
}
