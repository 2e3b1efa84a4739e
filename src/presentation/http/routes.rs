//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        // Public routes
        .nest("/auth", auth_routes())
        // Routes requiring the pre-authenticated X-User-Id header
        .nest("/users", user_routes())
        .nest("/friends", friend_routes())
        .nest("/servers", server_routes())
        .nest("/channels", channel_routes())
        .nest("/messages", message_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// User routes: own profile and direct messages
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route("/@me", patch(handlers::user::update_current_user))
        .route("/{user_id}/messages", get(handlers::message::get_direct_messages))
        .route("/{user_id}/messages", post(handlers::message::send_direct_message))
}

/// Friend routes
fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::friend::list_friends))
        .route("/requests", post(handlers::friend::send_friend_request))
        .route("/{user_id}/accept", post(handlers::friend::accept_friend_request))
        .route("/{user_id}", delete(handlers::friend::remove_friend))
}

/// Server routes
fn server_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::server::create_server))
        .route("/", get(handlers::server::list_servers))
        .route("/{server_id}/channels", get(handlers::server::list_channels))
        .route("/{server_id}/channels", post(handlers::server::create_channel))
        .route("/{server_id}/members", get(handlers::server::list_members))
}

/// Channel routes
fn channel_routes() -> Router<AppState> {
    Router::new()
        .route("/{channel_id}/messages", get(handlers::message::get_channel_messages))
        .route("/{channel_id}/messages", post(handlers::message::send_channel_message))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new().route("/{message_id}", delete(handlers::message::delete_message))
}
