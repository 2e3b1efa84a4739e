//! Server, membership, and channel flows over the in-memory backend.

mod common;

use std::sync::atomic::Ordering;

use common::TestBackend;
use pretty_assertions::assert_eq;

use relay_server::application::services::{
    CreateChannelDto, CreateServerDto, ServerError, ServerService, DEFAULT_CHANNEL_NAME,
};
use relay_server::domain::{ChannelType, MemberRole};

fn server_dto(name: &str) -> CreateServerDto {
    CreateServerDto {
        name: name.to_string(),
        icon_url: None,
    }
}

fn channel_dto(name: &str, channel_type: ChannelType) -> CreateChannelDto {
    CreateChannelDto {
        name: name.to_string(),
        channel_type,
    }
}

#[tokio::test]
async fn create_server_seeds_owner_membership_and_default_channel() {
    let backend = TestBackend::new();

    let server = backend
        .servers
        .create_server(1, server_dto("lounge"))
        .await
        .expect("create_server failed");

    let members = backend
        .servers
        .list_members(server.id)
        .await
        .expect("list_members failed");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, 1);
    assert_eq!(members[0].role, MemberRole::Owner);

    let channels = backend
        .servers
        .list_channels(server.id)
        .await
        .expect("list_channels failed");
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].name, DEFAULT_CHANNEL_NAME);
    assert_eq!(channels[0].position, 0);
}

#[tokio::test]
async fn create_server_requires_a_name() {
    let backend = TestBackend::new();

    let result = backend.servers.create_server(1, server_dto("  ")).await;

    assert!(matches!(result, Err(ServerError::NameRequired)));
}

#[tokio::test]
async fn failed_creation_leaves_no_partial_rows() {
    let backend = TestBackend::new();
    backend
        .server_store
        .fail_next_create
        .store(true, Ordering::SeqCst);

    let result = backend.servers.create_server(1, server_dto("doomed")).await;
    assert!(result.is_err());

    assert!(backend.server_store.servers.lock().unwrap().is_empty());
    assert!(backend.server_store.members.lock().unwrap().is_empty());
    assert!(backend.server_store.channels.lock().unwrap().is_empty());
}

#[tokio::test]
async fn channel_positions_follow_creation_order() {
    let backend = TestBackend::new();

    let server = backend
        .servers
        .create_server(1, server_dto("lounge"))
        .await
        .expect("create_server failed");

    let music = backend
        .servers
        .create_channel(server.id, channel_dto("music", ChannelType::Voice))
        .await
        .expect("create_channel failed");
    let memes = backend
        .servers
        .create_channel(server.id, channel_dto("memes", ChannelType::Text))
        .await
        .expect("create_channel failed");

    // Default channel holds position 0; later channels extend the tail.
    assert_eq!(music.position, 1);
    assert_eq!(memes.position, 2);

    let channels = backend
        .servers
        .list_channels(server.id)
        .await
        .expect("list_channels failed");
    let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec![DEFAULT_CHANNEL_NAME, "music", "memes"]);
}

#[tokio::test]
async fn create_channel_on_unknown_server_fails() {
    let backend = TestBackend::new();

    let result = backend
        .servers
        .create_channel(999, channel_dto("memes", ChannelType::Text))
        .await;

    assert!(matches!(result, Err(ServerError::NotFound)));
}

#[tokio::test]
async fn server_listing_is_scoped_to_membership_and_newest_first() {
    let backend = TestBackend::new();

    let first = backend
        .servers
        .create_server(1, server_dto("first"))
        .await
        .expect("create_server failed");
    let second = backend
        .servers
        .create_server(1, server_dto("second"))
        .await
        .expect("create_server failed");
    backend
        .servers
        .create_server(2, server_dto("someone elses"))
        .await
        .expect("create_server failed");

    let mine = backend.servers.list_servers(1).await.expect("list_servers failed");

    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, second.id);
    assert_eq!(mine[1].id, first.id);
}
