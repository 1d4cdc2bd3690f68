//! Telegram gateway against a mock Bot API

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use teloxide::types::ChatId;
use AdRelay::services::{DeliveryAdapter, ImageStorage, TelegramGateway};

#[tokio::test]
async fn test_send_text_succeeds() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message_ok(-1001).await;
    let gateway = TelegramGateway::new(mock.bot());

    assert!(gateway.send_text(ChatId(-1001), "Sale!").await.is_ok());
    assert_eq!(mock.request_count("sendMessage").await, 1);
}

#[tokio::test]
async fn test_kicked_bot_is_reported_unreachable() {
    let mock = TelegramMockServer::new().await;
    mock.mock_bot_kicked("sendMessage").await;
    let gateway = TelegramGateway::new(mock.bot());

    let result = gateway.send_text(ChatId(-1002), "Sale!").await;

    assert_matches!(result, Err(unreachable) if unreachable.chat_id == -1002);
}

#[tokio::test]
async fn test_failed_photo_is_reported_unreachable() {
    let mock = TelegramMockServer::new().await;
    mock.mock_bot_kicked("sendPhoto").await;
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("p.jpg");
    tokio::fs::write(&image, b"jpeg").await.unwrap();
    let gateway = TelegramGateway::new(mock.bot());

    let result = gateway.send_photo(ChatId(-1003), image, "caption").await;

    assert_matches!(result, Err(unreachable) if unreachable.chat_id == -1003);
    assert_eq!(mock.request_count("sendPhoto").await, 1);
}

#[tokio::test]
async fn test_photo_is_downloaded_by_file_id() {
    let mock = TelegramMockServer::new().await;
    mock.mock_photo_file("AgACAgIAAxkBAAIB", "photos/file_0.jpg", b"jpeg-bytes").await;
    let dir = tempfile::tempdir().unwrap();
    let storage = ImageStorage::new(dir.path());
    let gateway = TelegramGateway::new(mock.bot());

    let stored = storage.store_photo(&gateway, "AgACAgIAAxkBAAIB").await.unwrap();

    assert_eq!(stored.file_name, "AgACAgIAAxkBAAIB.jpg");
    assert!(stored.downloaded);
    assert_eq!(tokio::fs::read(storage.path_for(&stored.file_name)).await.unwrap(), b"jpeg-bytes");
    assert_eq!(mock.request_count("getFile").await, 1);
}
