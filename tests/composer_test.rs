//! Saving wizard drafts

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use assert_matches::assert_matches;
use helpers::*;
use AdRelay::database::{MemoryStore, RecordStore};
use AdRelay::services::{AdComposer, AdPayload, ImageStorage};
use AdRelay::state::{AdDraft, ConversationContext, WizardStep};
use AdRelay::utils::errors::AdRelayError;

const OPERATOR: i64 = 10;

fn draft(body: &str, photos: &[&str], contact: Option<&str>) -> AdDraft {
    AdDraft {
        body: Some(body.to_string()),
        photo_file_ids: photos.iter().map(|p| p.to_string()).collect(),
        contact: contact.map(str::to_string),
    }
}

async fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return names;
    };
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    names
}

#[tokio::test]
async fn test_save_text_only_draft() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let composer = AdComposer::new(store.clone(), ImageStorage::new(dir.path()), FakePhotos::new());

    let (ad, images) = composer.save(draft("  Sale!  ", &[], Some("+123")), OPERATOR).await.unwrap();

    assert_eq!(images, 0);
    assert_eq!(ad.body, "Sale!");
    assert_eq!(ad.contact.as_deref(), Some("+123"));
    assert!(!ad.active);
    assert!(store.list_images(ad.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_keeps_photo_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let photos = FakePhotos::new();
    let composer = AdComposer::new(store.clone(), ImageStorage::new(dir.path()), photos.clone());

    let (ad, count) = composer
        .save(draft("Album", &["third", "first", "second"], None), OPERATOR)
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(photos.downloads.load(Ordering::SeqCst), 3);
    let stored: Vec<String> = store
        .list_images(ad.id)
        .await
        .unwrap()
        .into_iter()
        .map(|image| image.file_path)
        .collect();
    assert_eq!(stored, vec!["third.jpg", "first.jpg", "second.jpg"]);
    assert_eq!(files_in(dir.path()).await, vec!["first.jpg", "second.jpg", "third.jpg"]);
}

#[tokio::test]
async fn test_blank_contact_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let composer = AdComposer::new(store, ImageStorage::new(dir.path()), FakePhotos::new());

    let (ad, _) = composer.save(draft("Body", &[], Some("   ")), OPERATOR).await.unwrap();
    assert_eq!(ad.contact, None);
    assert_eq!(ad.caption(), "Body");
}

#[tokio::test]
async fn test_invalid_drafts_are_rejected_before_download() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let photos = FakePhotos::new();
    let composer = AdComposer::new(store.clone(), ImageStorage::new(dir.path()), photos.clone());

    assert_matches!(
        composer.save(AdDraft::default(), OPERATOR).await,
        Err(AdRelayError::InvalidInput(_))
    );
    let long_caption = "x".repeat(1100);
    assert_matches!(
        composer.save(draft(&long_caption, &["p"], None), OPERATOR).await,
        Err(AdRelayError::InvalidInput(_))
    );

    assert_eq!(photos.downloads.load(Ordering::SeqCst), 0);
    assert!(store.list_advertisements().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_download_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let composer = AdComposer::new(store.clone(), ImageStorage::new(dir.path()), FakePhotos::failing_on("broken"));

    let result = composer.save(draft("Body", &["ok", "broken"], None), OPERATOR).await;

    assert!(result.is_err());
    assert!(files_in(dir.path()).await.is_empty());
    assert!(store.list_advertisements().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_removes_downloaded_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FlakyStore::new());
    store.fail_create(1);
    let composer = AdComposer::new(store.clone(), ImageStorage::new(dir.path()), FakePhotos::new());

    let result = composer.save(draft("Body", &["a", "b"], None), OPERATOR).await;

    assert_matches!(result, Err(AdRelayError::StoreUnavailable(_)));
    assert!(files_in(dir.path()).await.is_empty());
    assert!(store.list_advertisements().await.unwrap().is_empty());

    // The same draft saves once the store is back
    let (ad, count) = composer.save(draft("Body", &["a", "b"], None), OPERATOR).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(store.list_images(ad.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_save_keeps_photos_of_existing_advertisements() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let images = ImageStorage::new(dir.path());
    let composer = AdComposer::new(store.clone(), images.clone(), FakePhotos::new());
    let (original, _) = composer.save(draft("Original", &["shared"], None), OPERATOR).await.unwrap();

    let photos = FakePhotos::failing_on("broken");
    let reusing = AdComposer::new(store.clone(), images.clone(), photos.clone());
    let result = reusing.save(draft("Reuse", &["shared", "fresh", "broken"], None), OPERATOR).await;

    assert!(result.is_err());
    assert_eq!(photos.downloads.load(Ordering::SeqCst), 1);
    assert_eq!(files_in(dir.path()).await, vec!["shared.jpg"]);
    assert_eq!(store.list_advertisements().await.unwrap().len(), 1);

    let payload = AdPayload::load(store.as_ref(), &images, &original).await.unwrap();
    assert_eq!(payload.kind(), "photo");
}

#[tokio::test]
async fn test_wizard_album_collected_across_messages() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let composer = AdComposer::new(store.clone(), ImageStorage::new(dir.path()), FakePhotos::new());

    let mut context = ConversationContext::new(OPERATOR);
    context.begin_composition();
    context.await_input(WizardStep::AwaitingImage).unwrap();
    for file_id in ["p1", "p2", "p3"] {
        context.accept_photo(file_id).unwrap();
    }
    context.await_input(WizardStep::AwaitingBody).unwrap();
    context.accept_text("Three photos").unwrap();
    context.await_input(WizardStep::AwaitingContact).unwrap();
    context.accept_text("@seller").unwrap();

    let (ad, count) = composer.save(context.finish(), OPERATOR).await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(ad.caption(), "Three photos\nContact: @seller");
    assert!(!context.is_composing());
}
