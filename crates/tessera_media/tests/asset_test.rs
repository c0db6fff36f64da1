//! Tests for URLs, styles and storage operations of media assets.

use std::sync::Arc;
use tessera_core::{Constraints, FieldOptions, Rectangle, Size};
use tessera_error::{StorageErrorKind, TesseraErrorKind, ValidationErrorKind};
use tessera_media::{AssetKind, MediaAsset, UploadInput, UploadPart};
use tessera_storage::{MemoryStorage, ObjectStore, OperationKind};

fn stored(kind: AssetKind, url: &str) -> MediaAsset {
    let mut asset = MediaAsset::new(kind);
    asset
        .scan_bytes(
            serde_json::json!({"FileName": "cat.png", "Url": url, "FileSize": 100})
                .to_string()
                .as_bytes(),
        )
        .unwrap();
    asset
}

#[test]
fn test_style_urls() {
    let asset = stored(AssetKind::Image, "/system/users/1/avatar/cat.png");

    assert_eq!(asset.url_for(""), "/system/users/1/avatar/cat.png");
    assert_eq!(asset.url_for("thumb"), "/system/users/1/avatar/cat.thumb.png");
    assert_eq!(asset.ext(), "png");
    assert!(asset.is_image());
    assert!(!asset.is_video());
}

#[test]
fn test_empty_asset_has_no_urls() {
    let asset = MediaAsset::new(AssetKind::Image);
    assert_eq!(asset.url(), "");
    assert_eq!(asset.url_for("thumb"), "");
    assert_eq!(asset.full_url(None), "");
    assert!(asset.paths().is_empty());
}

#[test]
fn test_full_url_without_endpoint_stays_absolute() {
    let asset = stored(AssetKind::File, "/system/cat.png");
    assert_eq!(asset.full_url(None), "/system/cat.png");
}

#[test]
fn test_full_url_is_protocol_relative_under_endpoint() {
    let storage: Arc<dyn ObjectStore> = Arc::new(MemoryStorage::new("https://cdn.example.com/"));
    let asset = stored(AssetKind::Image, "/system/cat.png").with_storage(storage);

    assert_eq!(asset.full_url(None), "//cdn.example.com/system/cat.png");
    assert_eq!(
        asset.full_url(Some("thumb")),
        "//cdn.example.com/system/cat.thumb.png"
    );

    let uncached = asset.full_url_uncached(None);
    assert!(uncached.starts_with("//cdn.example.com/system/cat.png?_="));
}

#[test]
fn test_export_uses_endpoint() {
    let storage: Arc<dyn ObjectStore> = Arc::new(MemoryStorage::new("http://cdn.example.com"));
    let asset = stored(AssetKind::File, "/system/cat.png").with_storage(storage);

    let exported: serde_json::Value = serde_json::from_str(&asset.export().unwrap()).unwrap();
    assert_eq!(exported["Url"], "//cdn.example.com/system/cat.png");
}

#[test]
fn test_declared_sizes_become_styles() {
    let options = FieldOptions::parse("sizes:thumb=50x50,medium=300x200");
    let mut asset = MediaAsset::with_options(AssetKind::Image, options).unwrap();
    asset
        .scan_bytes(br#"{"FileName": "a.png", "Url": "/a.png"}"#)
        .unwrap();

    assert_eq!(asset.style_names(), vec!["medium", "original", "thumb"]);
    assert_eq!(asset.effective_sizes()["medium"], Size::new(300, 200));
    assert_eq!(
        asset.paths(),
        vec!["/a.png", "/a.medium.png", "/a.original.png", "/a.thumb.png"]
    );
}

#[test]
fn test_request_crop_implies_size() {
    let mut asset = stored(AssetKind::Image, "/a.png");
    asset
        .request_crop("thumb", Rectangle::new(0, 0, 64, 48))
        .unwrap();

    assert!(asset.is_pending_crop());
    assert_eq!(asset.sizes()["thumb"], Size::new(64, 48));

    asset.set_size("thumb", Size::new(32, 24)).unwrap();
    asset
        .request_crop("thumb", Rectangle::new(0, 0, 100, 100))
        .unwrap();
    assert_eq!(asset.sizes()["thumb"], Size::new(32, 24));
}

#[test]
fn test_request_crop_checked_against_known_original() {
    let mut asset = MediaAsset::new(AssetKind::Image);
    asset
        .scan_bytes(
            br#"{"FileName": "a.png", "Url": "/a.png", "FileSize": 10, "OriginalSize": {"Width": 200, "Height": 100}}"#,
        )
        .unwrap();

    let err = asset
        .request_crop("thumb", Rectangle::new(150, 0, 100, 50))
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ValidationErrorKind::CropOutOfBounds { width: 200, height: 100, .. }
    ));
    assert!(!asset.crop_options().contains_key("thumb"));
    assert!(!asset.is_pending_crop());

    asset
        .request_crop("thumb", Rectangle::new(100, 0, 100, 100))
        .unwrap();
    // the original's own rectangle is measured against the unknown source
    asset
        .request_crop("original", Rectangle::new(0, 0, 400, 400))
        .unwrap();
}

#[test]
fn test_request_crop_rejects_degenerate_rectangle() {
    let mut asset = stored(AssetKind::Image, "/a.png");
    let err = asset
        .request_crop("thumb", Rectangle::new(0, 0, 0, 10))
        .unwrap_err();
    assert!(matches!(err.kind, ValidationErrorKind::InvalidRectangle { .. }));
}

#[test]
fn test_request_crop_rejected_for_files() {
    let mut asset = stored(AssetKind::File, "/a.png");
    let err = asset
        .request_crop("thumb", Rectangle::new(0, 0, 10, 10))
        .unwrap_err();
    assert!(err.to_string().contains("not an image"));
}

#[tokio::test]
async fn test_cleared_constraints_accept_any_image() {
    let mut strict = MediaAsset::new(AssetKind::Image);
    let err = strict
        .set(UploadInput::Part(UploadPart::from_bytes("anim.gif", vec![0u8; 10])))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), TesseraErrorKind::Validation(_)));
    assert!(strict.upload().is_none());

    let mut open = MediaAsset::new(AssetKind::Image).with_constraints(Constraints::none());
    open.set(UploadInput::Part(UploadPart::from_bytes("anim.gif", vec![0u8; 10])))
        .await
        .unwrap();
    assert!(open.constraints().is_empty());
    assert_eq!(open.file_name(), "anim.gif");
}

#[tokio::test]
async fn test_new_upload_supersedes_stored_file() {
    let mut asset = stored(AssetKind::Image, "/system/old.png");
    asset
        .set(UploadInput::Part(UploadPart::from_bytes("new.png", vec![0u8; 10])))
        .await
        .unwrap();

    assert_eq!(asset.superseded().len(), 1);
    assert_eq!(asset.superseded()[0].url(), "/system/old.png");
    assert_eq!(
        asset.superseded()[0].paths(),
        vec!["/system/old.png", "/system/old.original.png"]
    );
}

#[tokio::test]
async fn test_rescanning_same_identity_does_not_supersede() {
    let mut asset = stored(AssetKind::File, "/system/cat.png");
    asset
        .set(UploadInput::Json(r#"{"Url": "/system/cat.png"}"#.to_string()))
        .await
        .unwrap();
    assert!(asset.superseded().is_empty());
}

#[tokio::test]
async fn test_unbound_storage_is_an_error() {
    let asset = stored(AssetKind::File, "/a.png");
    let err = asset.remove("/a.png").await.unwrap_err();
    assert!(matches!(
        err.kind(),
        TesseraErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::Unbound(_))
    ));
}

#[tokio::test]
async fn test_store_retrieve_remove() {
    let storage = Arc::new(MemoryStorage::default());
    let asset = stored(AssetKind::File, "/a.txt").with_storage(storage.clone());

    asset.store("/a.txt", b"hello").await.unwrap();
    assert_eq!(asset.retrieve("/a.txt").await.unwrap(), b"hello");

    assert!(asset.remove("/a.txt").await.unwrap());
    assert!(!asset.remove("/a.txt").await.unwrap());
    assert_eq!(storage.operations_of(OperationKind::Delete).await.len(), 1);

    let err = asset.retrieve("/a.txt").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_all_is_idempotent() {
    let storage = Arc::new(MemoryStorage::default());
    let asset = stored(AssetKind::Image, "/a.png").with_storage(storage.clone());
    for path in asset.paths() {
        asset.store(&path, b"x").await.unwrap();
    }

    assert_eq!(asset.remove_all().await.unwrap(), 2);
    assert!(storage.paths().await.is_empty());
    assert_eq!(asset.remove_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_remove_superseded_removes_old_paths() {
    let storage = Arc::new(MemoryStorage::default());
    let mut asset = stored(AssetKind::Image, "/system/old.png").with_storage(storage.clone());
    asset.store("/system/old.png", b"raw").await.unwrap();
    asset.store("/system/old.original.png", b"orig").await.unwrap();

    asset
        .set(UploadInput::Part(UploadPart::from_bytes("new.png", vec![0u8; 10])))
        .await
        .unwrap();
    asset.assign_url("/system/new.png");

    assert_eq!(asset.remove_superseded().await.unwrap(), 2);
    assert!(asset.superseded().is_empty());
    assert!(storage.paths().await.is_empty());
}

#[tokio::test]
async fn test_remove_superseded_keeps_live_paths() {
    let storage = Arc::new(MemoryStorage::default());
    let mut asset = stored(AssetKind::Image, "/system/cat.png").with_storage(storage.clone());
    asset.store("/system/cat.png", b"old").await.unwrap();

    asset
        .set(UploadInput::Part(UploadPart::from_bytes("cat.png", vec![0u8; 10])))
        .await
        .unwrap();
    assert_eq!(asset.superseded().len(), 1);
    asset.assign_url("/system/cat.png");

    assert_eq!(asset.remove_superseded().await.unwrap(), 0);
    assert!(storage.contains("/system/cat.png").await);
    assert!(asset.superseded().is_empty());
}
