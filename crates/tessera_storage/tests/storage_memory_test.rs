//! Tests for the in-memory backend and the registry.

use std::sync::Arc;
use tessera_storage::{MemoryStorage, ObjectStore, OperationKind, StorageRegistry};

#[tokio::test]
async fn test_journal_records_every_call() {
    let storage = MemoryStorage::default();

    storage.put("a.png", b"1").await.unwrap();
    storage.stat("a.png").await.unwrap();
    storage.stat("b.png").await.unwrap();
    storage.get("a.png").await.unwrap();
    storage.delete("a.png").await.unwrap();
    assert!(storage.delete("a.png").await.is_err());

    let kinds: Vec<OperationKind> = storage
        .operations()
        .await
        .iter()
        .map(|op| *op.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::Put,
            OperationKind::Stat,
            OperationKind::Stat,
            OperationKind::Get,
            OperationKind::Delete,
            OperationKind::Delete,
        ]
    );
    assert_eq!(
        storage.operations_of(OperationKind::Stat).await,
        vec!["a.png".to_string(), "b.png".to_string()]
    );
}

#[tokio::test]
async fn test_paths_and_clear_journal() {
    let storage = MemoryStorage::new("//cdn.test");
    storage.put("b.png", b"1").await.unwrap();
    storage.put("a.png", b"2").await.unwrap();

    assert_eq!(storage.paths().await, vec!["a.png", "b.png"]);
    assert!(storage.contains("a.png").await);

    storage.clear_journal().await;
    assert!(storage.operations().await.is_empty());
    assert!(storage.contains("b.png").await);
}

#[tokio::test]
async fn test_registry_resolves_default_and_named() {
    let local: Arc<dyn ObjectStore> = Arc::new(MemoryStorage::new("local"));
    let cdn: Arc<dyn ObjectStore> = Arc::new(MemoryStorage::new("cdn"));
    let registry = StorageRegistry::new("local")
        .with_backend("local", local)
        .with_backend("cdn", cdn);

    assert_eq!(registry.names(), vec!["cdn", "local"]);
    assert_eq!(registry.resolve(None).unwrap().endpoint(), "local");
    assert_eq!(registry.resolve(Some("cdn")).unwrap().endpoint(), "cdn");

    let err = registry.resolve(Some("s3")).err().unwrap();
    assert!(err.to_string().contains("Unknown storage backend: s3"));
}
