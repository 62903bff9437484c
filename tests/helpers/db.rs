use std::sync::Arc;

use semillero::storage::{FileBackend, SqlBackend, Store};
use tempfile::{NamedTempFile, TempDir};

/// Store backed by temporary files, removed on drop
pub struct TestStore {
    store: Store,
    _dir: Option<TempDir>,
    _db_file: Option<NamedTempFile>,
}

impl TestStore {
    /// One JSON file per key in a temporary directory
    pub fn file() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::new(Arc::new(FileBackend::new(dir.path())), "semillero_");
        Self {
            store,
            _dir: Some(dir),
            _db_file: None,
        }
    }

    /// Temporary SQLite database with migrations applied
    pub async fn sqlite() -> Self {
        let db_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = db_file.path().to_str().expect("Invalid temp file path");
        let db_url = format!("sqlite://{}?mode=rwc", db_path);

        let backend = SqlBackend::connect(&db_url)
            .await
            .expect("Failed to connect to test database");

        Self {
            store: Store::new(Arc::new(backend), "semillero_"),
            _dir: None,
            _db_file: Some(db_file),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
