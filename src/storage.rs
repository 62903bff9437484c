use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64ct::Encoding;
use chrono::{DateTime, Utc};
use rand::RngCore;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entities;
use crate::errors::SemilleroError;
use crate::settings::{BackendKind, Storage as StorageCfg};

/// Key/value persistence the entity store writes through.
///
/// Every value is a complete JSON document; a write replaces whatever was
/// stored under the key before.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SemilleroError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), SemilleroError>;
    async fn remove(&self, key: &str) -> Result<(), SemilleroError>;
}

/// A record type with its own persisted collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, appended to the store's key prefix.
    const COLLECTION: &'static str;
    /// Human readable type name for errors and logs.
    const KIND: &'static str;
    /// Creation input: every field except the generated ones.
    type New: Send;

    fn id(&self) -> &str;
    fn from_new(new: Self::New, id: String, now: DateTime<Utc>) -> Self;
}

pub async fn init(cfg: &StorageCfg) -> Result<Store, SemilleroError> {
    let backend: Arc<dyn Backend> = match cfg.backend {
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
        BackendKind::File => Arc::new(FileBackend::new(&cfg.path)),
        BackendKind::Sqlite => Arc::new(SqlBackend::connect(&cfg.url).await?),
    };
    tracing::debug!(backend = ?cfg.backend, prefix = %cfg.key_prefix, "Initialized storage");
    Ok(Store::new(backend, cfg.key_prefix.clone()))
}

pub fn random_id() -> String {
    let mut bytes = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64ct::Base64UrlUnpadded::encode_string(&bytes)
}

// ---------- Entity store ----------

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
    prefix: String,
}

impl Store {
    pub fn new(backend: Arc<dyn Backend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Ephemeral store with the default `semillero_` prefix.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), "semillero_")
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn collection_key<T: Record>(&self) -> String {
        format!("{}{}", self.prefix, T::COLLECTION)
    }

    /// All records of `T`. A missing, unreadable or corrupt collection reads
    /// as empty.
    pub async fn list<T: Record>(&self) -> Vec<T> {
        let key = self.collection_key::<T>();
        self.read_value::<Vec<T>>(&key).await.unwrap_or_default()
    }

    /// Like [`Store::list`] but surfaces backend and decode failures. Every
    /// read that feeds a write goes through here so a failed read can never
    /// be written back as an empty collection.
    pub(crate) async fn try_list<T: Record>(&self) -> Result<Vec<T>, SemilleroError> {
        let key = self.collection_key::<T>();
        match self.backend.get(&key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn find<T: Record>(&self, id: &str) -> Option<T> {
        self.list::<T>().await.into_iter().find(|r| r.id() == id)
    }

    pub async fn is_empty<T: Record>(&self) -> bool {
        self.list::<T>().await.is_empty()
    }

    pub async fn create<T: Record>(&self, new: T::New) -> Result<T, SemilleroError> {
        let mut records = self.try_list::<T>().await?;
        let record = T::from_new(new, random_id(), Utc::now());
        records.push(record.clone());
        self.replace_all(&records).await?;
        tracing::debug!(kind = T::KIND, id = record.id(), "Created record");
        Ok(record)
    }

    /// Apply `apply` to the record with `id`. Returns `false` when no such
    /// record exists, in which case nothing is written.
    pub async fn update<T, F>(&self, id: &str, apply: F) -> Result<bool, SemilleroError>
    where
        T: Record,
        F: FnOnce(&mut T),
    {
        let mut records = self.try_list::<T>().await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        apply(record);
        self.replace_all(&records).await?;
        Ok(true)
    }

    /// Returns `false` when no record with `id` exists.
    pub async fn delete<T: Record>(&self, id: &str) -> Result<bool, SemilleroError> {
        let records = self.try_list::<T>().await?;
        let before = records.len();
        let kept: Vec<T> = records.into_iter().filter(|r| r.id() != id).collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.replace_all(&kept).await?;
        tracing::debug!(kind = T::KIND, id, "Deleted record");
        Ok(true)
    }

    /// Overwrite the whole collection.
    pub async fn replace_all<T: Record>(&self, records: &[T]) -> Result<(), SemilleroError> {
        let key = self.collection_key::<T>();
        self.write_value(&key, &records).await
    }

    /// Read an unprefixed JSON value. Failures are logged and read as absent.
    pub async fn read_value<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let raw = match self.backend.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read from storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable stored value");
                None
            }
        }
    }

    pub async fn write_value<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
    ) -> Result<(), SemilleroError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json).await.map_err(|e| {
            tracing::error!(key, error = %e, "Failed to write to storage");
            e
        })
    }

    pub async fn remove_value(&self, key: &str) -> Result<(), SemilleroError> {
        self.backend.remove(key).await
    }
}

// ---------- Backends ----------

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted copy of every stored entry.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, SemilleroError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SemilleroError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SemilleroError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SemilleroError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(SemilleroError::Other(format!(
                "invalid storage key `{key}`"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, SemilleroError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SemilleroError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        // Write then rename so readers never observe a half-written file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SemilleroError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Key/value rows in the `collections` table.
#[derive(Debug, Clone)]
pub struct SqlBackend {
    db: DatabaseConnection,
}

impl SqlBackend {
    /// Connect and bring the schema up to date.
    pub async fn connect(url: &str) -> Result<Self, SemilleroError> {
        use migration::MigratorTrait;

        let db = Database::connect(url).await?;
        migration::Migrator::up(&db, None).await?;
        Ok(Self { db })
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Backend for SqlBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, SemilleroError> {
        let model = entities::Collection::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SemilleroError> {
        use entities::collection::{ActiveModel, Column};
        use sea_orm::sea_query::OnConflict;

        let row = ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(Utc::now().timestamp()),
        };

        entities::Collection::insert(row)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::Value, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SemilleroError> {
        entities::Collection::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
