use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub storage: Storage,
    pub seed: Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    File,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub backend: BackendKind,
    /// Directory holding one JSON document per key (file backend)
    pub path: PathBuf,
    /// SeaORM connection string (sqlite backend)
    /// Example: sqlite://semillero.db?mode=rwc
    pub url: String,
    /// Prepended to every collection name, e.g. `semillero_projects`
    pub key_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Populate empty collections with the sample data set at startup
    #[serde(default = "default_seed_on_startup")]
    pub on_startup: bool,
}

fn default_seed_on_startup() -> bool {
    true
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            path: PathBuf::from("data"),
            url: "sqlite://semillero.db?mode=rwc".to_string(),
            key_prefix: "semillero_".to_string(),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            on_startup: default_seed_on_startup(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let defaults = Storage::default();
        let mut builder = config::Config::builder()
            .set_default("storage.backend", "file")
            .into_diagnostic()?
            .set_default("storage.path", defaults.path.to_string_lossy().to_string())
            .into_diagnostic()?
            .set_default("storage.url", defaults.url)
            .into_diagnostic()?
            .set_default("storage.key_prefix", defaults.key_prefix)
            .into_diagnostic()?
            .set_default("seed.on_startup", default_seed_on_startup())
            .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: SEMILLERO__STORAGE__BACKEND=sqlite, etc.
        builder = builder.add_source(config::Environment::with_prefix("SEMILLERO").separator("__"));

        let cfg = builder.build().into_diagnostic()?;
        let mut s: Settings = cfg.try_deserialize().into_diagnostic()?;

        if s.storage.path.is_relative() {
            s.storage.path = std::env::current_dir()
                .into_diagnostic()?
                .join(&s.storage.path);
        }

        Ok(s)
    }
}
