use musiclib_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sección `[storage]` de `musiclib.toml`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,

  /// Conexiones máximas del pool r2d2.
  #[serde(default = "default_pool_size")]
  pub pool_size: u32,

  /// `PRAGMA busy_timeout` aplicado a cada conexión.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_pool_size() -> u32 {
  4
}

fn default_busy_timeout_ms() -> u64 {
  5_000
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = PATHS.data_dir.join("musiclib.db");
    StorageConfig {
      db_path,
      journal_mode: Some("WAL".to_string()),
      pool_size: default_pool_size(),
      busy_timeout_ms: default_busy_timeout_ms(),
    }
  }
}

impl StorageConfig {
  /// Config con una base en `db_path` y el resto por defecto. Útil en tests.
  pub fn at(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig {
      db_path: db_path.into(),
      journal_mode: Some("WAL".to_string()),
      pool_size: default_pool_size(),
      busy_timeout_ms: default_busy_timeout_ms(),
    }
  }

  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("storage")?;
    CONFIG_BACKEND.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("storage", self)
  }
}
