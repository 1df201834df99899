use directories::ProjectDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza un directorio base (modo portable / tests).
pub const BASE_DIR_ENV: &str = "MUSICLIB_BASE_DIR";

const CONFIG_FILE: &str = "musiclib.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Dónde viven el archivo de configuración y los datos (la base SQLite).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusiclibPaths {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl MusiclibPaths {
  /// `MUSICLIB_BASE_DIR` si está definida; si no, los directorios del sistema.
  pub fn new() -> Result<Self, ConfigError> {
    Self::resolve(std::env::var_os(BASE_DIR_ENV))
  }

  /// Layout portable: `base/config` y `base/data`.
  pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let base = base.as_ref();
    Self::create(base.join("config"), base.join("data"))
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE)
  }

  fn resolve(base_override: Option<OsString>) -> Result<Self, ConfigError> {
    if let Some(base) = base_override.filter(|b| !b.is_empty()) {
      return Self::at(base);
    }

    let dirs = ProjectDirs::from("com", "musiclib", "musiclib").ok_or(ConfigError::Directories)?;
    Self::create(dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf())
  }

  fn create(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(Self { config_dir, data_dir })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn portable_layout_hangs_from_base_and_is_created() {
    let tmp = tempdir().unwrap();

    let paths = MusiclibPaths::at(tmp.path().join("portable")).unwrap();

    assert_eq!(paths.config_file(), tmp.path().join("portable/config/musiclib.toml"));
    assert!(paths.config_dir.is_dir());
    assert!(paths.data_dir.is_dir());
  }

  #[test]
  fn base_dir_override_wins_over_system_dirs() {
    let tmp = tempdir().unwrap();

    let paths = MusiclibPaths::resolve(Some(tmp.path().as_os_str().to_owned())).unwrap();

    assert_eq!(paths, MusiclibPaths::at(tmp.path()).unwrap());
  }
}
