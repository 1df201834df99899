use crate::io::atomic_write_str;
use crate::paths::{ConfigError, MusiclibPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

// toml_edit para escribir preservando comentarios del usuario
use toml_edit::{DocumentMut, Item};

/// Acceso por secciones (`[storage]`, `[events]`, ...) al archivo de configuración.
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: MusiclibPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: MusiclibPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &MusiclibPaths {
    &self.paths
  }

  /// Igual que `load_section`, pero un archivo o una sección ausentes devuelven `T::default()`.
  ///
  /// Las claves que falten dentro de la sección las completa `#[serde(default)]` del tipo.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    match self.read_table()?.and_then(|mut table| table.remove(section)) {
      Some(value) => decode(section, value),
      None => Ok(T::default()),
    }
  }

  /// Tabla raíz del archivo; `None` si todavía no existe.
  fn read_table(&self) -> Result<Option<toml::Table>, ConfigError> {
    match fs::read_to_string(self.paths.config_file()) {
      Ok(content) => Ok(Some(toml::from_str(&content)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  /// Documento editable; vacío si el archivo no existe.
  fn read_document(&self) -> Result<DocumentMut, ConfigError> {
    match fs::read_to_string(self.paths.config_file()) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}"))),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(DocumentMut::new()),
      Err(e) => Err(e.into()),
    }
  }
}

fn decode<T: DeserializeOwned>(section: &str, value: toml::Value) -> Result<T, ConfigError> {
  value
    .try_into()
    .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let value = self
      .read_table()?
      .and_then(|mut table| table.remove(section))
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {}", path.display())))?;

    decode(section, value)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc = self.read_document()?;

    // `toml` serializa la sección sin cabecera; `toml_edit` la vuelve a leer
    // como item para reemplazar solo esa tabla y dejar comentarios y orden.
    let rendered =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;
    let item: Item = rendered
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();
    doc[section] = item;

    atomic_write_str(&self.paths.config_file(), &doc.to_string())?;
    Ok(())
  }
}
