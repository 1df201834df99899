//! Tipos de la búsqueda multi-dominio: consulta, resultado y diagnóstico.

mod dto;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub use dto::{AlbumDto, ArtistDto, SongDto};

pub const MAX_LIMIT: u32 = 100;

/// Dominio sobre el que se puede buscar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
  Artist,
  Album,
  Song,
}

impl SearchKind {
  pub const ALL: [SearchKind; 3] = [SearchKind::Artist, SearchKind::Album, SearchKind::Song];

  pub fn as_str(&self) -> &'static str {
    match self {
      SearchKind::Artist => "artist",
      SearchKind::Album => "album",
      SearchKind::Song => "song",
    }
  }
}

impl fmt::Display for SearchKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SearchKind {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "artist" => Ok(SearchKind::Artist),
      "album" => Ok(SearchKind::Album),
      "song" => Ok(SearchKind::Song),
      other => Err(CoreError::Validation(format!("invalid search type: {other}"))),
    }
  }
}

/// Consulta ya validada.
///
/// El agregador confía en estos límites; esta es la forma que tiene la capa
/// de entrada (HTTP, CLI) de construirlos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  pub types: BTreeSet<SearchKind>,
  pub text: String,
  pub limit: u32,
  pub offset: u32,
}

impl SearchQuery {
  /// Valida la entrada cruda. Una lista de tipos vacía significa "todos".
  pub fn new<I, S>(types: I, text: impl Into<String>, limit: i64, offset: i64) -> Result<Self, CoreError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut kinds = BTreeSet::new();
    for t in types {
      kinds.insert(t.as_ref().parse::<SearchKind>()?);
    }
    if kinds.is_empty() {
      kinds.extend(SearchKind::ALL);
    }

    if !(1..=MAX_LIMIT as i64).contains(&limit) {
      return Err(CoreError::Validation(format!("invalid limit value (1-{MAX_LIMIT})")));
    }
    if offset < 0 || offset > u32::MAX as i64 {
      return Err(CoreError::Validation("invalid offset value".into()));
    }

    Ok(Self { types: kinds, text: text.into(), limit: limit as u32, offset: offset as u32 })
  }
}

/// Paginación devuelta en cada sección. `limit` y `offset` repiten la
/// petición del llamador; `total` es lo que informó el proveedor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  pub limit: u32,
  pub offset: u32,
  pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchItems {
  Artists(Vec<ArtistDto>),
  Albums(Vec<AlbumDto>),
  Songs(Vec<SongDto>),
}

impl SearchItems {
  pub fn len(&self) -> usize {
    match self {
      SearchItems::Artists(v) => v.len(),
      SearchItems::Albums(v) => v.len(),
      SearchItems::Songs(v) => v.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Resultado parcial de un dominio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSection {
  #[serde(rename = "data")]
  pub items: SearchItems,
  pub pagination: Pagination,
}

/// Resultado agregado. Solo contiene claves de tipos pedidos cuya rama terminó bien.
pub type SearchResult = BTreeMap<SearchKind, SearchSection>;

/// Motivo por el que una rama no aportó nada al resultado.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchFailure {
  #[error("provider error: {0}")]
  Provider(String),

  #[error("deadline of {0:?} exceeded")]
  Timeout(Duration),

  /// La tarea de la rama terminó sin resultado (panic o cancelación).
  #[error("branch aborted: {0}")]
  Aborted(String),
}

/// Resultado más el canal de diagnóstico con los fallos por tipo.
///
/// Las claves de `result` y de `failures` son disjuntas y su unión son los tipos pedidos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
  pub result: SearchResult,
  pub failures: BTreeMap<SearchKind, SearchFailure>,
}
