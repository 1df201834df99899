use serde::{Deserialize, Serialize};
use std::fmt;

/// Declara un identificador numérico opaco.
///
/// Los IDs los asigna el almacenamiento (autoincremental), por eso no hay `new()`
/// aleatorio como en un UUID: se construyen siempre desde el valor persistido.
macro_rules! numeric_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(u64);

    impl $name {
      pub const fn new(raw: u64) -> Self {
        $name(raw)
      }

      /// Devuelve el valor numérico interno.
      pub const fn get(&self) -> u64 {
        self.0
      }
    }

    impl From<u64> for $name {
      fn from(raw: u64) -> Self {
        $name(raw)
      }
    }

    impl From<$name> for u64 {
      fn from(id: $name) -> Self {
        id.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }
  };
}

numeric_id!(
  /// Identificador de un usuario registrado.
  UserId
);

numeric_id!(
  /// Identificador de un artista.
  ArtistId
);

numeric_id!(
  /// Identificador de un álbum.
  AlbumId
);

numeric_id!(
  /// Identificador de una canción.
  SongId
);

numeric_id!(
  /// Identificador de un género. Los géneros no son recursos con dueño.
  GenreId
);

numeric_id!(
  /// Identificador genérico de un recurso protegido por permisos.
  ///
  /// Solo tiene sentido junto a su [`ResourceKind`](super::permission::ResourceKind):
  /// el artista 7 y la canción 7 son recursos distintos.
  ResourceId
);

impl From<ArtistId> for ResourceId {
  fn from(id: ArtistId) -> Self {
    ResourceId(id.get())
  }
}

impl From<AlbumId> for ResourceId {
  fn from(id: AlbumId) -> Self {
    ResourceId(id.get())
  }
}

impl From<SongId> for ResourceId {
  fn from(id: SongId) -> Self {
    ResourceId(id.get())
  }
}
