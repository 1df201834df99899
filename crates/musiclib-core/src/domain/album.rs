use crate::domain::ids::{AlbumId, ArtistId};
use crate::domain::song::Song;
use serde::{Deserialize, Serialize};

/// Un álbum publicado por un artista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
  pub id: AlbumId,
  /// Artista al que pertenece el álbum.
  pub artist_id: ArtistId,
  pub title: String,
  pub release_year: Option<i32>,
  /// URL de la portada, si existe.
  pub cover_art_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlbum {
  pub title: String,
  pub release_year: Option<i32>,
  pub cover_art_url: Option<String>,
}

/// Álbum con su lista de canciones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumDetails {
  #[serde(flatten)]
  pub album: Album,
  pub songs: Vec<Song>,
}
