use crate::domain::genre::Genre;
use crate::domain::ids::{AlbumId, ArtistId, GenreId, SongId};
use serde::{Deserialize, Serialize};

/// La Canción (Song): una pista concreta dentro de un álbum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  /// Identificador único de la canción dentro del sistema.
  pub id: SongId,
  /// Álbum que contiene la canción.
  pub album_id: AlbumId,
  /// Intérprete principal (heredado del álbum).
  pub artist_id: ArtistId,
  /// El título de la canción.
  pub title: String,
  /// Duración en segundos.
  pub duration_secs: u32,
  /// Ruta o URL del archivo de audio.
  pub file_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
  pub title: String,
  pub duration_secs: u32,
  pub file_path: String,
  /// Géneros a enlazar. Los ids que no existan se ignoran.
  #[serde(default)]
  pub genres: Vec<GenreId>,
  /// Texto de la canción, una estrofa por elemento.
  #[serde(default)]
  pub lyrics: Vec<String>,
}

/// Una estrofa. `number` es la posición dentro de la letra, desde 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Couplet {
  pub number: u32,
  pub text: String,
}

/// Letra completa de una canción.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
  pub song_id: SongId,
  pub couplets: Vec<Couplet>,
}

impl Lyrics {
  /// Numera las estrofas en el orden recibido.
  pub fn from_texts<I, S>(song_id: SongId, texts: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let couplets = texts
      .into_iter()
      .zip(0u32..)
      .map(|(text, number)| Couplet { number, text: text.into() })
      .collect();
    Self { song_id, couplets }
  }
}

/// Canción con sus géneros y su letra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongDetails {
  #[serde(flatten)]
  pub song: Song,
  pub genres: Vec<Genre>,
  pub lyrics: Option<Lyrics>,
}
