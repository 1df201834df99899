use serde::{Deserialize, Serialize};

use crate::domain::{Album, AlbumId, Artist, ArtistId, Song, SongId};

/// Forma de transporte de un artista en los resultados de búsqueda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDto {
  pub id: ArtistId,
  pub name: String,
  pub description: Option<String>,
  pub formation_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDto {
  pub id: AlbumId,
  pub title: String,
  pub release_year: Option<i32>,
  pub cover_art_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDto {
  pub id: SongId,
  pub title: String,
  pub album_id: AlbumId,
  pub duration_secs: u32,
  pub file_path: String,
}

impl From<Artist> for ArtistDto {
  fn from(artist: Artist) -> Self {
    ArtistDto {
      id: artist.id,
      name: artist.name,
      description: artist.description,
      formation_year: artist.formation_year,
    }
  }
}

impl From<Album> for AlbumDto {
  fn from(album: Album) -> Self {
    AlbumDto {
      id: album.id,
      title: album.title,
      release_year: album.release_year,
      cover_art_url: album.cover_art_url,
    }
  }
}

impl From<Song> for SongDto {
  fn from(song: Song) -> Self {
    SongDto {
      id: song.id,
      title: song.title,
      album_id: song.album_id,
      duration_secs: song.duration_secs,
      file_path: song.file_path,
    }
  }
}
