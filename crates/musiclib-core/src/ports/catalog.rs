use async_trait::async_trait;

use crate::domain::{
  Album, AlbumId, Artist, ArtistId, Genre, GenreId, Lyrics, NewAlbum, NewArtist, NewSong, Song, SongId, UserId,
};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,
  /// Violación de unicidad (email repetido, perfil duplicado...).
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("storage error: {0}")]
  Storage(String),
}

/// Persistencia del catálogo (artistas, álbumes, canciones, géneros y letras).
///
/// Cada llamada es atómica respecto al almacén, pero dos llamadas consecutivas
/// no comparten transacción. Los adapters que bloquean (SQL) deben hacerlo
/// fuera de los hilos del runtime.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
  // --- Artistas ---
  async fn create_artist(&self, owner: UserId, artist: &NewArtist) -> Result<Artist, RepoError>;
  async fn find_artist(&self, id: ArtistId) -> Result<Option<Artist>, RepoError>;
  async fn update_artist(&self, artist: &Artist) -> Result<(), RepoError>;
  /// Borra el artista con sus álbumes y canciones, y los permisos de todos ellos.
  async fn delete_artist(&self, id: ArtistId) -> Result<(), RepoError>;
  async fn albums_of(&self, artist: ArtistId) -> Result<Vec<Album>, RepoError>;

  // --- Álbumes ---
  async fn create_album(&self, artist_id: ArtistId, album: &NewAlbum) -> Result<Album, RepoError>;
  async fn find_album(&self, id: AlbumId) -> Result<Option<Album>, RepoError>;
  async fn update_album(&self, album: &Album) -> Result<(), RepoError>;
  async fn delete_album(&self, id: AlbumId) -> Result<(), RepoError>;
  async fn songs_of(&self, album: AlbumId) -> Result<Vec<Song>, RepoError>;

  // --- Canciones ---
  /// Guarda la canción, enlaza los géneros existentes y su letra en una sola transacción.
  async fn create_song(&self, album: &Album, song: &NewSong) -> Result<Song, RepoError>;
  async fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError>;
  async fn update_song(&self, song: &Song) -> Result<(), RepoError>;
  async fn delete_song(&self, id: SongId) -> Result<(), RepoError>;
  async fn genres_of(&self, song: SongId) -> Result<Vec<Genre>, RepoError>;

  // --- Letras ---
  /// Reemplaza la letra completa de la canción.
  async fn upsert_lyrics(&self, lyrics: &Lyrics) -> Result<(), RepoError>;
  async fn find_lyrics(&self, song: SongId) -> Result<Option<Lyrics>, RepoError>;

  // --- Géneros ---
  async fn create_genre(&self, name: &str) -> Result<Genre, RepoError>;
  async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, RepoError>;
  /// Búsqueda exacta sin distinguir mayúsculas.
  async fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, RepoError>;
  async fn update_genre(&self, genre: &Genre) -> Result<(), RepoError>;
}
