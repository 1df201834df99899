use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{
  Album, AlbumDetails, AlbumId, Artist, ArtistDetails, ArtistId, Genre, GenreId, Lyrics, NewAlbum, NewArtist,
  NewSong, Permission, ResourceId, ResourceKind, Song, SongDetails, SongId, UserId,
};
use crate::errors::CoreError;
use crate::ports::{CatalogRepository, PermissionStore, RepoError};
use crate::services::PermissionService;

/// Operaciones sobre el catálogo. Las escrituras pasan por la ACL.
///
/// Quien crea un recurso recibe `Edit` sobre él. Para modificar o borrar hace
/// falta `Edit`; para colgar un álbum de un artista (o una canción de un
/// álbum) hace falta `Edit` sobre el padre. Los géneros son compartidos y no
/// tienen dueño. Las lecturas son públicas.
pub struct CatalogService<C, P>
where
  C: CatalogRepository,
  P: PermissionStore,
{
  catalog: C,
  permissions: Arc<PermissionService<P>>,
}

impl<C, P> CatalogService<C, P>
where
  C: CatalogRepository,
  P: PermissionStore,
{
  pub fn new(catalog: C, permissions: Arc<PermissionService<P>>) -> Self {
    Self { catalog, permissions }
  }

  // -------- Artistas --------

  pub async fn create_artist(&self, owner: UserId, new: &NewArtist) -> Result<Artist, CoreError> {
    require_name(&new.name)?;
    let artist = self.catalog.create_artist(owner, new).await?;

    self.grant_owner(owner, artist.id, ResourceKind::Artist, self.catalog.delete_artist(artist.id)).await?;
    info!(artist_id = %artist.id, %owner, "artist created");
    Ok(artist)
  }

  pub async fn get_artist(&self, id: ArtistId) -> Result<ArtistDetails, CoreError> {
    let artist = self.catalog.find_artist(id).await?.ok_or(CoreError::NotFound)?;
    let albums = self.catalog.albums_of(id).await?;
    Ok(ArtistDetails { artist, albums })
  }

  pub async fn rename_artist(&self, actor: UserId, id: ArtistId, name: &str) -> Result<Artist, CoreError> {
    self.require_edit(actor, id, ResourceKind::Artist).await?;
    require_name(name)?;

    let mut artist = self.catalog.find_artist(id).await?.ok_or(CoreError::NotFound)?;
    artist.name = name.trim().to_string();
    self.catalog.update_artist(&artist).await?;
    Ok(artist)
  }

  /// Reemplaza nombre, descripción y año de formación.
  pub async fn update_artist(&self, actor: UserId, id: ArtistId, changes: &NewArtist) -> Result<Artist, CoreError> {
    self.require_edit(actor, id, ResourceKind::Artist).await?;
    require_name(&changes.name)?;

    let mut artist = self.catalog.find_artist(id).await?.ok_or(CoreError::NotFound)?;
    debug!(
      artist_id = %id,
      previous_name = %artist.name,
      name = %changes.name,
      previous_year = ?artist.formation_year,
      year = ?changes.formation_year,
      "updating artist"
    );
    artist.name = changes.name.trim().to_string();
    artist.description = changes.description.clone();
    artist.formation_year = changes.formation_year;
    self.catalog.update_artist(&artist).await?;
    Ok(artist)
  }

  pub async fn delete_artist(&self, actor: UserId, id: ArtistId) -> Result<(), CoreError> {
    self.require_edit(actor, id, ResourceKind::Artist).await?;
    self.catalog.find_artist(id).await?.ok_or(CoreError::NotFound)?;
    self.catalog.delete_artist(id).await?;
    info!(artist_id = %id, %actor, "artist deleted");
    Ok(())
  }

  // -------- Álbumes --------

  pub async fn create_album(&self, actor: UserId, artist_id: ArtistId, new: &NewAlbum) -> Result<Album, CoreError> {
    self.require_edit(actor, artist_id, ResourceKind::Artist).await?;
    require_name(&new.title)?;
    self.catalog.find_artist(artist_id).await?.ok_or(CoreError::NotFound)?;

    let album = self.catalog.create_album(artist_id, new).await?;
    self.grant_owner(actor, album.id, ResourceKind::Album, self.catalog.delete_album(album.id)).await?;
    info!(album_id = %album.id, %artist_id, "album created");
    Ok(album)
  }

  pub async fn get_album(&self, id: AlbumId) -> Result<AlbumDetails, CoreError> {
    let album = self.catalog.find_album(id).await?.ok_or(CoreError::NotFound)?;
    let songs = self.catalog.songs_of(id).await?;
    Ok(AlbumDetails { album, songs })
  }

  /// Un álbum de un artista cuyo dueño es `owner`; `NotFound` si pertenece a otro.
  pub async fn get_owned_album(&self, owner: UserId, id: AlbumId) -> Result<Album, CoreError> {
    let album = self.catalog.find_album(id).await?.ok_or(CoreError::NotFound)?;
    match self.catalog.find_artist(album.artist_id).await? {
      Some(artist) if artist.owner_id == owner => Ok(album),
      _ => Err(CoreError::NotFound),
    }
  }

  pub async fn rename_album(&self, actor: UserId, id: AlbumId, title: &str) -> Result<Album, CoreError> {
    self.require_edit(actor, id, ResourceKind::Album).await?;
    require_name(title)?;

    let mut album = self.catalog.find_album(id).await?.ok_or(CoreError::NotFound)?;
    album.title = title.trim().to_string();
    self.catalog.update_album(&album).await?;
    Ok(album)
  }

  pub async fn delete_album(&self, actor: UserId, id: AlbumId) -> Result<(), CoreError> {
    self.require_edit(actor, id, ResourceKind::Album).await?;
    self.catalog.find_album(id).await?.ok_or(CoreError::NotFound)?;
    self.catalog.delete_album(id).await?;
    info!(album_id = %id, %actor, "album deleted");
    Ok(())
  }

  // -------- Canciones --------

  /// Crea la canción con sus géneros y su letra. Los géneros desconocidos se ignoran.
  pub async fn create_song(&self, actor: UserId, album_id: AlbumId, new: &NewSong) -> Result<Song, CoreError> {
    self.require_edit(actor, album_id, ResourceKind::Album).await?;
    require_name(&new.title)?;
    let album = self.catalog.find_album(album_id).await?.ok_or(CoreError::NotFound)?;

    let song = self.catalog.create_song(&album, new).await?;
    self.grant_owner(actor, song.id, ResourceKind::Song, self.catalog.delete_song(song.id)).await?;
    info!(song_id = %song.id, %album_id, genres = new.genres.len(), couplets = new.lyrics.len(), "song created");
    Ok(song)
  }

  pub async fn get_song(&self, id: SongId) -> Result<SongDetails, CoreError> {
    let song = self.catalog.find_song(id).await?.ok_or(CoreError::NotFound)?;
    let genres = self.catalog.genres_of(id).await?;
    let lyrics = self.catalog.find_lyrics(id).await?;
    Ok(SongDetails { song, genres, lyrics })
  }

  pub async fn rename_song(&self, actor: UserId, id: SongId, title: &str) -> Result<Song, CoreError> {
    self.require_edit(actor, id, ResourceKind::Song).await?;
    require_name(title)?;

    let mut song = self.catalog.find_song(id).await?.ok_or(CoreError::NotFound)?;
    song.title = title.trim().to_string();
    self.catalog.update_song(&song).await?;
    Ok(song)
  }

  /// Reemplaza la letra entera de la canción.
  pub async fn set_lyrics<I, S>(&self, actor: UserId, id: SongId, couplets: I) -> Result<Lyrics, CoreError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.require_edit(actor, id, ResourceKind::Song).await?;
    self.catalog.find_song(id).await?.ok_or(CoreError::NotFound)?;

    let lyrics = Lyrics::from_texts(id, couplets);
    self.catalog.upsert_lyrics(&lyrics).await?;
    debug!(song_id = %id, couplets = lyrics.couplets.len(), "lyrics replaced");
    Ok(lyrics)
  }

  pub async fn delete_song(&self, actor: UserId, id: SongId) -> Result<(), CoreError> {
    self.require_edit(actor, id, ResourceKind::Song).await?;
    self.catalog.find_song(id).await?.ok_or(CoreError::NotFound)?;
    self.catalog.delete_song(id).await?;
    info!(song_id = %id, %actor, "song deleted");
    Ok(())
  }

  // -------- Géneros --------

  /// Alta de un género. Un nombre ya usado (sin distinguir mayúsculas) es `Conflict`.
  pub async fn create_genre(&self, name: &str) -> Result<Genre, CoreError> {
    require_name(name)?;
    let name = name.trim();
    if self.catalog.find_genre_by_name(name).await?.is_some() {
      debug!(genre = %name, "genre already exists");
      return Err(CoreError::Conflict(format!("genre {name} already exists")));
    }

    let genre = self.catalog.create_genre(name).await?;
    debug!(genre_id = %genre.id, genre = %genre.name, "genre created");
    Ok(genre)
  }

  pub async fn rename_genre(&self, id: GenreId, name: &str) -> Result<Genre, CoreError> {
    require_name(name)?;
    let name = name.trim();
    let mut genre = self.catalog.find_genre(id).await?.ok_or(CoreError::NotFound)?;

    if self.catalog.find_genre_by_name(name).await?.is_some_and(|other| other.id != id) {
      return Err(CoreError::Conflict(format!("genre {name} already exists")));
    }

    genre.name = name.to_string();
    self.catalog.update_genre(&genre).await?;
    debug!(genre_id = %id, genre = %genre.name, "genre renamed");
    Ok(genre)
  }

  // -------- helpers --------

  /// `check` y la escritura que sigue no son atómicos; sin revocación no hace falta.
  async fn require_edit(&self, actor: UserId, id: impl Into<ResourceId>, kind: ResourceKind) -> Result<(), CoreError> {
    let id = id.into();
    if self.permissions.check(actor, id, kind, Permission::Edit).await {
      Ok(())
    } else {
      Err(CoreError::Forbidden(format!("user {actor} cannot edit {kind} {id}")))
    }
  }

  /// Otorga `Edit` al creador. Si el permiso no se puede guardar, el recurso
  /// recién creado se borra con `rollback`: un recurso sin dueño no lo podría
  /// editar nadie. `rollback` no corre si el grant sale bien.
  async fn grant_owner<F>(
    &self,
    owner: UserId,
    id: impl Into<ResourceId>,
    kind: ResourceKind,
    rollback: F,
  ) -> Result<(), CoreError>
  where
    F: Future<Output = Result<(), RepoError>>,
  {
    let id = id.into();
    let Err(grant_err) = self.permissions.grant(owner, id, kind, Permission::Edit).await else {
      return Ok(());
    };

    if let Err(e) = rollback.await {
      error!(error = %e, resource_id = %id, resource_kind = %kind, "rollback after failed grant also failed");
    }
    Err(grant_err)
  }
}

fn require_name(name: &str) -> Result<(), CoreError> {
  if name.trim().is_empty() {
    return Err(CoreError::Validation("name must not be empty".into()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{MemoryCatalog, MemoryPermissionStore};

  const OWNER: UserId = UserId::new(1);
  const STRANGER: UserId = UserId::new(2);

  struct Fixture {
    svc: CatalogService<MemoryCatalog, MemoryPermissionStore>,
    catalog: MemoryCatalog,
    store: MemoryPermissionStore,
    acl: Arc<PermissionService<MemoryPermissionStore>>,
  }

  fn fixture() -> Fixture {
    let catalog = MemoryCatalog::default();
    let store = MemoryPermissionStore::default();
    let acl = Arc::new(PermissionService::new(store.clone()));
    let svc = CatalogService::new(catalog.clone(), Arc::clone(&acl));
    Fixture { svc, catalog, store, acl }
  }

  fn new_artist(name: &str) -> NewArtist {
    NewArtist { name: name.into(), description: None, formation_year: Some(1970) }
  }

  fn new_album(title: &str) -> NewAlbum {
    NewAlbum { title: title.into(), release_year: Some(1975), cover_art_url: None }
  }

  fn new_song(title: &str) -> NewSong {
    NewSong { title: title.into(), duration_secs: 354, file_path: "/music/bohemian.flac".into(), ..Default::default() }
  }

  /// Artista + álbum de `OWNER`.
  async fn seeded(f: &Fixture) -> (Artist, Album) {
    let artist = f.svc.create_artist(OWNER, &new_artist("Queen")).await.unwrap();
    let album = f.svc.create_album(OWNER, artist.id, &new_album("A Night at the Opera")).await.unwrap();
    (artist, album)
  }

  #[tokio::test]
  async fn creator_gets_edit_on_every_level() {
    let f = fixture();

    let (artist, album) = seeded(&f).await;
    let song = f.svc.create_song(OWNER, album.id, &new_song("Bohemian Rhapsody")).await.unwrap();

    assert!(f.acl.check(OWNER, artist.id, ResourceKind::Artist, Permission::Edit).await);
    assert!(f.acl.check(OWNER, album.id, ResourceKind::Album, Permission::Edit).await);
    assert!(f.acl.check(OWNER, song.id, ResourceKind::Song, Permission::Edit).await);
    assert_eq!(song.artist_id, artist.id);
  }

  #[tokio::test]
  async fn stranger_cannot_touch_foreign_resources() {
    let f = fixture();
    let (artist, album) = seeded(&f).await;
    let song = f.svc.create_song(OWNER, album.id, &new_song("Love of My Life")).await.unwrap();

    assert!(matches!(f.svc.create_album(STRANGER, artist.id, &new_album("x")).await, Err(CoreError::Forbidden(_))));
    assert!(matches!(f.svc.create_song(STRANGER, album.id, &new_song("x")).await, Err(CoreError::Forbidden(_))));
    assert!(matches!(f.svc.rename_artist(STRANGER, artist.id, "Kings").await, Err(CoreError::Forbidden(_))));
    assert!(matches!(
      f.svc.update_artist(STRANGER, artist.id, &new_artist("Kings")).await,
      Err(CoreError::Forbidden(_))
    ));
    assert!(matches!(f.svc.delete_album(STRANGER, album.id).await, Err(CoreError::Forbidden(_))));
    assert!(matches!(f.svc.set_lyrics(STRANGER, song.id, ["la la"]).await, Err(CoreError::Forbidden(_))));

    assert_eq!(f.catalog.find_artist(artist.id).await.unwrap().unwrap().name, "Queen");
    assert!(f.catalog.find_album(album.id).await.unwrap().is_some());
    assert!(f.catalog.find_lyrics(song.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn owner_can_rename_and_delete() {
    let f = fixture();
    let (artist, album) = seeded(&f).await;
    let song = f.svc.create_song(OWNER, album.id, &new_song("Mustapha")).await.unwrap();

    assert_eq!(f.svc.rename_artist(OWNER, artist.id, " Queen II ").await.unwrap().name, "Queen II");
    assert_eq!(f.svc.rename_album(OWNER, album.id, "Jazz (Remastered)").await.unwrap().title, "Jazz (Remastered)");
    assert_eq!(f.svc.rename_song(OWNER, song.id, "Bicycle Race").await.unwrap().title, "Bicycle Race");

    f.svc.delete_song(OWNER, song.id).await.unwrap();
    assert!(f.catalog.find_song(song.id).await.unwrap().is_none());
    assert!(matches!(f.svc.delete_song(OWNER, song.id).await, Err(CoreError::NotFound)));
  }

  #[tokio::test]
  async fn update_artist_replaces_every_field() {
    let f = fixture();
    let artist = f
      .svc
      .create_artist(OWNER, &NewArtist { name: "Smile".into(), description: Some("pre-Queen".into()), formation_year: Some(1968) })
      .await
      .unwrap();

    let changes = NewArtist { name: "Queen".into(), description: None, formation_year: Some(1970) };
    let updated = f.svc.update_artist(OWNER, artist.id, &changes).await.unwrap();

    assert_eq!(updated.description, None);
    assert_eq!(f.catalog.find_artist(artist.id).await.unwrap(), Some(updated.clone()));
    assert_eq!((updated.name.as_str(), updated.formation_year), ("Queen", Some(1970)));
  }

  #[tokio::test]
  async fn failed_grant_rolls_back_the_new_artist() {
    let f = fixture();
    f.store.set_failing(true);

    let err = f.svc.create_artist(OWNER, &new_artist("Orphan")).await.unwrap_err();

    assert!(matches!(err, CoreError::Storage(_)));
    assert_eq!(f.catalog.artist_count(), 0);
  }

  #[tokio::test]
  async fn empty_names_are_rejected() {
    let f = fixture();
    assert!(matches!(f.svc.create_artist(OWNER, &new_artist("  ")).await, Err(CoreError::Validation(_))));

    let artist = f.svc.create_artist(OWNER, &new_artist("Queen")).await.unwrap();
    assert!(matches!(f.svc.rename_artist(OWNER, artist.id, "").await, Err(CoreError::Validation(_))));
    assert!(matches!(f.svc.create_genre(" ").await, Err(CoreError::Validation(_))));
  }

  #[tokio::test]
  async fn reads_return_children_and_missing_ids_are_not_found() {
    let f = fixture();
    let (artist, album) = seeded(&f).await;
    let song = f.svc.create_song(OWNER, album.id, &new_song("Death on Two Legs")).await.unwrap();

    let details = f.svc.get_artist(artist.id).await.unwrap();
    assert_eq!(details.albums, vec![album.clone()]);
    assert_eq!(f.svc.get_album(album.id).await.unwrap().songs, vec![song]);

    assert!(matches!(f.svc.get_artist(ArtistId::new(999)).await, Err(CoreError::NotFound)));
    assert!(matches!(f.svc.get_album(AlbumId::new(999)).await, Err(CoreError::NotFound)));
    assert!(matches!(f.svc.get_song(SongId::new(999)).await, Err(CoreError::NotFound)));
  }

  #[tokio::test]
  async fn owned_album_is_hidden_from_other_users() {
    let f = fixture();
    let (_, album) = seeded(&f).await;

    assert_eq!(f.svc.get_owned_album(OWNER, album.id).await.unwrap(), album);
    assert!(matches!(f.svc.get_owned_album(STRANGER, album.id).await, Err(CoreError::NotFound)));
  }

  #[tokio::test]
  async fn song_carries_known_genres_and_numbered_lyrics() {
    let f = fixture();
    let (_, album) = seeded(&f).await;
    let rock = f.svc.create_genre("Rock").await.unwrap();
    let opera = f.svc.create_genre("Opera").await.unwrap();

    let new = NewSong {
      genres: vec![rock.id, GenreId::new(404), opera.id],
      lyrics: vec!["Is this the real life?".into(), "Is this just fantasy?".into()],
      ..new_song("Bohemian Rhapsody")
    };
    let song = f.svc.create_song(OWNER, album.id, &new).await.unwrap();

    let details = f.svc.get_song(song.id).await.unwrap();
    assert_eq!(details.genres, vec![rock, opera]);
    let lyrics = details.lyrics.unwrap();
    assert_eq!(lyrics.couplets.len(), 2);
    assert_eq!(lyrics.couplets[1].number, 1);

    f.svc.set_lyrics(OWNER, song.id, ["Mama, just killed a man"]).await.unwrap();
    let lyrics = f.svc.get_song(song.id).await.unwrap().lyrics.unwrap();
    assert_eq!(lyrics.couplets.len(), 1);
    assert_eq!(lyrics.couplets[0].text, "Mama, just killed a man");
  }

  #[tokio::test]
  async fn genre_names_are_unique_ignoring_case() {
    let f = fixture();
    let rock = f.svc.create_genre("Rock").await.unwrap();
    let pop = f.svc.create_genre("Pop").await.unwrap();

    assert!(matches!(f.svc.create_genre("ROCK").await, Err(CoreError::Conflict(_))));
    assert!(matches!(f.svc.rename_genre(pop.id, "rock").await, Err(CoreError::Conflict(_))));
    assert!(matches!(f.svc.rename_genre(GenreId::new(999), "Jazz").await, Err(CoreError::NotFound)));

    // Cambiar solo las mayúsculas del propio nombre no choca consigo mismo.
    assert_eq!(f.svc.rename_genre(rock.id, "ROCK").await.unwrap().name, "ROCK");
    assert_eq!(f.catalog.find_genre(rock.id).await.unwrap().unwrap().name, "ROCK");
  }
}
