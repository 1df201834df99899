//! Fakes en memoria de los ports, solo para tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
  Album, AlbumId, Artist, ArtistId, Genre, GenreId, Lyrics, NewAlbum, NewArtist, NewProfile, NewSong, NewUser, Profile,
  ResourcePermission, Song, SongId, User, UserId,
};
use crate::errors::CoreError;
use crate::ports::{
  CatalogRepository, Page, PasswordHasher, PermissionStore, ProfileRepository, RepoError, Searchable, UserRepository,
};

// -------- Searchable --------

enum Behaviour<T> {
  Ok(Vec<T>, u64),
  Fail(String),
  Panic,
}

pub struct StubProvider<T> {
  behaviour: Behaviour<T>,
  delay: Option<Duration>,
  calls: AtomicUsize,
}

impl<T> StubProvider<T> {
  pub fn ok(items: Vec<T>, total: u64) -> Self {
    Self::with(Behaviour::Ok(items, total))
  }

  pub fn failing(msg: &str) -> Self {
    Self::with(Behaviour::Fail(msg.to_string()))
  }

  pub fn panicking() -> Self {
    Self::with(Behaviour::Panic)
  }

  pub fn delayed(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  fn with(behaviour: Behaviour<T>) -> Self {
    Self { behaviour, delay: None, calls: AtomicUsize::new(0) }
  }
}

#[async_trait]
impl<T> Searchable<T> for StubProvider<T>
where
  T: Clone + Send + Sync,
{
  async fn search(&self, _query: &str, _limit: u32, _offset: u32) -> Result<Page<T>, RepoError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }

    match &self.behaviour {
      Behaviour::Ok(items, total) => Ok(Page::new(items.clone(), *total)),
      Behaviour::Fail(msg) => Err(RepoError::Storage(msg.clone())),
      Behaviour::Panic => panic!("provider blew up"),
    }
  }
}

// -------- PermissionStore --------

#[derive(Clone, Default)]
pub struct MemoryPermissionStore {
  facts: Arc<Mutex<Vec<ResourcePermission>>>,
  failing: Arc<AtomicBool>,
}

impl MemoryPermissionStore {
  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  fn check_available(&self) -> Result<(), RepoError> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(RepoError::Storage("database is locked".into()));
    }
    Ok(())
  }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
  async fn insert(&self, permission: &ResourcePermission) -> Result<(), RepoError> {
    self.check_available()?;
    // Se guardan duplicados, como haría una tabla sin clave única.
    self.facts.lock().unwrap().push(*permission);
    Ok(())
  }

  async fn contains(&self, permission: &ResourcePermission) -> Result<bool, RepoError> {
    self.check_available()?;
    Ok(self.facts.lock().unwrap().iter().any(|p| p == permission))
  }
}

// -------- UserRepository --------

#[derive(Clone, Default)]
pub struct MemoryUsers {
  users: Arc<Mutex<BTreeMap<UserId, User>>>,
  next_id: Arc<AtomicU64>,
}

impl MemoryUsers {
  pub fn by_email(&self, email: &str) -> Option<User> {
    self.users.lock().unwrap().values().find(|u| u.email == email).cloned()
  }

  pub fn len(&self) -> usize {
    self.users.lock().unwrap().len()
  }
}

#[async_trait]
impl UserRepository for MemoryUsers {
  async fn create(&self, new: &NewUser) -> Result<User, RepoError> {
    let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let user = User {
      id,
      name: new.name.clone(),
      email: new.email.clone(),
      password_hash: new.password_hash.clone(),
      role: new.role,
      session_id: new.session_id.clone(),
      code: new.code.clone(),
      is_verified: false,
    };
    self.users.lock().unwrap().insert(id, user.clone());
    Ok(user)
  }

  async fn update(&self, user: &User) -> Result<User, RepoError> {
    let mut users = self.users.lock().unwrap();
    let slot = users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
    *slot = user.clone();
    Ok(user.clone())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
    Ok(self.by_email(email))
  }

  async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, RepoError> {
    Ok(self.users.lock().unwrap().values().find(|u| u.session_id == session_id).cloned())
  }
}

/// "Hash" reversible y trivial; basta para probar el flujo.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
  async fn hash(&self, password: &str) -> Result<String, CoreError> {
    Ok(format!("plain:{password}"))
  }

  async fn verify(&self, password: &str, hash: &str) -> bool {
    hash.strip_prefix("plain:") == Some(password)
  }
}

// -------- ProfileRepository --------

#[derive(Clone, Default)]
pub struct MemoryProfiles {
  profiles: Arc<Mutex<BTreeMap<UserId, Profile>>>,
}

#[async_trait]
impl ProfileRepository for MemoryProfiles {
  async fn create(&self, user_id: UserId, new: &NewProfile) -> Result<Profile, RepoError> {
    let mut profiles = self.profiles.lock().unwrap();
    if profiles.contains_key(&user_id) {
      return Err(RepoError::Conflict(format!("duplicate profile for user {user_id}")));
    }
    let profile = Profile { user_id, bio: new.bio.clone(), avatar_url: new.avatar_url.clone() };
    profiles.insert(user_id, profile.clone());
    Ok(profile)
  }

  async fn find(&self, user_id: UserId) -> Result<Option<Profile>, RepoError> {
    Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
  }
}

// -------- CatalogRepository --------

#[derive(Default)]
struct CatalogState {
  artists: BTreeMap<ArtistId, Artist>,
  albums: BTreeMap<AlbumId, Album>,
  songs: BTreeMap<SongId, Song>,
  genres: BTreeMap<GenreId, Genre>,
  song_genres: BTreeMap<SongId, Vec<GenreId>>,
  lyrics: BTreeMap<SongId, Lyrics>,
  next_id: u64,
}

impl CatalogState {
  fn next(&mut self) -> u64 {
    self.next_id += 1;
    self.next_id
  }

  fn drop_song(&mut self, id: SongId) -> Option<Song> {
    self.song_genres.remove(&id);
    self.lyrics.remove(&id);
    self.songs.remove(&id)
  }
}

#[derive(Clone, Default)]
pub struct MemoryCatalog {
  state: Arc<Mutex<CatalogState>>,
}

impl MemoryCatalog {
  pub fn artist_count(&self) -> usize {
    self.state.lock().unwrap().artists.len()
  }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
  async fn create_artist(&self, owner: UserId, new: &NewArtist) -> Result<Artist, RepoError> {
    let mut st = self.state.lock().unwrap();
    let artist = Artist {
      id: ArtistId::new(st.next()),
      name: new.name.clone(),
      description: new.description.clone(),
      formation_year: new.formation_year,
      owner_id: owner,
    };
    st.artists.insert(artist.id, artist.clone());
    Ok(artist)
  }

  async fn find_artist(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    Ok(self.state.lock().unwrap().artists.get(&id).cloned())
  }

  async fn update_artist(&self, artist: &Artist) -> Result<(), RepoError> {
    let mut st = self.state.lock().unwrap();
    let slot = st.artists.get_mut(&artist.id).ok_or(RepoError::NotFound)?;
    *slot = artist.clone();
    Ok(())
  }

  async fn delete_artist(&self, id: ArtistId) -> Result<(), RepoError> {
    let mut st = self.state.lock().unwrap();
    st.artists.remove(&id).ok_or(RepoError::NotFound)?;
    st.albums.retain(|_, album| album.artist_id != id);
    let songs: Vec<SongId> = st.songs.values().filter(|s| s.artist_id == id).map(|s| s.id).collect();
    for song in songs {
      st.drop_song(song);
    }
    Ok(())
  }

  async fn albums_of(&self, artist: ArtistId) -> Result<Vec<Album>, RepoError> {
    Ok(self.state.lock().unwrap().albums.values().filter(|a| a.artist_id == artist).cloned().collect())
  }

  async fn create_album(&self, artist_id: ArtistId, new: &NewAlbum) -> Result<Album, RepoError> {
    let mut st = self.state.lock().unwrap();
    let album = Album {
      id: AlbumId::new(st.next()),
      artist_id,
      title: new.title.clone(),
      release_year: new.release_year,
      cover_art_url: new.cover_art_url.clone(),
    };
    st.albums.insert(album.id, album.clone());
    Ok(album)
  }

  async fn find_album(&self, id: AlbumId) -> Result<Option<Album>, RepoError> {
    Ok(self.state.lock().unwrap().albums.get(&id).cloned())
  }

  async fn update_album(&self, album: &Album) -> Result<(), RepoError> {
    let mut st = self.state.lock().unwrap();
    let slot = st.albums.get_mut(&album.id).ok_or(RepoError::NotFound)?;
    *slot = album.clone();
    Ok(())
  }

  async fn delete_album(&self, id: AlbumId) -> Result<(), RepoError> {
    let mut st = self.state.lock().unwrap();
    st.albums.remove(&id).ok_or(RepoError::NotFound)?;
    let songs: Vec<SongId> = st.songs.values().filter(|s| s.album_id == id).map(|s| s.id).collect();
    for song in songs {
      st.drop_song(song);
    }
    Ok(())
  }

  async fn songs_of(&self, album: AlbumId) -> Result<Vec<Song>, RepoError> {
    Ok(self.state.lock().unwrap().songs.values().filter(|s| s.album_id == album).cloned().collect())
  }

  async fn create_song(&self, album: &Album, new: &NewSong) -> Result<Song, RepoError> {
    let mut st = self.state.lock().unwrap();
    let song = Song {
      id: SongId::new(st.next()),
      album_id: album.id,
      artist_id: album.artist_id,
      title: new.title.clone(),
      duration_secs: new.duration_secs,
      file_path: new.file_path.clone(),
    };
    let known: Vec<GenreId> = new.genres.iter().copied().filter(|g| st.genres.contains_key(g)).collect();
    st.song_genres.insert(song.id, known);
    if !new.lyrics.is_empty() {
      st.lyrics.insert(song.id, Lyrics::from_texts(song.id, new.lyrics.iter().cloned()));
    }
    st.songs.insert(song.id, song.clone());
    Ok(song)
  }

  async fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError> {
    Ok(self.state.lock().unwrap().songs.get(&id).cloned())
  }

  async fn update_song(&self, song: &Song) -> Result<(), RepoError> {
    let mut st = self.state.lock().unwrap();
    let slot = st.songs.get_mut(&song.id).ok_or(RepoError::NotFound)?;
    *slot = song.clone();
    Ok(())
  }

  async fn delete_song(&self, id: SongId) -> Result<(), RepoError> {
    self.state.lock().unwrap().drop_song(id).ok_or(RepoError::NotFound)?;
    Ok(())
  }

  async fn genres_of(&self, song: SongId) -> Result<Vec<Genre>, RepoError> {
    let st = self.state.lock().unwrap();
    let ids = st.song_genres.get(&song).cloned().unwrap_or_default();
    Ok(ids.iter().filter_map(|id| st.genres.get(id).cloned()).collect())
  }

  async fn upsert_lyrics(&self, lyrics: &Lyrics) -> Result<(), RepoError> {
    self.state.lock().unwrap().lyrics.insert(lyrics.song_id, lyrics.clone());
    Ok(())
  }

  async fn find_lyrics(&self, song: SongId) -> Result<Option<Lyrics>, RepoError> {
    Ok(self.state.lock().unwrap().lyrics.get(&song).cloned())
  }

  async fn create_genre(&self, name: &str) -> Result<Genre, RepoError> {
    let mut st = self.state.lock().unwrap();
    let genre = Genre { id: GenreId::new(st.next()), name: name.to_string() };
    st.genres.insert(genre.id, genre.clone());
    Ok(genre)
  }

  async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, RepoError> {
    Ok(self.state.lock().unwrap().genres.get(&id).cloned())
  }

  async fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, RepoError> {
    let st = self.state.lock().unwrap();
    Ok(st.genres.values().find(|g| g.name.eq_ignore_ascii_case(name)).cloned())
  }

  async fn update_genre(&self, genre: &Genre) -> Result<(), RepoError> {
    let mut st = self.state.lock().unwrap();
    let slot = st.genres.get_mut(&genre.id).ok_or(RepoError::NotFound)?;
    *slot = genre.clone();
    Ok(())
  }
}
