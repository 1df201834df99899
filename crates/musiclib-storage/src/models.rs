use diesel::prelude::*;

use musiclib_core::domain::{
  Album, AlbumId, Artist, ArtistId, Couplet, Genre, GenreId, NewAlbum, NewArtist, NewProfile, NewSong, NewUser, Profile,
  ResourcePermission, Role, Song, SongId, User, UserId,
};
use musiclib_core::ports::RepoError;

use crate::schema::{albums, artists, couplets, genres, profiles, resource_permissions, songs, users};

// SQLite guarda enteros con signo de 64 bits; los ids del dominio son u64.
pub(crate) fn db_id(id: impl Into<u64>) -> i64 {
  id.into() as i64
}

fn domain_id(raw: i64) -> u64 {
  raw as u64
}

// -------- Artistas --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistRow {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub formation_year: Option<i32>,
  pub owner_id: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = artists)]
pub struct NewArtistRow<'a> {
  pub name: &'a str,
  pub description: Option<&'a str>,
  pub formation_year: Option<i32>,
  pub owner_id: i64,
}

impl<'a> NewArtistRow<'a> {
  pub fn new(owner: UserId, artist: &'a NewArtist) -> Self {
    Self {
      name: &artist.name,
      description: artist.description.as_deref(),
      formation_year: artist.formation_year,
      owner_id: db_id(owner),
    }
  }
}

impl From<ArtistRow> for Artist {
  fn from(row: ArtistRow) -> Self {
    Artist {
      id: ArtistId::new(domain_id(row.id)),
      name: row.name,
      description: row.description,
      formation_year: row.formation_year,
      owner_id: UserId::new(domain_id(row.owner_id)),
    }
  }
}

// -------- Álbumes --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = albums)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlbumRow {
  pub id: i64,
  pub artist_id: i64,
  pub title: String,
  pub release_year: Option<i32>,
  pub cover_art_url: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = albums)]
pub struct NewAlbumRow<'a> {
  pub artist_id: i64,
  pub title: &'a str,
  pub release_year: Option<i32>,
  pub cover_art_url: Option<&'a str>,
}

impl<'a> NewAlbumRow<'a> {
  pub fn new(artist_id: ArtistId, album: &'a NewAlbum) -> Self {
    Self {
      artist_id: db_id(artist_id),
      title: &album.title,
      release_year: album.release_year,
      cover_art_url: album.cover_art_url.as_deref(),
    }
  }
}

impl From<AlbumRow> for Album {
  fn from(row: AlbumRow) -> Self {
    Album {
      id: AlbumId::new(domain_id(row.id)),
      artist_id: ArtistId::new(domain_id(row.artist_id)),
      title: row.title,
      release_year: row.release_year,
      cover_art_url: row.cover_art_url,
    }
  }
}

// -------- Canciones --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SongRow {
  pub id: i64,
  pub album_id: i64,
  pub artist_id: i64,
  pub title: String,
  pub duration_secs: i32,
  pub file_path: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = songs)]
pub struct NewSongRow<'a> {
  pub album_id: i64,
  pub artist_id: i64,
  pub title: &'a str,
  pub duration_secs: i32,
  pub file_path: &'a str,
}

impl<'a> NewSongRow<'a> {
  pub fn new(album: &Album, song: &'a NewSong) -> Result<Self, RepoError> {
    Ok(Self {
      album_id: db_id(album.id),
      artist_id: db_id(album.artist_id),
      title: &song.title,
      duration_secs: duration_to_db(song.duration_secs)?,
      file_path: &song.file_path,
    })
  }
}

pub(crate) fn duration_to_db(secs: u32) -> Result<i32, RepoError> {
  i32::try_from(secs).map_err(|_| RepoError::Storage(format!("duration out of range: {secs}s")))
}

impl From<SongRow> for Song {
  fn from(row: SongRow) -> Self {
    Song {
      id: SongId::new(domain_id(row.id)),
      album_id: AlbumId::new(domain_id(row.album_id)),
      artist_id: ArtistId::new(domain_id(row.artist_id)),
      title: row.title,
      duration_secs: row.duration_secs.max(0) as u32,
      file_path: row.file_path,
    }
  }
}

// -------- Géneros y letras --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = genres)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GenreRow {
  pub id: i64,
  pub name: String,
}

impl From<GenreRow> for Genre {
  fn from(row: GenreRow) -> Self {
    Genre { id: GenreId::new(domain_id(row.id)), name: row.name }
  }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = couplets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CoupletRow {
  pub number: i32,
  pub text: String,
}

impl From<CoupletRow> for Couplet {
  fn from(row: CoupletRow) -> Self {
    Couplet { number: row.number.max(0) as u32, text: row.text }
  }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = couplets)]
pub struct NewCoupletRow<'a> {
  pub song_id: i64,
  pub number: i32,
  pub text: &'a str,
}

impl<'a> NewCoupletRow<'a> {
  pub fn new(song_id: SongId, couplet: &'a Couplet) -> Result<Self, RepoError> {
    let number = i32::try_from(couplet.number)
      .map_err(|_| RepoError::Storage(format!("couplet number out of range: {}", couplet.number)))?;
    Ok(Self { song_id: db_id(song_id), number, text: &couplet.text })
  }
}

// -------- Perfiles --------

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProfileRow {
  pub user_id: i64,
  pub bio: Option<String>,
  pub avatar_url: Option<String>,
}

impl ProfileRow {
  pub fn new(user_id: UserId, profile: &NewProfile) -> Self {
    Self { user_id: db_id(user_id), bio: profile.bio.clone(), avatar_url: profile.avatar_url.clone() }
  }
}

impl From<ProfileRow> for Profile {
  fn from(row: ProfileRow) -> Self {
    Profile { user_id: UserId::new(domain_id(row.user_id)), bio: row.bio, avatar_url: row.avatar_url }
  }
}

// -------- Usuarios --------

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub role: String,
  pub session_id: String,
  pub code: String,
  pub is_verified: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
  pub name: &'a str,
  pub email: &'a str,
  pub password_hash: &'a str,
  pub role: &'static str,
  pub session_id: &'a str,
  pub code: &'a str,
  pub is_verified: bool,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
  fn from(user: &'a NewUser) -> Self {
    Self {
      name: &user.name,
      email: &user.email,
      password_hash: &user.password_hash,
      role: user.role.as_str(),
      session_id: &user.session_id,
      code: &user.code,
      is_verified: false,
    }
  }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChanges<'a> {
  pub name: &'a str,
  pub password_hash: &'a str,
  pub role: &'static str,
  pub session_id: &'a str,
  pub code: &'a str,
  pub is_verified: bool,
}

impl<'a> From<&'a User> for UserChanges<'a> {
  fn from(user: &'a User) -> Self {
    Self {
      name: &user.name,
      password_hash: &user.password_hash,
      role: user.role.as_str(),
      session_id: &user.session_id,
      code: &user.code,
      is_verified: user.is_verified,
    }
  }
}

impl TryFrom<UserRow> for User {
  type Error = RepoError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role = row.role.parse::<Role>().map_err(|e| RepoError::Storage(e.to_string()))?;
    Ok(User {
      id: UserId::new(domain_id(row.id)),
      name: row.name,
      email: row.email,
      password_hash: row.password_hash,
      role,
      session_id: row.session_id,
      code: row.code,
      is_verified: row.is_verified,
    })
  }
}

// -------- Permisos --------

#[derive(Debug, Insertable)]
#[diesel(table_name = resource_permissions)]
pub struct NewPermissionRow {
  pub user_id: i64,
  pub resource_id: i64,
  pub resource_kind: &'static str,
  pub permission: &'static str,
}

impl From<&ResourcePermission> for NewPermissionRow {
  fn from(fact: &ResourcePermission) -> Self {
    Self {
      user_id: db_id(fact.user_id),
      resource_id: db_id(fact.resource_id),
      resource_kind: fact.resource_kind.as_str(),
      permission: fact.permission.as_str(),
    }
  }
}
