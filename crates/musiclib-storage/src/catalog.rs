use async_trait::async_trait;
use diesel::prelude::*;

use musiclib_core::domain::{
  Album, AlbumId, Artist, ArtistId, Couplet, Genre, GenreId, Lyrics, NewAlbum, NewArtist, NewSong, ResourceKind, Song,
  SongId, UserId,
};
use musiclib_core::ports::{CatalogRepository, Page, RepoError, Searchable};

use crate::models::{
  AlbumRow, ArtistRow, CoupletRow, GenreRow, NewAlbumRow, NewArtistRow, NewCoupletRow, NewSongRow, SongRow, db_id,
  duration_to_db,
};
use crate::schema::{albums, artists, couplets, genres, resource_permissions, song_genres, songs};
use crate::{DbPool, TxError, db_err, run_blocking};

/// Catálogo en SQLite. También es el proveedor de búsqueda de los tres dominios.
#[derive(Clone)]
pub struct SqliteCatalog {
  pool: DbPool,
}

impl SqliteCatalog {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  async fn blocking<T, F>(&self, f: F) -> Result<T, RepoError>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, RepoError> + Send + 'static,
  {
    run_blocking(&self.pool, f).await
  }
}

/// Escapa los comodines de LIKE (`%`, `_` y el propio `\`).
fn escape_like(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

/// `%texto%` con los comodines escapados. LIKE en SQLite ya ignora
/// mayúsculas/minúsculas ASCII.
fn like_pattern(query: &str) -> String {
  format!("%{}%", escape_like(query))
}

/// Borra los permisos de recursos que están por desaparecer.
fn drop_grants(conn: &mut SqliteConnection, kind: ResourceKind, ids: Vec<i64>) -> QueryResult<usize> {
  if ids.is_empty() {
    return Ok(0);
  }
  diesel::delete(
    resource_permissions::table
      .filter(resource_permissions::resource_kind.eq(kind.as_str()))
      .filter(resource_permissions::resource_id.eq_any(ids)),
  )
  .execute(conn)
}

fn deleted_or_not_found(deleted: usize) -> QueryResult<()> {
  // NotFound deshace la transacción y `db_err` lo traduce.
  if deleted == 0 { Err(diesel::result::Error::NotFound) } else { Ok(()) }
}

fn write_couplets(conn: &mut SqliteConnection, song: SongId, lines: &[Couplet]) -> Result<(), TxError> {
  let rows = lines.iter().map(|c| NewCoupletRow::new(song, c)).collect::<Result<Vec<_>, _>>()?;
  for row in &rows {
    diesel::insert_into(couplets::table).values(row).execute(conn)?;
  }
  Ok(())
}

#[async_trait]
impl CatalogRepository for SqliteCatalog {
  // -------- Artistas --------

  async fn create_artist(&self, owner: UserId, artist: &NewArtist) -> Result<Artist, RepoError> {
    let artist = artist.clone();
    self
      .blocking(move |conn| {
        diesel::insert_into(artists::table)
          .values(&NewArtistRow::new(owner, &artist))
          .returning(ArtistRow::as_returning())
          .get_result::<ArtistRow>(conn)
          .map(Artist::from)
          .map_err(db_err)
      })
      .await
  }

  async fn find_artist(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    self
      .blocking(move |conn| {
        artists::table
          .find(db_id(id))
          .select(ArtistRow::as_select())
          .first::<ArtistRow>(conn)
          .optional()
          .map(|row| row.map(Artist::from))
          .map_err(db_err)
      })
      .await
  }

  async fn update_artist(&self, artist: &Artist) -> Result<(), RepoError> {
    let artist = artist.clone();
    self
      .blocking(move |conn| {
        let updated = diesel::update(artists::table.find(db_id(artist.id)))
          .set((
            artists::name.eq(&artist.name),
            artists::description.eq(artist.description.as_deref()),
            artists::formation_year.eq(artist.formation_year),
          ))
          .execute(conn)
          .map_err(db_err)?;
        if updated == 0 { Err(RepoError::NotFound) } else { Ok(()) }
      })
      .await
  }

  async fn delete_artist(&self, id: ArtistId) -> Result<(), RepoError> {
    let id = db_id(id);
    self
      .blocking(move |conn| {
        conn
          .transaction::<_, diesel::result::Error, _>(|conn| {
            let album_ids = albums::table.filter(albums::artist_id.eq(id)).select(albums::id).load::<i64>(conn)?;
            let song_ids = songs::table.filter(songs::artist_id.eq(id)).select(songs::id).load::<i64>(conn)?;
            drop_grants(conn, ResourceKind::Song, song_ids)?;
            drop_grants(conn, ResourceKind::Album, album_ids)?;
            drop_grants(conn, ResourceKind::Artist, vec![id])?;
            // Álbumes, canciones, enlaces y letras caen por ON DELETE CASCADE.
            deleted_or_not_found(diesel::delete(artists::table.find(id)).execute(conn)?)
          })
          .map_err(db_err)
      })
      .await
  }

  async fn albums_of(&self, artist: ArtistId) -> Result<Vec<Album>, RepoError> {
    self
      .blocking(move |conn| {
        albums::table
          .filter(albums::artist_id.eq(db_id(artist)))
          .order((albums::release_year.asc(), albums::id.asc()))
          .select(AlbumRow::as_select())
          .load::<AlbumRow>(conn)
          .map(|rows| rows.into_iter().map(Album::from).collect())
          .map_err(db_err)
      })
      .await
  }

  // -------- Álbumes --------

  async fn create_album(&self, artist_id: ArtistId, album: &NewAlbum) -> Result<Album, RepoError> {
    let album = album.clone();
    self
      .blocking(move |conn| {
        diesel::insert_into(albums::table)
          .values(&NewAlbumRow::new(artist_id, &album))
          .returning(AlbumRow::as_returning())
          .get_result::<AlbumRow>(conn)
          .map(Album::from)
          .map_err(db_err)
      })
      .await
  }

  async fn find_album(&self, id: AlbumId) -> Result<Option<Album>, RepoError> {
    self
      .blocking(move |conn| {
        albums::table
          .find(db_id(id))
          .select(AlbumRow::as_select())
          .first::<AlbumRow>(conn)
          .optional()
          .map(|row| row.map(Album::from))
          .map_err(db_err)
      })
      .await
  }

  async fn update_album(&self, album: &Album) -> Result<(), RepoError> {
    let album = album.clone();
    self
      .blocking(move |conn| {
        let updated = diesel::update(albums::table.find(db_id(album.id)))
          .set((
            albums::title.eq(&album.title),
            albums::release_year.eq(album.release_year),
            albums::cover_art_url.eq(album.cover_art_url.as_deref()),
          ))
          .execute(conn)
          .map_err(db_err)?;
        if updated == 0 { Err(RepoError::NotFound) } else { Ok(()) }
      })
      .await
  }

  async fn delete_album(&self, id: AlbumId) -> Result<(), RepoError> {
    let id = db_id(id);
    self
      .blocking(move |conn| {
        conn
          .transaction::<_, diesel::result::Error, _>(|conn| {
            let song_ids = songs::table.filter(songs::album_id.eq(id)).select(songs::id).load::<i64>(conn)?;
            drop_grants(conn, ResourceKind::Song, song_ids)?;
            drop_grants(conn, ResourceKind::Album, vec![id])?;
            deleted_or_not_found(diesel::delete(albums::table.find(id)).execute(conn)?)
          })
          .map_err(db_err)
      })
      .await
  }

  async fn songs_of(&self, album: AlbumId) -> Result<Vec<Song>, RepoError> {
    self
      .blocking(move |conn| {
        songs::table
          .filter(songs::album_id.eq(db_id(album)))
          .order(songs::id.asc())
          .select(SongRow::as_select())
          .load::<SongRow>(conn)
          .map(|rows| rows.into_iter().map(Song::from).collect())
          .map_err(db_err)
      })
      .await
  }

  // -------- Canciones --------

  async fn create_song(&self, album: &Album, song: &NewSong) -> Result<Song, RepoError> {
    let (album, song) = (album.clone(), song.clone());
    self
      .blocking(move |conn| {
        conn
          .transaction::<_, TxError, _>(|conn| {
            let created = diesel::insert_into(songs::table)
              .values(&NewSongRow::new(&album, &song)?)
              .returning(SongRow::as_returning())
              .get_result::<SongRow>(conn)
              .map(Song::from)?;

            // Solo se enlazan los géneros que existen.
            let requested: Vec<i64> = song.genres.iter().map(|g| db_id(*g)).collect();
            let known = genres::table.filter(genres::id.eq_any(requested)).select(genres::id).load::<i64>(conn)?;
            for genre_id in known {
              diesel::insert_or_ignore_into(song_genres::table)
                .values((song_genres::song_id.eq(db_id(created.id)), song_genres::genre_id.eq(genre_id)))
                .execute(conn)?;
            }

            let lyrics = Lyrics::from_texts(created.id, song.lyrics.iter().cloned());
            write_couplets(conn, created.id, &lyrics.couplets)?;
            Ok(created)
          })
          .map_err(|TxError(e)| e)
      })
      .await
  }

  async fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError> {
    self
      .blocking(move |conn| {
        songs::table
          .find(db_id(id))
          .select(SongRow::as_select())
          .first::<SongRow>(conn)
          .optional()
          .map(|row| row.map(Song::from))
          .map_err(db_err)
      })
      .await
  }

  async fn update_song(&self, song: &Song) -> Result<(), RepoError> {
    let song = song.clone();
    self
      .blocking(move |conn| {
        let updated = diesel::update(songs::table.find(db_id(song.id)))
          .set((
            songs::title.eq(&song.title),
            songs::duration_secs.eq(duration_to_db(song.duration_secs)?),
            songs::file_path.eq(&song.file_path),
          ))
          .execute(conn)
          .map_err(db_err)?;
        if updated == 0 { Err(RepoError::NotFound) } else { Ok(()) }
      })
      .await
  }

  async fn delete_song(&self, id: SongId) -> Result<(), RepoError> {
    let id = db_id(id);
    self
      .blocking(move |conn| {
        conn
          .transaction::<_, diesel::result::Error, _>(|conn| {
            drop_grants(conn, ResourceKind::Song, vec![id])?;
            deleted_or_not_found(diesel::delete(songs::table.find(id)).execute(conn)?)
          })
          .map_err(db_err)
      })
      .await
  }

  async fn genres_of(&self, song: SongId) -> Result<Vec<Genre>, RepoError> {
    self
      .blocking(move |conn| {
        song_genres::table
          .inner_join(genres::table)
          .filter(song_genres::song_id.eq(db_id(song)))
          .order(genres::name.asc())
          .select(GenreRow::as_select())
          .load::<GenreRow>(conn)
          .map(|rows| rows.into_iter().map(Genre::from).collect())
          .map_err(db_err)
      })
      .await
  }

  // -------- Letras --------

  async fn upsert_lyrics(&self, lyrics: &Lyrics) -> Result<(), RepoError> {
    let lyrics = lyrics.clone();
    self
      .blocking(move |conn| {
        conn
          .transaction::<_, TxError, _>(|conn| {
            diesel::delete(couplets::table.filter(couplets::song_id.eq(db_id(lyrics.song_id)))).execute(conn)?;
            write_couplets(conn, lyrics.song_id, &lyrics.couplets)
          })
          .map_err(|TxError(e)| e)
      })
      .await
  }

  async fn find_lyrics(&self, song: SongId) -> Result<Option<Lyrics>, RepoError> {
    self
      .blocking(move |conn| {
        let rows = couplets::table
          .filter(couplets::song_id.eq(db_id(song)))
          .order((couplets::number.asc(), couplets::id.asc()))
          .select(CoupletRow::as_select())
          .load::<CoupletRow>(conn)
          .map_err(db_err)?;
        if rows.is_empty() {
          return Ok(None);
        }
        Ok(Some(Lyrics { song_id: song, couplets: rows.into_iter().map(Couplet::from).collect() }))
      })
      .await
  }

  // -------- Géneros --------

  async fn create_genre(&self, name: &str) -> Result<Genre, RepoError> {
    let name = name.to_string();
    self
      .blocking(move |conn| {
        diesel::insert_into(genres::table)
          .values(genres::name.eq(&name))
          .returning(GenreRow::as_returning())
          .get_result::<GenreRow>(conn)
          .map(Genre::from)
          .map_err(db_err)
      })
      .await
  }

  async fn find_genre(&self, id: GenreId) -> Result<Option<Genre>, RepoError> {
    self
      .blocking(move |conn| {
        genres::table
          .find(db_id(id))
          .select(GenreRow::as_select())
          .first::<GenreRow>(conn)
          .optional()
          .map(|row| row.map(Genre::from))
          .map_err(db_err)
      })
      .await
  }

  async fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, RepoError> {
    // LIKE sin comodines: igualdad que ignora mayúsculas, como el índice único.
    let pattern = escape_like(name);
    self
      .blocking(move |conn| {
        genres::table
          .filter(genres::name.like(&pattern).escape('\\'))
          .select(GenreRow::as_select())
          .first::<GenreRow>(conn)
          .optional()
          .map(|row| row.map(Genre::from))
          .map_err(db_err)
      })
      .await
  }

  async fn update_genre(&self, genre: &Genre) -> Result<(), RepoError> {
    let genre = genre.clone();
    self
      .blocking(move |conn| {
        let updated = diesel::update(genres::table.find(db_id(genre.id)))
          .set(genres::name.eq(&genre.name))
          .execute(conn)
          .map_err(db_err)?;
        if updated == 0 { Err(RepoError::NotFound) } else { Ok(()) }
      })
      .await
  }
}

#[async_trait]
impl Searchable<Artist> for SqliteCatalog {
  async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Page<Artist>, RepoError> {
    let pattern = like_pattern(query);
    self
      .blocking(move |conn| {
        let total: i64 = artists::table
          .filter(artists::name.like(&pattern).escape('\\'))
          .count()
          .get_result(conn)
          .map_err(db_err)?;
        let rows = artists::table
          .filter(artists::name.like(&pattern).escape('\\'))
          .order((artists::name.asc(), artists::id.asc()))
          .limit(i64::from(limit))
          .offset(i64::from(offset))
          .select(ArtistRow::as_select())
          .load::<ArtistRow>(conn)
          .map_err(db_err)?;
        Ok(Page::new(rows.into_iter().map(Artist::from).collect(), total as u64))
      })
      .await
  }
}

#[async_trait]
impl Searchable<Album> for SqliteCatalog {
  async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Page<Album>, RepoError> {
    let pattern = like_pattern(query);
    self
      .blocking(move |conn| {
        let total: i64 = albums::table
          .filter(albums::title.like(&pattern).escape('\\'))
          .count()
          .get_result(conn)
          .map_err(db_err)?;
        let rows = albums::table
          .filter(albums::title.like(&pattern).escape('\\'))
          .order((albums::title.asc(), albums::id.asc()))
          .limit(i64::from(limit))
          .offset(i64::from(offset))
          .select(AlbumRow::as_select())
          .load::<AlbumRow>(conn)
          .map_err(db_err)?;
        Ok(Page::new(rows.into_iter().map(Album::from).collect(), total as u64))
      })
      .await
  }
}

#[async_trait]
impl Searchable<Song> for SqliteCatalog {
  async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Page<Song>, RepoError> {
    let pattern = like_pattern(query);
    self
      .blocking(move |conn| {
        let total: i64 = songs::table
          .filter(songs::title.like(&pattern).escape('\\'))
          .count()
          .get_result(conn)
          .map_err(db_err)?;
        let rows = songs::table
          .filter(songs::title.like(&pattern).escape('\\'))
          .order((songs::title.asc(), songs::id.asc()))
          .limit(i64::from(limit))
          .offset(i64::from(offset))
          .select(SongRow::as_select())
          .load::<SongRow>(conn)
          .map_err(db_err)?;
        Ok(Page::new(rows.into_iter().map(Song::from).collect(), total as u64))
      })
      .await
  }
}
