//! Adapters de persistencia sobre SQLite (diesel + r2d2).

pub mod config;
pub mod models;
pub mod schema;

mod catalog;
mod permissions;
mod profiles;
mod users;

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use musiclib_core::ports::RepoError;

pub use catalog::SqliteCatalog;
pub use config::StorageConfig;
pub use permissions::SqlitePermissionStore;
pub use profiles::SqliteProfileRepository;
pub use users::SqliteUserRepository;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("config error: {0}")]
  Config(#[from] musiclib_config::ConfigError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),

  #[error("migration error: {0}")]
  Migration(String),
}

/// PRAGMAs que se aplican a cada conexión nueva del pool.
#[derive(Debug)]
struct SqlitePragmas {
  journal_mode: Option<String>,
  busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut sql = format!("PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      sql.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&sql).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Punto de entrada del almacenamiento: pool de conexiones ya migrado.
#[derive(Clone)]
pub struct Database {
  pool: DbPool,
}

impl Database {
  /// Abre (o crea) la base, configura el pool y aplica migraciones pendientes.
  pub fn open(cfg: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(parent) = cfg.db_path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let url = cfg.db_path.to_string_lossy().to_string();
    let manager = ConnectionManager::<SqliteConnection>::new(url);
    let pool = Pool::builder()
      .max_size(cfg.pool_size.max(1))
      .connection_timeout(Duration::from_millis(cfg.busy_timeout_ms.max(1_000)))
      .connection_customizer(Box::new(SqlitePragmas {
        journal_mode: cfg.journal_mode.clone(),
        busy_timeout_ms: cfg.busy_timeout_ms,
      }))
      .build(manager)?;

    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    if !applied.is_empty() {
      info!(count = applied.len(), "applied database migrations");
    }
    debug!(path = %cfg.db_path.display(), pool_size = cfg.pool_size, "database ready");

    Ok(Self { pool })
  }

  /// Lee `[storage]` de la config global y abre la base.
  pub fn open_from_config() -> Result<Self, StorageError> {
    let cfg = StorageConfig::load()?;
    Self::open(&cfg)
  }

  pub fn catalog(&self) -> SqliteCatalog {
    SqliteCatalog::new(self.pool.clone())
  }

  pub fn permissions(&self) -> SqlitePermissionStore {
    SqlitePermissionStore::new(self.pool.clone())
  }

  pub fn users(&self) -> SqliteUserRepository {
    SqliteUserRepository::new(self.pool.clone())
  }

  pub fn profiles(&self) -> SqliteProfileRepository {
    SqliteProfileRepository::new(self.pool.clone())
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

fn checkout(pool: &DbPool) -> Result<DbConn, RepoError> {
  pool.get().map_err(|e| RepoError::Storage(e.to_string()))
}

/// Corre `f` con una conexión del pool en el pool de hilos bloqueantes de tokio.
///
/// diesel es síncrono: ninguna consulta debe ocupar un hilo del runtime.
pub(crate) async fn run_blocking<T, F>(pool: &DbPool, f: F) -> Result<T, RepoError>
where
  T: Send + 'static,
  F: FnOnce(&mut SqliteConnection) -> Result<T, RepoError> + Send + 'static,
{
  let pool = pool.clone();
  tokio::task::spawn_blocking(move || {
    let mut conn = checkout(&pool)?;
    f(&mut *conn)
  })
  .await
  .map_err(|e| RepoError::Storage(format!("database task failed: {e}")))?
}

pub(crate) fn db_err(err: diesel::result::Error) -> RepoError {
  use diesel::result::{DatabaseErrorKind, Error};

  match err {
    Error::NotFound => RepoError::NotFound,
    Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => RepoError::Conflict(info.message().to_string()),
    other => RepoError::Storage(other.to_string()),
  }
}

/// Error de una transacción que mezcla consultas diesel y reglas del repositorio.
pub(crate) struct TxError(pub(crate) RepoError);

impl From<diesel::result::Error> for TxError {
  fn from(err: diesel::result::Error) -> Self {
    TxError(db_err(err))
  }
}

impl From<RepoError> for TxError {
  fn from(err: RepoError) -> Self {
    TxError(err)
  }
}
