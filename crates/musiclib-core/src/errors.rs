// crates/musiclib-core/src/errors.rs
use thiserror::Error;

use crate::ports::RepoError;

/// Error genérico del núcleo de musiclib.
///
/// Las capas superiores (HTTP, CLI, etc.) deberían mapear este error
/// a códigos de estado, mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Entrada fuera de contrato (parámetros de búsqueda, credenciales mal formadas...).
  #[error("validation error: {0}")]
  Validation(String),

  #[error("repository error: {0}")]
  Repository(String),

  /// No se pudo persistir un hecho (p. ej. un permiso recién otorgado).
  #[error("storage error: {0}")]
  Storage(String),

  /// El transporte de notificaciones falló.
  #[error("delivery error: {0}")]
  Delivery(String),

  #[error("not authorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("not found")]
  NotFound,

  /// Fallo interno que no depende de la entrada (hash, tarea bloqueante caída...).
  #[error("internal error: {0}")]
  Internal(String),
}

impl From<RepoError> for CoreError {
  fn from(err: RepoError) -> Self {
    match err {
      RepoError::NotFound => CoreError::NotFound,
      RepoError::Conflict(msg) => CoreError::Conflict(msg),
      RepoError::Storage(msg) => CoreError::Repository(msg),
    }
  }
}
