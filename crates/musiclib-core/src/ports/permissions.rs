use async_trait::async_trait;

use crate::domain::ResourcePermission;
use crate::ports::RepoError;

/// Almacén de hechos de permiso.
///
/// Cada llamada individual debe ser atómica; el almacén no ofrece nada
/// que combine consulta y escritura.
#[async_trait]
pub trait PermissionStore: Send + Sync {
  /// Registra el hecho. Puede guardar duplicados.
  async fn insert(&self, permission: &ResourcePermission) -> Result<(), RepoError>;

  /// `true` si existe al menos un registro con la misma clave compuesta.
  async fn contains(&self, permission: &ResourcePermission) -> Result<bool, RepoError>;
}
