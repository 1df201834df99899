use tracing::{debug, error, warn};

use crate::domain::{Permission, ResourceId, ResourceKind, ResourcePermission, UserId};
use crate::errors::CoreError;
use crate::ports::PermissionStore;

/// Registro de permisos por recurso (ACL).
///
/// Contrato con los llamadores:
/// - antes de mutar un recurso: `check(actor, recurso, tipo, Edit)`;
/// - justo después de crearlo: `grant(dueño, recurso, tipo, Edit)`.
///
/// `check` y la mutación posterior son dos llamadas separadas: no hay
/// atomicidad entre ambas. Como los permisos no se revocan, una respuesta
/// `true` no puede volverse falsa antes de la mutación.
pub struct PermissionService<S>
where
  S: PermissionStore,
{
  store: S,
}

impl<S> PermissionService<S>
where
  S: PermissionStore,
{
  pub fn new(store: S) -> Self {
    Self { store }
  }

  /// Registra un permiso. Repetir la misma llamada no cambia lo que responde `check`.
  pub async fn grant(
    &self,
    user_id: UserId,
    resource_id: impl Into<ResourceId>,
    resource_kind: ResourceKind,
    permission: Permission,
  ) -> Result<(), CoreError> {
    let fact = ResourcePermission::new(user_id, resource_id, resource_kind, permission);
    debug!(
      user_id = %fact.user_id,
      resource_id = %fact.resource_id,
      resource_kind = %fact.resource_kind,
      permission = %fact.permission,
      "adding new permission"
    );

    self.store.insert(&fact).await.map_err(|e| {
      error!(
        error = %e,
        user_id = %fact.user_id,
        resource_id = %fact.resource_id,
        resource_kind = %fact.resource_kind,
        permission = %fact.permission,
        "failed to add permission"
      );
      CoreError::Storage(e.to_string())
    })?;

    debug!("permission added successfully");
    Ok(())
  }

  /// Predicado puro. Un fallo del almacén se trata como "sin permiso".
  pub async fn check(
    &self,
    user_id: UserId,
    resource_id: impl Into<ResourceId>,
    resource_kind: ResourceKind,
    permission: Permission,
  ) -> bool {
    let fact = ResourcePermission::new(user_id, resource_id, resource_kind, permission);

    match self.store.contains(&fact).await {
      Ok(found) => found,
      Err(e) => {
        warn!(
          error = %e,
          user_id = %fact.user_id,
          resource_id = %fact.resource_id,
          resource_kind = %fact.resource_kind,
          "permission lookup failed, denying"
        );
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::MemoryPermissionStore;
  use std::sync::Arc;

  fn registry() -> PermissionService<MemoryPermissionStore> {
    PermissionService::new(MemoryPermissionStore::default())
  }

  #[tokio::test]
  async fn grant_then_check_edit_but_not_view() {
    let acl = registry();

    acl.grant(UserId::new(42), ResourceId::new(7), ResourceKind::Song, Permission::Edit).await.unwrap();

    assert!(acl.check(UserId::new(42), ResourceId::new(7), ResourceKind::Song, Permission::Edit).await);
    assert!(!acl.check(UserId::new(42), ResourceId::new(7), ResourceKind::Song, Permission::View).await);
  }

  #[tokio::test]
  async fn never_granted_facts_are_denied() {
    let acl = registry();
    acl.grant(UserId::new(1), ResourceId::new(1), ResourceKind::Album, Permission::Edit).await.unwrap();

    // Cambia un solo componente de la clave cada vez.
    assert!(!acl.check(UserId::new(2), ResourceId::new(1), ResourceKind::Album, Permission::Edit).await);
    assert!(!acl.check(UserId::new(1), ResourceId::new(2), ResourceKind::Album, Permission::Edit).await);
    assert!(!acl.check(UserId::new(1), ResourceId::new(1), ResourceKind::Artist, Permission::Edit).await);
    assert!(!acl.check(UserId::new(1), ResourceId::new(1), ResourceKind::Album, Permission::View).await);
  }

  #[tokio::test]
  async fn duplicate_grants_are_idempotent() {
    let acl = registry();

    for _ in 0..2 {
      acl.grant(UserId::new(3), ResourceId::new(9), ResourceKind::Artist, Permission::Edit).await.unwrap();
      assert!(acl.check(UserId::new(3), ResourceId::new(9), ResourceKind::Artist, Permission::Edit).await);
    }
  }

  #[tokio::test]
  async fn storage_failure_surfaces_on_grant_and_denies_on_check() {
    let store = MemoryPermissionStore::default();
    let acl = PermissionService::new(store.clone());
    acl.grant(UserId::new(5), ResourceId::new(5), ResourceKind::Song, Permission::Edit).await.unwrap();

    store.set_failing(true);

    let err = acl.grant(UserId::new(5), ResourceId::new(6), ResourceKind::Song, Permission::Edit).await.unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    // Fail-closed: aunque el hecho existe, un error de lectura niega.
    assert!(!acl.check(UserId::new(5), ResourceId::new(5), ResourceKind::Song, Permission::Edit).await);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_grants_and_checks_agree() {
    let acl = Arc::new(registry());

    let handles: Vec<_> = (0..8u64)
      .map(|user| {
        let acl = Arc::clone(&acl);
        tokio::spawn(async move {
          for resource in 0..50u64 {
            let (u, r) = (UserId::new(user), ResourceId::new(resource));
            acl.grant(u, r, ResourceKind::Song, Permission::Edit).await.unwrap();
            assert!(acl.check(u, r, ResourceKind::Song, Permission::Edit).await);
          }
        })
      })
      .collect();

    for h in handles {
      h.await.unwrap();
    }

    for user in 0..8u64 {
      for resource in 0..50u64 {
        let (u, r) = (UserId::new(user), ResourceId::new(resource));
        assert!(acl.check(u, r, ResourceKind::Song, Permission::Edit).await);
        assert!(!acl.check(u, r, ResourceKind::Song, Permission::View).await);
      }
    }
  }
}
