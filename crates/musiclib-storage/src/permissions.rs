use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;

use musiclib_core::domain::ResourcePermission;
use musiclib_core::ports::{PermissionStore, RepoError};

use crate::models::{NewPermissionRow, db_id};
use crate::schema::resource_permissions::dsl::*;
use crate::{DbPool, db_err, run_blocking};

/// Tabla `resource_permissions`. Cada llamada es una única sentencia SQL.
#[derive(Clone)]
pub struct SqlitePermissionStore {
  pool: DbPool,
}

impl SqlitePermissionStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl PermissionStore for SqlitePermissionStore {
  async fn insert(&self, fact: &ResourcePermission) -> Result<(), RepoError> {
    let row = NewPermissionRow::from(fact);
    run_blocking(&self.pool, move |conn| {
      diesel::insert_into(resource_permissions).values(&row).execute(conn).map_err(db_err)?;
      Ok(())
    })
    .await
  }

  async fn contains(&self, fact: &ResourcePermission) -> Result<bool, RepoError> {
    let fact = *fact;
    run_blocking(&self.pool, move |conn| {
      diesel::select(exists(
        resource_permissions
          .filter(user_id.eq(db_id(fact.user_id)))
          .filter(resource_id.eq(db_id(fact.resource_id)))
          .filter(resource_kind.eq(fact.resource_kind.as_str()))
          .filter(permission.eq(fact.permission.as_str())),
      ))
      .get_result(conn)
      .map_err(db_err)
    })
    .await
  }
}
