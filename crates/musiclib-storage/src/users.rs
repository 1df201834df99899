use async_trait::async_trait;
use diesel::prelude::*;

use musiclib_core::domain::{NewUser, User};
use musiclib_core::ports::{RepoError, UserRepository};

use crate::models::{NewUserRow, UserChanges, UserRow, db_id};
use crate::schema::users;
use crate::{DbPool, db_err, run_blocking};

#[derive(Clone)]
pub struct SqliteUserRepository {
  pool: DbPool,
}

impl SqliteUserRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
  async fn create(&self, user: &NewUser) -> Result<User, RepoError> {
    let user = user.clone();
    run_blocking(&self.pool, move |conn| {
      diesel::insert_into(users::table)
        .values(&NewUserRow::from(&user))
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(conn)
        .map_err(db_err)?
        .try_into()
    })
    .await
  }

  async fn update(&self, user: &User) -> Result<User, RepoError> {
    let user = user.clone();
    run_blocking(&self.pool, move |conn| {
      diesel::update(users::table.find(db_id(user.id)))
        .set(&UserChanges::from(&user))
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(conn)
        .map_err(db_err)?
        .try_into()
    })
    .await
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
    let email = email.to_string();
    run_blocking(&self.pool, move |conn| {
      users::table
        .filter(users::email.eq(&email))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()
        .map_err(db_err)?
        .map(User::try_from)
        .transpose()
    })
    .await
  }

  async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, RepoError> {
    let session_id = session_id.to_string();
    run_blocking(&self.pool, move |conn| {
      users::table
        .filter(users::session_id.eq(&session_id))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()
        .map_err(db_err)?
        .map(User::try_from)
        .transpose()
    })
    .await
  }
}
