use async_trait::async_trait;
use diesel::prelude::*;

use musiclib_core::domain::{NewProfile, Profile, UserId};
use musiclib_core::ports::{ProfileRepository, RepoError};

use crate::models::{ProfileRow, db_id};
use crate::schema::profiles;
use crate::{DbPool, db_err, run_blocking};

/// Tabla `profiles`: la clave primaria es el usuario, así que un segundo
/// perfil choca con la restricción y vuelve como `Conflict`.
#[derive(Clone)]
pub struct SqliteProfileRepository {
  pool: DbPool,
}

impl SqliteProfileRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
  async fn create(&self, user_id: UserId, profile: &NewProfile) -> Result<Profile, RepoError> {
    let row = ProfileRow::new(user_id, profile);
    run_blocking(&self.pool, move |conn| {
      diesel::insert_into(profiles::table)
        .values(&row)
        .returning(ProfileRow::as_returning())
        .get_result::<ProfileRow>(conn)
        .map(Profile::from)
        .map_err(db_err)
    })
    .await
  }

  async fn find(&self, user_id: UserId) -> Result<Option<Profile>, RepoError> {
    run_blocking(&self.pool, move |conn| {
      profiles::table
        .find(db_id(user_id))
        .select(ProfileRow::as_select())
        .first::<ProfileRow>(conn)
        .optional()
        .map(|row| row.map(Profile::from))
        .map_err(db_err)
    })
    .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_db;
  use musiclib_core::domain::NewUser;
  use musiclib_core::ports::UserRepository;

  #[tokio::test]
  async fn one_profile_per_user() {
    let (db, _dir) = test_db::open();
    let user = db.users().create(&NewUser::unverified("Ana", "ana@example.com", "h".into())).await.unwrap();
    let repo = db.profiles();

    assert_eq!(repo.find(user.id).await.unwrap(), None);

    let new = NewProfile { bio: Some("Drums".into()), avatar_url: Some("https://img.test/ana.png".into()) };
    let created = repo.create(user.id, &new).await.unwrap();
    assert_eq!(created, Profile { user_id: user.id, bio: new.bio.clone(), avatar_url: new.avatar_url.clone() });
    assert_eq!(repo.find(user.id).await.unwrap(), Some(created));

    let again = repo.create(user.id, &NewProfile::default()).await;
    assert!(matches!(again, Err(RepoError::Conflict(_))));
  }

  #[tokio::test]
  async fn profile_of_unknown_user_is_rejected() {
    let (db, _dir) = test_db::open();

    // FOREIGN KEY contra `users`, no es un conflicto de unicidad.
    let err = db.profiles().create(UserId::new(404), &NewProfile::default()).await.unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
  }
}
