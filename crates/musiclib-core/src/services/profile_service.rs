use tracing::{debug, error};

use crate::domain::{NewProfile, Profile, UserId};
use crate::errors::CoreError;
use crate::ports::{ProfileRepository, RepoError};

/// Perfiles públicos: uno por cuenta, se crean una vez y se leen por usuario.
pub struct ProfileService<R>
where
  R: ProfileRepository,
{
  profiles: R,
}

impl<R> ProfileService<R>
where
  R: ProfileRepository,
{
  pub fn new(profiles: R) -> Self {
    Self { profiles }
  }

  /// `Conflict` si el usuario ya tiene perfil.
  pub async fn create_profile(&self, user_id: UserId, new: &NewProfile) -> Result<Profile, CoreError> {
    match self.profiles.create(user_id, new).await {
      Ok(profile) => {
        debug!(%user_id, "profile created");
        Ok(profile)
      }
      Err(RepoError::Conflict(_)) => Err(CoreError::Conflict(format!("profile already exists for user {user_id}"))),
      Err(e) => {
        error!(%user_id, error = %e, "failed to create profile");
        Err(e.into())
      }
    }
  }

  pub async fn get_profile(&self, user_id: UserId) -> Result<Profile, CoreError> {
    self.profiles.find(user_id).await?.ok_or(CoreError::NotFound)
  }
}
