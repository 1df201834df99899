use async_trait::async_trait;

use crate::domain::{NewProfile, Profile, UserId};
use crate::ports::RepoError;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
  /// `RepoError::Conflict` si el usuario ya tiene perfil.
  async fn create(&self, user_id: UserId, profile: &NewProfile) -> Result<Profile, RepoError>;
  async fn find(&self, user_id: UserId) -> Result<Option<Profile>, RepoError>;
}
