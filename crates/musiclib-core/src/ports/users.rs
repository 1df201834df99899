use async_trait::async_trait;

use crate::domain::{NewUser, User};
use crate::ports::RepoError;

#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn create(&self, user: &NewUser) -> Result<User, RepoError>;
  async fn update(&self, user: &User) -> Result<User, RepoError>;
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
  async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, RepoError>;
}
