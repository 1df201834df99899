use async_trait::async_trait;
use musiclib_core::CoreError;
use musiclib_core::ports::PasswordHasher;
use tracing::warn;

/// `PasswordHasher` over bcrypt. Every call runs on tokio's blocking pool.
pub struct BcryptHasher {
  cost: u32,
}

impl BcryptHasher {
  pub fn new(cost: u32) -> Self {
    Self { cost }
  }
}

impl Default for BcryptHasher {
  fn default() -> Self {
    Self::new(bcrypt::DEFAULT_COST)
  }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
  async fn hash(&self, password: &str) -> Result<String, CoreError> {
    let (password, cost) = (password.to_string(), self.cost);
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
      .await
      .map_err(|e| CoreError::Internal(format!("hashing task failed: {e}")))?
      .map_err(|e| CoreError::Internal(format!("cannot hash password: {e}")))
  }

  async fn verify(&self, password: &str, hash: &str) -> bool {
    let (password, hash) = (password.to_string(), hash.to_string());
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await;
    match outcome {
      Ok(Ok(matches)) => matches,
      // A corrupt stored hash must never authenticate.
      Ok(Err(e)) => {
        warn!(error = %e, "stored password hash could not be verified");
        false
      }
      Err(e) => {
        warn!(error = %e, "password verification task failed");
        false
      }
    }
  }
}
