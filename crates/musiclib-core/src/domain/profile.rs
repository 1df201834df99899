use crate::domain::ids::UserId;
use serde::{Deserialize, Serialize};

/// Perfil público de una cuenta. Como mucho uno por usuario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id: UserId,
  pub bio: Option<String>,
  pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
  pub bio: Option<String>,
  pub avatar_url: Option<String>,
}
