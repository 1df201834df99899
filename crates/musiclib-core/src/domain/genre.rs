use crate::domain::ids::GenreId;
use serde::{Deserialize, Serialize};

/// Género musical. El nombre es único sin distinguir mayúsculas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
  pub id: GenreId,
  pub name: String,
}
