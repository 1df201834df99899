use crate::domain::album::Album;
use crate::domain::ids::{ArtistId, UserId};
use serde::{Deserialize, Serialize};

/// Representa a un artista dentro del catálogo.
///
/// Cada artista pertenece a la cuenta que lo creó (`owner_id`); esa cuenta
/// recibe el permiso de edición en el momento de la creación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
  /// Identificador único del artista.
  pub id: ArtistId,

  /// Nombre principal (canónico) del artista.
  pub name: String,

  /// Descripción o biografía opcional.
  pub description: Option<String>,

  /// Año de formación del proyecto, si se conoce.
  pub formation_year: Option<i32>,

  /// Usuario dueño de la ficha.
  pub owner_id: UserId,
}

/// Datos necesarios para dar de alta un artista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArtist {
  pub name: String,
  pub description: Option<String>,
  pub formation_year: Option<i32>,
}

/// Un artista junto con su discografía, tal como se muestra en su ficha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetails {
  #[serde(flatten)]
  pub artist: Artist,
  pub albums: Vec<Album>,
}
