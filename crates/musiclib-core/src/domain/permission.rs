use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::ids::{ResourceId, UserId};

/// Tipo de recurso protegido por permisos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
  Song,
  Album,
  Artist,
}

/// Acción permitida sobre un recurso.
///
/// Un permiso no implica a otro: `Edit` no concede `View`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
  Edit,
  View,
}

impl ResourceKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ResourceKind::Song => "song",
      ResourceKind::Album => "album",
      ResourceKind::Artist => "artist",
    }
  }
}

impl Permission {
  pub fn as_str(&self) -> &'static str {
    match self {
      Permission::Edit => "edit",
      Permission::View => "view",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct ParseKindError {
  pub(crate) what: &'static str,
  pub(crate) value: String,
}

impl FromStr for ResourceKind {
  type Err = ParseKindError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "song" => Ok(ResourceKind::Song),
      "album" => Ok(ResourceKind::Album),
      "artist" => Ok(ResourceKind::Artist),
      other => Err(ParseKindError { what: "resource kind", value: other.to_string() }),
    }
  }
}

impl FromStr for Permission {
  type Err = ParseKindError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "edit" => Ok(Permission::Edit),
      "view" => Ok(Permission::View),
      other => Err(ParseKindError { what: "permission", value: other.to_string() }),
    }
  }
}

impl fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl fmt::Display for Permission {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Hecho de permiso: "el usuario U puede hacer P sobre el recurso R de tipo T".
///
/// La clave compuesta son los cuatro campos. Los hechos se escriben una vez y no
/// se actualizan; solo desaparecen si el almacenamiento borra el recurso en cascada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePermission {
  pub user_id: UserId,
  pub resource_id: ResourceId,
  pub resource_kind: ResourceKind,
  pub permission: Permission,
}

impl ResourcePermission {
  pub fn new(
    user_id: UserId,
    resource_id: impl Into<ResourceId>,
    resource_kind: ResourceKind,
    permission: Permission,
  ) -> Self {
    Self { user_id, resource_id: resource_id.into(), resource_kind, permission }
  }
}
