use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::ids::UserId;
use crate::domain::permission::ParseKindError;

/// Longitud del identificador de sesión de verificación.
pub const SESSION_ID_LEN: usize = 10;
/// Cantidad de dígitos del código enviado por correo.
pub const CODE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "user",
      Role::Admin => "admin",
    }
  }
}

impl FromStr for Role {
  type Err = ParseKindError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "user" => Ok(Role::User),
      "admin" => Ok(Role::Admin),
      other => Err(ParseKindError { what: "role", value: other.to_string() }),
    }
  }
}

/// Cuenta de usuario.
///
/// `session_id` y `code` forman el par de verificación de correo: el cliente
/// recibe el primero al registrarse y el segundo le llega por email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role: Role,
  pub session_id: String,
  #[serde(skip_serializing)]
  pub code: String,
  pub is_verified: bool,
}

impl User {
  /// Emite un nuevo par sesión/código; invalida el anterior.
  pub fn regenerate_credentials(&mut self) {
    let (session_id, code) = generate_credentials();
    self.session_id = session_id;
    self.code = code;
  }
}

/// Datos de una cuenta aún no persistida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub role: Role,
  pub session_id: String,
  pub code: String,
}

impl NewUser {
  /// Cuenta nueva, sin verificar, con credenciales de verificación recién generadas.
  pub fn unverified(name: &str, email: &str, password_hash: String) -> Self {
    let (session_id, code) = generate_credentials();
    Self { name: name.to_string(), email: email.to_string(), password_hash, role: Role::User, session_id, code }
  }
}

fn generate_credentials() -> (String, String) {
  let mut rng = rand::thread_rng();
  let session_id = (&mut rng).sample_iter(&Alphanumeric).take(SESSION_ID_LEN).map(char::from).collect();
  let code = (0..CODE_LEN).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect();
  (session_id, code)
}
