use async_trait::async_trait;

use crate::errors::CoreError;

/// Hash de contraseñas (bcrypt, argon2...). El núcleo no elige el algoritmo.
///
/// Los algoritmos buenos son lentos a propósito: las implementaciones no
/// deben ocupar un hilo del runtime mientras calculan.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  async fn hash(&self, password: &str) -> Result<String, CoreError>;

  /// `false` ante cualquier error: una verificación fallida nunca autentica.
  async fn verify(&self, password: &str, hash: &str) -> bool;
}
