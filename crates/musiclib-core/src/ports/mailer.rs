use async_trait::async_trait;

use crate::domain::Notification;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("invalid recipient: {0}")]
  InvalidRecipient(String),

  /// Configuración del transporte inválida (remitente, servidor...).
  #[error("mailer config error: {0}")]
  Config(String),
}

/// Transporte de salida para las notificaciones.
///
/// Quien consume el bus llama a `send` de forma secuencial; un error se
/// registra y no detiene las entregas siguientes.
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, notification: &Notification) -> Result<(), MailerError>;
}
