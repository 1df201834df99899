use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use musiclib_core::domain::Notification;
use musiclib_core::ports::{Mailer, MailerError};

use crate::config::MailerConfig;

/// Mailer que no sale de la máquina: escribe cada correo en el log.
///
/// Sirve en desarrollo y como transporte por defecto mientras no haya un SMTP
/// configurado. Valida el destinatario igual que lo haría un transporte real.
pub struct LogMailer {
  from: String,
  sent: AtomicU64,
}

impl LogMailer {
  pub fn new(config: &MailerConfig) -> Self {
    Self { from: config.from_header(), sent: AtomicU64::new(0) }
  }

  pub fn from_header(&self) -> &str {
    &self.from
  }

  pub fn sent(&self) -> u64 {
    self.sent.load(Ordering::Relaxed)
  }
}

#[async_trait]
impl Mailer for LogMailer {
  async fn send(&self, notification: &Notification) -> Result<(), MailerError> {
    let recipient = notification.recipient.trim();
    match recipient.split_once('@') {
      Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
      _ => return Err(MailerError::InvalidRecipient(notification.recipient.clone())),
    }

    info!(
      from = %self.from,
      to = %recipient,
      subject = %notification.subject,
      body_len = notification.body.len(),
      "mail sent"
    );
    self.sent.fetch_add(1, Ordering::Relaxed);
    Ok(())
  }
}
