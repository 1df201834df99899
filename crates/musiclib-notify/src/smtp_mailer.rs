use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use musiclib_core::domain::Notification;
use musiclib_core::ports::{Mailer, MailerError};

use crate::config::MailerConfig;

/// Mailer SMTP sobre lettre, con TLS implícito (rustls).
///
/// Construirlo no abre ninguna conexión: el pool de lettre conecta en el
/// primer `send`.
pub struct SmtpMailer {
  from: Mailbox,
  transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
  pub fn new(config: &MailerConfig, host: &str) -> Result<Self, MailerError> {
    let from = config
      .from_header()
      .parse::<Mailbox>()
      .map_err(|e: AddressError| MailerError::Config(format!("invalid sender {}: {e}", config.from_header())))?;

    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
      .map_err(|e| MailerError::Config(format!("invalid smtp host {host}: {e}")))?
      .port(config.port);
    if let (Some(user), Some(password)) = (&config.username, &config.password) {
      builder = builder.credentials(Credentials::new(user.clone(), password.clone())).authentication(vec![Mechanism::Plain]);
    }

    debug!(host, port = config.port, authenticated = config.username.is_some(), "smtp transport ready");
    Ok(Self { from, transport: builder.build() })
  }

  pub fn from_mailbox(&self) -> &Mailbox {
    &self.from
  }
}

#[async_trait]
impl Mailer for SmtpMailer {
  async fn send(&self, notification: &Notification) -> Result<(), MailerError> {
    let to = notification
      .recipient
      .trim()
      .parse::<Mailbox>()
      .map_err(|_| MailerError::InvalidRecipient(notification.recipient.clone()))?;

    let message = Message::builder()
      .from(self.from.clone())
      .to(to)
      .subject(notification.subject.clone())
      .header(ContentType::TEXT_PLAIN)
      .body(notification.body.clone())
      .map_err(|e| MailerError::Transport(format!("cannot build message: {e}")))?;

    self.transport.send(message).await.map_err(|e| MailerError::Transport(e.to_string()))?;

    info!(to = %notification.recipient, subject = %notification.subject, "mail sent over smtp");
    Ok(())
  }
}
