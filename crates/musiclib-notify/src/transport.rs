use async_trait::async_trait;

use musiclib_core::domain::Notification;
use musiclib_core::ports::{Mailer, MailerError};

use crate::config::MailerConfig;
use crate::log_mailer::LogMailer;
use crate::smtp_mailer::SmtpMailer;

/// El transporte que pide `[mailer]`: SMTP si hay `host`, el log si no.
pub enum MailTransport {
  Smtp(SmtpMailer),
  Log(LogMailer),
}

impl MailTransport {
  pub fn from_config(config: &MailerConfig) -> Result<Self, MailerError> {
    match config.smtp_host() {
      Some(host) => Ok(Self::Smtp(SmtpMailer::new(config, host)?)),
      None => Ok(Self::Log(LogMailer::new(config))),
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Smtp(_) => "smtp",
      Self::Log(_) => "log",
    }
  }
}

#[async_trait]
impl Mailer for MailTransport {
  async fn send(&self, notification: &Notification) -> Result<(), MailerError> {
    match self {
      Self::Smtp(mailer) => mailer.send(notification).await,
      Self::Log(mailer) => mailer.send(notification).await,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn without_host_mail_goes_to_the_log() {
    let transport = MailTransport::from_config(&MailerConfig::default()).unwrap();
    assert_eq!(transport.name(), "log");

    let blank = MailerConfig { host: Some(String::new()), ..Default::default() };
    assert!(matches!(MailTransport::from_config(&blank).unwrap(), MailTransport::Log(_)));
  }

  #[test]
  fn configured_host_selects_smtp() {
    let cfg = MailerConfig {
      host: Some("smtp.music.test".into()),
      port: 2465,
      username: Some("bot".into()),
      password: Some("s3cret".into()),
      ..Default::default()
    };

    let transport = MailTransport::from_config(&cfg).unwrap();

    assert_eq!(transport.name(), "smtp");
  }

  #[test]
  fn bad_sender_only_matters_for_smtp() {
    let cfg = MailerConfig { from_email: "broken".into(), ..Default::default() };
    assert!(MailTransport::from_config(&cfg).is_ok());

    let smtp = MailerConfig { host: Some("smtp.music.test".into()), ..cfg };
    assert!(matches!(MailTransport::from_config(&smtp), Err(MailerError::Config(_))));
  }

  #[tokio::test]
  async fn log_transport_delivers() {
    let transport = MailTransport::from_config(&MailerConfig::default()).unwrap();

    transport.send(&Notification::verification_code("ana@example.com", "1234")).await.unwrap();

    assert!(matches!(&transport, MailTransport::Log(log) if log.sent() == 1));
  }
}
