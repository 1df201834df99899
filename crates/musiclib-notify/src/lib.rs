//! Entrega de notificaciones: consume el bus de eventos y las pasa al mailer.

pub mod config;
pub mod listener;
pub mod log_mailer;
pub mod smtp_mailer;
pub mod transport;

pub use config::MailerConfig;
pub use listener::{DeliveryStats, NotificationListener};
pub use log_mailer::LogMailer;
pub use smtp_mailer::SmtpMailer;
pub use transport::MailTransport;
