use musiclib_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

/// Sección `[mailer]` de `musiclib.toml`.
///
/// Sin `host` el correo solo se escribe en el log; con `host` sale por SMTP
/// (TLS implícito, de ahí el puerto 465 por defecto).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MailerConfig {
  /// Nombre visible del remitente.
  #[serde(default = "default_from_name")]
  pub from_name: String,

  #[serde(default = "default_from_email")]
  pub from_email: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub host: Option<String>,

  #[serde(default = "default_port")]
  pub port: u16,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
}

fn default_from_name() -> String {
  "musiclib".into()
}

fn default_from_email() -> String {
  "no-reply@musiclib.local".into()
}

fn default_port() -> u16 {
  465
}

impl Default for MailerConfig {
  fn default() -> Self {
    MailerConfig {
      from_name: default_from_name(),
      from_email: default_from_email(),
      host: None,
      port: default_port(),
      username: None,
      password: None,
    }
  }
}

impl MailerConfig {
  /// Cabecera `From` con el formato `Nombre <correo>`.
  pub fn from_header(&self) -> String {
    format!("{} <{}>", self.from_name, self.from_email)
  }

  /// Servidor SMTP, si hay uno configurado y no está en blanco.
  pub fn smtp_host(&self) -> Option<&str> {
    self.host.as_deref().map(str::trim).filter(|h| !h.is_empty())
  }

  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("mailer")?;
    CONFIG_BACKEND.save_section("mailer", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("mailer", self)
  }
}
