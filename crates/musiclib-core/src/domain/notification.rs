use serde::{Deserialize, Serialize};

/// Mensaje a entregar por el transporte de correo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub recipient: String,
  pub subject: String,
  pub body: String,
}

impl Notification {
  pub fn new(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
    Self { recipient: recipient.into(), subject: subject.into(), body: body.into() }
  }

  /// Correo con el código de verificación de cuenta.
  pub fn verification_code(recipient: &str, code: &str) -> Self {
    Self::new(
      recipient,
      "Confirm your email",
      format!("Your personal verification code is {code}. Do not share this code with anyone."),
    )
  }
}
