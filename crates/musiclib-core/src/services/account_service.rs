use tracing::{debug, info, warn};

use crate::domain::{NewUser, Notification, User};
use crate::errors::CoreError;
use crate::events::{BackgroundPublisher, Event};
use crate::ports::{PasswordHasher, UserRepository};

/// Alta, verificación por correo y login de cuentas.
///
/// El correo de verificación no se manda desde aquí: se publica un
/// [`Event::SendNotification`] en segundo plano y el listener de
/// notificaciones se encarga de entregarlo. `register` nunca espera al mailer.
pub struct AccountService<U, H>
where
  U: UserRepository,
  H: PasswordHasher,
{
  users: U,
  hasher: H,
  events: BackgroundPublisher<Event>,
}

impl<U, H> AccountService<U, H>
where
  U: UserRepository,
  H: PasswordHasher,
{
  pub fn new(users: U, hasher: H, events: BackgroundPublisher<Event>) -> Self {
    Self { users, hasher, events }
  }

  /// Registra (o re-registra) una cuenta y devuelve el id de sesión de verificación.
  ///
  /// - email de una cuenta verificada: `Conflict`;
  /// - email de una cuenta sin verificar: nuevas credenciales y nuevo correo;
  /// - email nuevo: cuenta sin verificar con rol `User`.
  ///
  /// Debe llamarse dentro de un runtime de tokio.
  pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<String, CoreError> {
    let email = email.trim();
    validate_registration(email, password, name)?;

    let user = match self.users.find_by_email(email).await? {
      Some(existing) if existing.is_verified => {
        return Err(CoreError::Conflict(format!("user with email {email} already exists")));
      }
      Some(mut pending) => {
        debug!(user_id = %pending.id, "re-registering unverified user");
        pending.regenerate_credentials();
        self.users.update(&pending).await?
      }
      None => {
        let hash = self.hasher.hash(password).await?;
        let user = self.users.create(&NewUser::unverified(name.trim(), email, hash)).await?;
        info!(user_id = %user.id, "user registered");
        user
      }
    };

    self.notify(Notification::verification_code(&user.email, &user.code));
    Ok(user.session_id)
  }

  /// Marca la cuenta como verificada si `code` coincide con el de la sesión.
  pub async fn verify(&self, session_id: &str, code: &str) -> Result<User, CoreError> {
    let mut user = self.users.find_by_session(session_id).await?.ok_or(CoreError::NotFound)?;

    if user.code != code {
      debug!(user_id = %user.id, "verification code mismatch");
      return Err(CoreError::Unauthorized);
    }

    user.is_verified = true;
    let user = self.users.update(&user).await?;
    info!(user_id = %user.id, "user verified");
    Ok(user)
  }

  pub async fn login(&self, email: &str, password: &str) -> Result<User, CoreError> {
    let wrong_credentials = || CoreError::Validation("wrong user credentials".into());

    let user = self.users.find_by_email(email.trim()).await?.ok_or_else(wrong_credentials)?;
    if !self.hasher.verify(password, &user.password_hash).await {
      return Err(wrong_credentials());
    }
    if !user.is_verified {
      return Err(CoreError::Validation("user is not verified".into()));
    }

    Ok(user)
  }

  fn notify(&self, notification: Notification) {
    let recipient = notification.recipient.clone();
    // Fire-and-forget: la cuenta ya está guardada, un correo perdido se
    // recupera registrándose de nuevo.
    if let Err(e) = self.events.dispatch(Event::SendNotification(notification)) {
      warn!(error = %e, %recipient, "verification email was not queued");
    }
  }
}

fn validate_registration(email: &str, password: &str, name: &str) -> Result<(), CoreError> {
  if name.trim().is_empty() {
    return Err(CoreError::Validation("name is required".into()));
  }
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
    _ => return Err(CoreError::Validation(format!("invalid email: {email}"))),
  }
  if password.is_empty() {
    return Err(CoreError::Validation("password is required".into()));
  }
  Ok(())
}
