use serde::{Deserialize, Serialize};

use crate::domain::Notification;

/// Eventos que viajan por el bus. Cada variante lleva su propio payload tipado,
/// así el consumidor hace un `match` exhaustivo en vez de inspeccionar tipos en runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Event {
  SendNotification(Notification),
}

/// Discriminante de [`Event`], útil para logs y métricas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
  SendNotification,
}

impl Event {
  pub fn kind(&self) -> EventKind {
    match self {
      Event::SendNotification(_) => EventKind::SendNotification,
    }
  }
}

impl From<Notification> for Event {
  fn from(notification: Notification) -> Self {
    Event::SendNotification(notification)
  }
}
