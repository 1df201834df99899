use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use musiclib_core::events::{Event, Subscription};
use musiclib_core::ports::Mailer;

/// Resumen de lo que hizo el listener hasta que el bus se cerró.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
  pub delivered: u64,
  pub failed: u64,
}

/// Único consumidor del bus de eventos.
///
/// Drena en orden y entrega cada notificación de forma secuencial. Un fallo
/// del mailer se registra y se descarta: no hay reintentos y no se detiene el
/// bucle.
pub struct NotificationListener<M>
where
  M: Mailer,
{
  mailer: Arc<M>,
}

impl<M> NotificationListener<M>
where
  M: Mailer + 'static,
{
  pub fn new(mailer: Arc<M>) -> Self {
    Self { mailer }
  }

  /// Corre hasta que todos los productores sueltan el bus.
  pub async fn run(&self, mut events: Subscription<Event>) -> DeliveryStats {
    let mut stats = DeliveryStats::default();

    while let Some(event) = events.recv().await {
      let kind = event.kind();
      match event {
        Event::SendNotification(notification) => match self.mailer.send(&notification).await {
          Ok(()) => {
            stats.delivered += 1;
            debug!(?kind, recipient = %notification.recipient, "notification delivered");
          }
          Err(e) => {
            stats.failed += 1;
            error!(?kind, recipient = %notification.recipient, error = %e, "failed to send notification");
          }
        },
      }
    }

    info!(delivered = stats.delivered, failed = stats.failed, "event bus closed, listener stopping");
    stats
  }

  /// Lanza [`run`](Self::run) en una tarea de tokio.
  pub fn spawn(self, events: Subscription<Event>) -> JoinHandle<DeliveryStats> {
    tokio::spawn(async move { self.run(events).await })
  }
}
