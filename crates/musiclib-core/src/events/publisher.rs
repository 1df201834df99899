use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::events::bus::{BusError, EventBus, EventBusSettings};

/// Publica en el bus desde una tarea aparte, sin que el llamador espere.
///
/// Cada `dispatch` lanza una tarea de tokio que hace `publish().await`. La
/// cantidad de tareas vivas está acotada por un semáforo de `max_in_flight`
/// permisos: con el cupo agotado el evento se descarta (con un `warn!`) en
/// lugar de acumular tareas sin límite. Así, como mucho, quedan retenidos en
/// memoria `queue_capacity + max_in_flight` eventos.
///
/// El orden entre dos `dispatch` seguidos no está garantizado; quien necesite
/// FIFO estricto debe usar [`EventBus::publish`] directamente.
pub struct BackgroundPublisher<E> {
  bus: Arc<EventBus<E>>,
  permits: Arc<Semaphore>,
  max_in_flight: usize,
}

impl<E> Clone for BackgroundPublisher<E> {
  fn clone(&self) -> Self {
    Self { bus: Arc::clone(&self.bus), permits: Arc::clone(&self.permits), max_in_flight: self.max_in_flight }
  }
}

impl<E> BackgroundPublisher<E>
where
  E: Send + 'static,
{
  pub fn new(bus: Arc<EventBus<E>>, max_in_flight: usize) -> Self {
    let max_in_flight = max_in_flight.max(1);
    Self { bus, permits: Arc::new(Semaphore::new(max_in_flight)), max_in_flight }
  }

  pub fn from_settings(bus: Arc<EventBus<E>>, settings: &EventBusSettings) -> Self {
    Self::new(bus, settings.max_in_flight)
  }

  /// Fire-and-forget. Debe llamarse dentro de un runtime de tokio.
  ///
  /// El `Err` solo informa de que el evento no se pudo ni siquiera lanzar;
  /// los fallos posteriores (bus cerrado) quedan en el log.
  pub fn dispatch(&self, event: E) -> Result<(), BusError> {
    let permit = match Arc::clone(&self.permits).try_acquire_owned() {
      Ok(permit) => permit,
      Err(_) => {
        warn!(max_in_flight = self.max_in_flight, "publish tasks saturated, dropping event");
        return Err(BusError::Saturated);
      }
    };

    let bus = Arc::clone(&self.bus);
    tokio::spawn(async move {
      match bus.publish(event).await {
        Ok(()) => debug!("event enqueued"),
        Err(e) => warn!(error = %e, "event dropped"),
      }
      drop(permit);
    });

    Ok(())
  }

  /// Tareas de publicación que aún no terminaron de encolar.
  pub fn in_flight(&self) -> usize {
    self.max_in_flight - self.permits.available_permits()
  }
}
