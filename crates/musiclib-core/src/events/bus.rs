use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
  /// Este bus admite un único suscriptor durante toda su vida.
  #[error("the bus already has a subscriber")]
  AlreadySubscribed,

  /// La cola llegó a `queue_capacity` (solo `try_publish`).
  #[error("event queue is full")]
  Full,

  /// El suscriptor soltó su `Subscription`; ya nadie va a drenar.
  #[error("event bus is closed")]
  Closed,

  /// Todos los permisos de publicación en segundo plano están ocupados.
  #[error("too many in-flight publish tasks")]
  Saturated,
}

/// Sección `[events]` de la configuración.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBusSettings {
  /// Eventos que la cola retiene mientras nadie drena.
  #[serde(default = "default_queue_capacity")]
  pub queue_capacity: usize,

  /// Máximo de tareas de publicación en segundo plano vivas a la vez.
  #[serde(default = "default_max_in_flight")]
  pub max_in_flight: usize,
}

fn default_queue_capacity() -> usize {
  256
}

fn default_max_in_flight() -> usize {
  64
}

impl Default for EventBusSettings {
  fn default() -> Self {
    Self { queue_capacity: default_queue_capacity(), max_in_flight: default_max_in_flight() }
  }
}

/// Canal tipado de publicación/suscripción con un solo consumidor.
///
/// # Garantías
/// - Los eventos se entregan en el orden en que se encolaron. Con un solo
///   productor que llama a `publish` secuencialmente eso es FIFO; con varios
///   productores concurrentes el orden global es el que resulte de serializar
///   sus encolados.
/// - Si todavía no hay suscriptor, los eventos esperan en la cola.
/// - La cola es acotada (`queue_capacity`). `publish` solo espera mientras
///   la cola está llena; `try_publish` no espera nunca.
/// - Entrega best-effort: el bus no reintenta ni informa al productor de lo
///   que le pase al consumidor.
///
/// El bus se comparte por referencia (`Arc`) entre productores y consumidor.
pub struct EventBus<E> {
  tx: mpsc::Sender<E>,
  rx: Mutex<Option<mpsc::Receiver<E>>>,
}

impl<E> EventBus<E> {
  pub fn new(queue_capacity: usize) -> Self {
    let (tx, rx) = mpsc::channel(queue_capacity.max(1));
    Self { tx, rx: Mutex::new(Some(rx)) }
  }

  pub fn from_settings(settings: &EventBusSettings) -> Self {
    Self::new(settings.queue_capacity)
  }

  /// Encola `event`, esperando solo si la cola está llena.
  pub async fn publish(&self, event: E) -> Result<(), BusError> {
    self.tx.send(event).await.map_err(|_| BusError::Closed)
  }

  /// Encola `event` sin esperar.
  pub fn try_publish(&self, event: E) -> Result<(), BusError> {
    self.tx.try_send(event).map_err(|e| match e {
      TrySendError::Full(_) => BusError::Full,
      TrySendError::Closed(_) => BusError::Closed,
    })
  }

  /// Entrega el extremo receptor. Solo la primera llamada tiene éxito.
  pub fn subscribe(&self) -> Result<Subscription<E>, BusError> {
    let mut slot = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
    slot.take().map(|rx| Subscription { rx }).ok_or(BusError::AlreadySubscribed)
  }

  pub fn queue_capacity(&self) -> usize {
    self.tx.max_capacity()
  }

  /// Eventos encolados que todavía nadie recibió.
  pub fn pending(&self) -> usize {
    self.tx.max_capacity() - self.tx.capacity()
  }

  pub fn is_closed(&self) -> bool {
    self.tx.is_closed()
  }
}

/// Extremo consumidor del bus.
///
/// `recv` espera hasta el próximo evento; solo devuelve `None` si el bus se
/// destruyó. También implementa `Stream`.
#[derive(Debug)]
pub struct Subscription<E> {
  rx: mpsc::Receiver<E>,
}

impl<E> Subscription<E> {
  pub async fn recv(&mut self) -> Option<E> {
    self.rx.recv().await
  }
}

impl<E> Stream for Subscription<E> {
  type Item = E;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<E>> {
    self.rx.poll_recv(cx)
  }
}
