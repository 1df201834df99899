//! Bus de eventos en proceso.
//!
//! Desacopla a los productores (flujo de cuentas) del único consumidor
//! (entrega de correo). Ver [`EventBus`] para las garantías de orden y
//! [`BackgroundPublisher`] para publicar sin esperar.

mod bus;
mod event;
mod publisher;

pub use bus::{BusError, EventBus, EventBusSettings, Subscription};
pub use event::{Event, EventKind};
pub use publisher::BackgroundPublisher;
