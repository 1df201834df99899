pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod search;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::CoreError;
