use std::time::Duration;

use musiclib_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use musiclib_core::events::EventBusSettings;
use serde::{Deserialize, Serialize};

/// `[search]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
  /// Per-branch deadline. Absent means branches may take as long as they need.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout_ms: Option<u64>,
}

impl SearchConfig {
  pub fn timeout(&self) -> Option<Duration> {
    self.timeout_ms.map(Duration::from_millis)
  }
}

/// Runtime settings owned by the composition root (`[events]` + `[search]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
  pub events: EventBusSettings,
  pub search: SearchConfig,
}

impl Settings {
  /// Reads both sections and writes the defaults back so they show up in the file.
  pub fn load() -> Result<Self, ConfigError> {
    let events: EventBusSettings = CONFIG_BACKEND.load_section_with_default("events")?;
    let search: SearchConfig = CONFIG_BACKEND.load_section_with_default("search")?;
    CONFIG_BACKEND.save_section("events", &events)?;
    CONFIG_BACKEND.save_section("search", &search)?;
    Ok(Self { events, search })
  }
}
