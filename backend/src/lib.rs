mod config;
mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;

use musiclib_core::events::{BackgroundPublisher, Event, EventBus};
use musiclib_core::ports::Mailer;
use musiclib_core::services::{AccountService, CatalogService, PermissionService, ProfileService, SearchService};
use musiclib_notify::{DeliveryStats, MailTransport, MailerConfig, NotificationListener};
use musiclib_storage::{Database, SqliteCatalog, SqlitePermissionStore, SqliteProfileRepository, SqliteUserRepository};

pub use config::{SearchConfig, Settings};
pub use infrastructure::hasher::BcryptHasher;

/// Type aliases to keep the generic service signatures readable.
pub type Accounts = AccountService<SqliteUserRepository, BcryptHasher>;
pub type Catalog = CatalogService<SqliteCatalog, SqlitePermissionStore>;
pub type Permissions = PermissionService<SqlitePermissionStore>;
pub type Profiles = ProfileService<SqliteProfileRepository>;

/// Composition root: every adapter wired into the core services.
///
/// Holds the only `EventBus` in the process. The notification listener runs
/// in its own task for as long as the bus is alive.
pub struct App {
  pub accounts: Accounts,
  pub catalog: Catalog,
  pub profiles: Profiles,
  pub search: SearchService,
  pub permissions: Arc<Permissions>,
  bus: Arc<EventBus<Event>>,
  listener: JoinHandle<DeliveryStats>,
}

impl App {
  /// Builds the app from `musiclib.toml`.
  ///
  /// Mail goes over SMTP when `[mailer].host` is set and to the log otherwise.
  /// Must be called inside a tokio runtime.
  pub fn bootstrap() -> anyhow::Result<Self> {
    let settings = Settings::load().context("failed to load [events]/[search] config")?;
    let mailer = MailerConfig::load().context("failed to load [mailer] config")?;
    let transport = MailTransport::from_config(&mailer).context("invalid [mailer] config")?;
    info!(transport = transport.name(), from = %mailer.from_header(), "mail transport selected");
    let db = Database::open_from_config().context("failed to open database")?;

    Self::build(db, &settings, Arc::new(transport), BcryptHasher::default())
  }

  /// Wires the app over an already opened database and an arbitrary mail transport.
  pub fn build<M>(db: Database, settings: &Settings, mailer: Arc<M>, hasher: BcryptHasher) -> anyhow::Result<Self>
  where
    M: Mailer + 'static,
  {
    // 1. Event bus + its single consumer.
    let bus = Arc::new(EventBus::from_settings(&settings.events));
    let subscription = bus.subscribe().context("event bus already has a subscriber")?;
    let listener = NotificationListener::new(mailer).spawn(subscription);
    let publisher = BackgroundPublisher::from_settings(Arc::clone(&bus), &settings.events);

    // 2. ACL shared by every mutating service.
    let permissions = Arc::new(PermissionService::new(db.permissions()));

    // 3. Services.
    let catalog_store = Arc::new(db.catalog());
    let mut search = SearchService::new(catalog_store.clone(), catalog_store.clone(), catalog_store);
    if let Some(timeout) = settings.search.timeout() {
      search = search.with_timeout(timeout);
    }

    let accounts = AccountService::new(db.users(), hasher, publisher);
    let catalog = CatalogService::new(db.catalog(), Arc::clone(&permissions));
    let profiles = ProfileService::new(db.profiles());

    info!(
      queue_capacity = settings.events.queue_capacity,
      max_in_flight = settings.events.max_in_flight,
      search_timeout_ms = settings.search.timeout_ms,
      "musiclib services wired"
    );

    Ok(Self { accounts, catalog, profiles, search, permissions, bus, listener })
  }

  /// Events waiting for the listener.
  pub fn pending_events(&self) -> usize {
    self.bus.pending()
  }

  /// Drops every producer, lets the listener drain what is queued and waits for it.
  pub async fn shutdown(self) -> Result<DeliveryStats, JoinError> {
    let Self { accounts, catalog, profiles, search, permissions, bus, listener } = self;
    drop((accounts, catalog, profiles, search, permissions, bus));
    listener.await
  }
}
