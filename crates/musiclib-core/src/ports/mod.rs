pub mod catalog;
pub mod hasher;
pub mod mailer;
pub mod permissions;
pub mod profiles;
pub mod search;
pub mod users;

pub use catalog::{CatalogRepository, RepoError};
pub use hasher::PasswordHasher;
pub use mailer::{Mailer, MailerError};
pub use permissions::PermissionStore;
pub use profiles::ProfileRepository;
pub use search::{Page, Searchable};
pub use users::UserRepository;
