pub mod account_service;
pub mod catalog_service;
pub mod permission_service;
pub mod profile_service;
pub mod search_service;

pub use account_service::AccountService;
pub use catalog_service::CatalogService;
pub use permission_service::PermissionService;
pub use profile_service::ProfileService;
pub use search_service::SearchService;
