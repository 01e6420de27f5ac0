//! SQLite storage implementation for settings.

mod model;
mod repository;

pub use model::AppSettingDB;
pub use repository::SettingsRepository;

// The trait lives in core next to the service that consumes it.
pub use wealthdesk_core::settings::SettingsRepositoryTrait;
