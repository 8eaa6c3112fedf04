pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, HubConfig, ServerConfig,
    StaticFilesConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};
