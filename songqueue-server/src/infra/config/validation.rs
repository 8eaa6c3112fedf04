use axum::http::HeaderValue;
use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("invalid CORS origin '{origin}'")]
    InvalidCorsOrigin { origin: String },
    #[error("{field} must be greater than zero")]
    ZeroCapacity { field: &'static str },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Reject values the server cannot start with and collect soft warnings.
pub fn check_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.database.max_connections == 0 {
        return Err(ConfigGuardRailError::ZeroCapacity {
            field: "database.max_connections",
        });
    }
    if config.hub.channel_capacity == 0 {
        return Err(ConfigGuardRailError::ZeroCapacity {
            field: "hub.channel_capacity",
        });
    }

    for origin in &config.cors.allowed_origins {
        if origin == "*" {
            continue;
        }
        if HeaderValue::from_str(origin).is_err() || !origin.contains("://") {
            return Err(ConfigGuardRailError::InvalidCorsOrigin {
                origin: origin.clone(),
            });
        }
    }

    if config.cors.allows_any_origin() && !config.dev_mode {
        warnings.push_with_hint(
            "CORS allows any origin",
            "Set CORS_ALLOWED_ORIGINS to the hosts that serve the web UI",
        );
    }

    Ok(warnings)
}
