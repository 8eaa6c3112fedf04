use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use super::{
    models::{
        Config, ConfigMetadata, CorsConfig, DEFAULT_DATABASE_URL, DEFAULT_HOST,
        DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DEFAULT_STATIC_ROOT,
        DatabaseConfig, HubConfig, ServerConfig, StaticFilesConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{ConfigGuardRailError, ConfigWarnings, check_guard_rails},
};
use crate::infra::websocket::DEFAULT_CHANNEL_CAPACITY;

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["songqueue.toml", "config/songqueue.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

/// Result of a successful load: the config plus anything worth logging.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        }
        .or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            _ => Err(err),
        })?;

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Merge environment, file and defaults, in that order of precedence.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No songqueue.toml detected; using environment variables and defaults",
            "Create songqueue.toml or set SONGQUEUE_CONFIG to customise the server",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        cors: file_cors,
        static_files: file_static,
        hub: file_hub,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let database = DatabaseConfig {
        url: env
            .database_url
            .or(file_database.url)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        max_connections: env
            .database_max_connections
            .or(file_database.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]),
    };

    let static_root = match env.static_root.or(file_static.root) {
        Some(root) if root.is_dir() => Some(root),
        Some(root) => {
            warnings.push_with_hint(
                format!(
                    "Static root {} does not exist; web UI will not be served",
                    root.display()
                ),
                "Point STATIC_ROOT at the directory containing index.html",
            );
            None
        }
        None => Some(PathBuf::from(DEFAULT_STATIC_ROOT)).filter(|p| p.is_dir()),
    };

    let hub = HubConfig {
        channel_capacity: env
            .hub_channel_capacity
            .or(file_hub.channel_capacity)
            .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
    };

    let config = Config {
        server,
        database,
        cors,
        static_files: StaticFilesConfig { root: static_root },
        hub,
        dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    let guard_rail_warnings = check_guard_rails(&config)?;
    warnings.items.extend(guard_rail_warnings.items);

    Ok((config, warnings))
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
