//! Tries to create an `AppConfig` from config files and the environment.
//! Layers `config/base.toml`, the environment specific file and `APP_` prefixed env variables
//! with `figment`.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, Environment, NetConfig, SslRequire};

/// The env variable holding the database connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// The env variable selecting the environment specific config file.
pub const ENVIRONMENT_ENV: &str = "APP_ENVIRONMENT";

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<20} - Initializing the configuration",
            "get_or_init_config"
        );
        load_config().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

/// Builds the `AppConfig` from the `config` directory in the current working directory.
pub fn load_config() -> ConfigResult<AppConfig> {
    let base_path = std::env::current_dir()?;
    let environment: Environment = std::env::var(ENVIRONMENT_ENV)
        .unwrap_or_else(|_| "local".into())
        .try_into()?;
    let database_url = std::env::var(DATABASE_URL_ENV).ok();

    load_config_from(
        &base_path.join("config"),
        &environment,
        database_url.as_deref(),
    )
}

/// Builds the `AppConfig` from the files in `config_dir`.
///
/// `database_url` replaces the `db_config` read from the files. It is required in production.
pub fn load_config_from(
    config_dir: &Path,
    environment: &Environment,
    database_url: Option<&str>,
) -> ConfigResult<AppConfig> {
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    let mut config: AppConfig = Figment::new()
        .merge(Toml::file(config_dir.join("base.toml")))
        .merge(Toml::file(config_dir.join(environment_filename)))
        .merge(Env::prefixed("APP_").split("__").ignore(&["environment"]))
        .extract()
        .map_err(Box::new)?;

    match (database_url, environment) {
        (Some(url), _) => {
            // Keep the pool tuning from the files, only the connection target comes from the URL.
            let url_config = DbConfig::try_from(url)?;
            config.db_config = config.db_config.with_target_of(url_config);
        }
        (None, Environment::Production) => return Err(ConfigError::MissingDatabaseUrl),
        (None, Environment::Local) => {}
    }

    Ok(config)
}
