use crate::error::AppError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the environment variable selecting the optional overlay file.
pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Locate `<service>/config`, whether the process runs from the workspace
/// root or from inside the service directory.
pub fn configuration_directory(base_path: &Path, service: &str) -> PathBuf {
    if base_path.ends_with(service) {
        base_path.join("config")
    } else {
        base_path.join(service).join("config")
    }
}

/// Load layered settings for a service.
///
/// Sources, later ones winning:
/// 1. `config/base.yaml` (required)
/// 2. `config/<APP_ENVIRONMENT>.yaml` (optional)
/// 3. `APP_`-prefixed environment variables, `__` separating nested keys
///    (`APP_SERVER__PORT=9000`).
pub fn load_layered<T: DeserializeOwned>(service: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().map_err(|e| {
        AppError::Config(anyhow::anyhow!(
            "Failed to determine the current directory: {}",
            e
        ))
    })?;
    let directory = configuration_directory(&base_path, service);

    let mut builder = Config::builder()
        .add_source(File::from(directory.join("base.yaml")).required(true));

    if let Ok(environment) = std::env::var(ENVIRONMENT_VAR) {
        builder = builder.add_source(
            File::from(directory.join(format!("{}.yaml", environment.to_lowercase())))
                .required(false),
        );
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
