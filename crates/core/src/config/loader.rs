use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment overrides, e.g. `FETCHFLICKS_SMTP_PASSWORD`.
const ENV_PREFIX: &str = "FETCHFLICKS_";

/// Environment provider for `prefix`.
///
/// The first underscore after the prefix separates the section from the key,
/// so `FETCHFLICKS_DOWNLOAD_SCRATCH_DIR` sets `download.scratch_dir`.
/// `FETCHFLICKS_CONFIG` names the file itself and is not a setting.
fn env_overrides(prefix: &str) -> Env {
    Env::prefixed(prefix)
        .ignore(&["config"])
        .map(|key| key.as_str().replacen('_', ".", 1).into())
}

fn load_with(path: &Path, env: Env) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(env)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_with(path, env_overrides(ENV_PREFIX))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
