//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::SkiffConfig;
use crate::domain::config::apply_config_value;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<SkiffConfig> {
    store.load()
}

/// Validate and persist one `key = value` setting, returning the new config.
///
/// Nothing is written when validation fails.
///
/// # Errors
///
/// Returns an error for an unknown key, an invalid value, or a failed write.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<SkiffConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    tracing::info!(key, value, "config updated");
    Ok(config)
}
