//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::HubConfig;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<HubConfig> {
    store.load()
}

/// Validate and apply one setting, then persist the result.
///
/// # Errors
///
/// Returns an error for unknown keys, invalid values, or storage failures.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<HubConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
