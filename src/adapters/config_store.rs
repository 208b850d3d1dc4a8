//! JSON configuration store.
//!
//! Implements [`ConfigPort`] over an optional JSON blob.  On the device the
//! blob is baked in at build time from the `GEOGUARD_CONFIG` environment
//! variable; tests and simulation pass one in directly.  Missing fields
//! keep their defaults (`#[serde(default)]` on [`GeoConfig`]).
//!
//! ```text
//! GEOGUARD_CONFIG='{"chat_id":"1032611418","cooldown_ms":120000}' cargo build ...
//! ```

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::GeoConfig;

/// Read-only config source backed by a JSON document.
pub struct JsonConfigStore {
    blob: Option<String>,
}

impl JsonConfigStore {
    /// Use the blob captured from `GEOGUARD_CONFIG` at build time, if any.
    pub fn from_build_env() -> Self {
        Self {
            blob: option_env!("GEOGUARD_CONFIG").map(str::to_owned),
        }
    }

    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            blob: Some(json.into()),
        }
    }

    /// No stored config: `load` returns the defaults.
    pub fn empty() -> Self {
        Self { blob: None }
    }
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> Result<GeoConfig, ConfigError> {
        let Some(json) = self.blob.as_deref() else {
            return Ok(GeoConfig::default());
        };
        let config: GeoConfig = serde_json::from_str(json).map_err(|e| {
            warn!("Config JSON rejected: {}", e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Load from `port`, falling back to defaults (with a warning) on error.
pub fn load_or_default(port: &impl ConfigPort) -> GeoConfig {
    match port.load() {
        Ok(cfg) => {
            info!("Config loaded");
            cfg
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            GeoConfig::default()
        }
    }
}
