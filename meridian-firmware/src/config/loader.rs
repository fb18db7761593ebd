//! Configuration persistence
//!
//! Loads the clock configuration from flash storage, falling back to the
//! embedded `clock.toml` when flash is empty or unreadable.

use defmt::*;

use meridian_core::config::{parse_config, ClockConfig, CONFIG_VERSION};
use meridian_hal_rp2040::{FlashError, FlashStorage, Rp2040FlashStorage, StorageKey};

/// Maximum serialized config size (binary)
const MAX_CONFIG_SIZE: usize = 512;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// Embedded TOML parsing failed
    Parse,
    /// Config version mismatch
    VersionMismatch,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Configuration persistence manager
pub struct ConfigPersistence<'d> {
    storage: Rp2040FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    pub fn new(storage: Rp2040FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Load the configuration, preferring flash over `embedded`
    ///
    /// Never fails: a broken embedded config degrades to the built-in
    /// defaults.
    pub async fn load_or_default(&mut self, embedded: &str) -> ClockConfig {
        match self.load().await {
            Ok(config) => {
                info!("Loaded configuration from flash");
                return config;
            }
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                info!("No configuration in flash, using embedded defaults");
            }
            Err(e) => {
                warn!("Stored configuration unusable ({:?}), using embedded defaults", e);
            }
        }

        match parse_config(embedded) {
            Ok(config) => {
                log_config_summary(&config);
                config
            }
            Err(e) => {
                // Only reachable if build.rs validation was bypassed
                error!("Failed to parse embedded config: {:?}", e);
                ClockConfig::default()
            }
        }
    }

    /// Load configuration from the binary postcard record
    pub async fn load(&mut self) -> Result<ClockConfig, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self
            .storage
            .read(StorageKey::ClockConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of config from flash", len);

        let config: ClockConfig =
            postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: found {}, expected {}",
                config.version, CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch);
        }

        log_config_summary(&config);
        Ok(config)
    }

    /// Persist `config` as the binary postcard record
    pub async fn save(&mut self, config: &ClockConfig) -> Result<(), ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let bytes = postcard::to_slice(config, &mut buffer).map_err(|_| ConfigError::Serialize)?;
        self.storage.write(StorageKey::ClockConfig, bytes).await?;
        debug!("Saved {} bytes of config to flash", bytes.len());
        Ok(())
    }

    /// Erase every stored setting
    pub async fn erase(&mut self) -> Result<(), ConfigError> {
        self.storage.erase_all().await?;
        Ok(())
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &ClockConfig) {
    info!("Configuration loaded successfully");
    debug!("  timezone: {}", config.timezone());
    debug!("  ntp server: {}", config.ntp_server());
    debug!("  face: {}", config.face.as_str());
    if config.is_wifi_configured() {
        debug!("  wifi: {}", config.wifi_ssid.as_str());
    } else {
        debug!("  wifi: not configured");
    }
}
