//! Configuration persistence
//!
//! Loads the display configuration from asset storage.
//! Falls back to built-in defaults if it is missing or invalid.

use inkchat_core::config::{DisplayConfig, CONFIG_VERSION};
use inkchat_hal::{AssetStorage, StorageError};

/// Storage path of the binary config
pub const CONFIG_PATH: &str = "config/display.bin";

/// Maximum serialized config size
pub const MAX_CONFIG_SIZE: usize = 256;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Storage operation failed
    Storage(StorageError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed (buffer too small)
    Serialize,
    /// Config version mismatch
    VersionMismatch,
    /// Layout geometry does not fit the panel
    InvalidLayout,
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        ConfigError::Storage(e)
    }
}

/// Load configuration from storage
pub async fn load_config<S: AssetStorage>(storage: &mut S) -> Result<DisplayConfig, ConfigError> {
    let mut buffer = [0u8; MAX_CONFIG_SIZE];
    let len = storage.load_binary(CONFIG_PATH, &mut buffer).await?;

    debug!("Read {} bytes of binary config", len);

    let data = buffer.get(..len).ok_or(ConfigError::Storage(StorageError::ReadError))?;
    let config: DisplayConfig =
        postcard::from_bytes(data).map_err(|_| ConfigError::Deserialize)?;

    if config.version != CONFIG_VERSION {
        warn!(
            "Config version mismatch: found {}, expected {}",
            config.version,
            CONFIG_VERSION
        );
        return Err(ConfigError::VersionMismatch);
    }

    if !config.layout.is_valid() {
        warn!(
            "Config layout rejected: region {}x{}, margins {}/{}",
            config.layout.region_width,
            config.layout.region_height,
            config.layout.margin_x,
            config.layout.margin_y
        );
        return Err(ConfigError::InvalidLayout);
    }

    log_config_summary(&config);
    Ok(config)
}

/// Load configuration, falling back to defaults on any error
pub async fn load_config_or_default<S: AssetStorage>(storage: &mut S) -> DisplayConfig {
    match load_config(storage).await {
        Ok(config) => config,
        Err(ConfigError::Storage(StorageError::NotFound)) => {
            info!("No display config found, using defaults");
            DisplayConfig::default()
        }
        Err(e) => {
            warn!("Failed to load display config: {:?}, using defaults", e);
            DisplayConfig::default()
        }
    }
}

/// Serialize `config` into `buffer`, returning the used prefix
pub fn encode_config<'b>(config: &DisplayConfig, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
    postcard::to_slice(config, buffer).map_err(|_| ConfigError::Serialize)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &DisplayConfig) {
    info!("Display configuration loaded");
    debug!("  font {}pt", config.font_pt.points());
    debug!("  refresh interval {} ms", config.refresh_interval_ms);
    debug!(
        "  region {}x{}, {} history lines",
        config.layout.region_width,
        config.layout.region_height,
        config.layout.max_history_lines
    );
}
