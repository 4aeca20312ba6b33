//! Replay configuration
use crate::error::{CliError, Result};
use encore_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoreConfig {
    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_output")]
    pub output: OutputSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_forward_step")]
    pub forward_step: u32,

    #[serde(default = "default_backward_step")]
    pub backward_step: u32,

    #[serde(default = "default_ad_break_duration")]
    pub ad_break_duration: u32,

    /// Revenue a premium subscription pays out to the artists listened to
    #[serde(default = "default_premium_revenue")]
    pub premium_revenue: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl EncoreConfig {
    /// Load configuration from file and environment
    ///
    /// An explicitly given file must exist; the default `encore.toml` is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        // Override with environment variables, e.g. ENCORE_PLAYBACK__FORWARD_STEP
        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.forward_step == 0 || self.playback.backward_step == 0 {
            return Err(CliError::Config(
                "Seek steps must be at least one second".to_string(),
            ));
        }

        if self.playback.ad_break_duration == 0 {
            return Err(CliError::Config(
                "Ad break duration must be at least one second".to_string(),
            ));
        }

        if !self.playback.premium_revenue.is_finite() || self.playback.premium_revenue < 0.0 {
            return Err(CliError::Config(format!(
                "Premium revenue must be a non-negative amount, got {}",
                self.playback.premium_revenue
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(CliError::Config("Log filter cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Settings handed to every player
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            forward_step: self.playback.forward_step,
            backward_step: self.playback.backward_step,
            ad_break_duration: self.playback.ad_break_duration,
        }
    }
}

// Default values
fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        forward_step: default_forward_step(),
        backward_step: default_backward_step(),
        ad_break_duration: default_ad_break_duration(),
        premium_revenue: default_premium_revenue(),
    }
}

fn default_forward_step() -> u32 {
    PlayerConfig::default().forward_step
}

fn default_backward_step() -> u32 {
    PlayerConfig::default().backward_step
}

fn default_ad_break_duration() -> u32 {
    PlayerConfig::default().ad_break_duration
}

fn default_premium_revenue() -> f64 {
    1_000_000.0
}

fn default_output() -> OutputSettings {
    OutputSettings {
        pretty: default_pretty(),
    }
}

fn default_pretty() -> bool {
    true
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "encore=info".to_string()
}

impl Default for EncoreConfig {
    fn default() -> Self {
        Self {
            playback: default_playback(),
            output: default_output(),
            logging: default_logging(),
        }
    }
}
