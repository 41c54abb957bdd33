//! Runtime configuration
//!
//! Everything has a compiled-in default. A TOML file can be supplied with
//! `--config`; it is only ever read.
//!
//! ```toml
//! log_level = "debug"
//! debug = false
//! timeout_ms = 2000
//! reattach_kernel_driver = true
//! ```

use crate::usb::SendOptions;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Tracing level used when RUST_LOG is unset
    pub log_level: String,
    /// Print each device checked and the command byte to stdout
    pub debug: bool,
    /// Control transfer timeout in milliseconds
    pub timeout_ms: u64,
    /// Hand interfaces back to the kernel driver once done
    pub reattach_kernel_driver: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            debug: true,
            timeout_ms: protocol::DEFAULT_TIMEOUT.as_millis() as u64,
            reattach_kernel_driver: true,
        }
    }
}

impl RobotConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: RobotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow!("timeout_ms must be greater than zero"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn send_options(&self) -> SendOptions {
        SendOptions {
            timeout: self.timeout(),
            reattach_kernel_driver: self.reattach_kernel_driver,
        }
    }
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
