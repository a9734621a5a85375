// src/config.rs
//! Configuration management with file-based storage

use crate::error::{ClockError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    pub serial_port: String,
    pub baudrate: u32,
    /// Whole-hour UTC offset applied to the displayed time and date
    pub utc_offset: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyUSB0".to_string(),
            baudrate: 9600,
            utc_offset: 0,
        }
    }
}

impl ClockConfig {
    /// Load configuration from the config file, falling back to defaults
    /// when none exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| ClockError::Other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClockError::Other(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(&config_path, contents)
            .map_err(|e| ClockError::Other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn config_path() -> Result<std::path::PathBuf> {
        use std::path::PathBuf;

        let home = std::env::var("HOME")
            .map_err(|_| ClockError::Other("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("gps-clock").join("config.json"))
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.serial_port = port;
        self.baudrate = baudrate;
    }

    /// Update the displayed UTC offset
    pub fn update_utc_offset(&mut self, utc_offset: i32) {
        self.utc_offset = utc_offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClockConfig::default();
        assert_eq!(config.serial_port, "/dev/ttyUSB0");
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.utc_offset, 0);
    }

    #[test]
    fn test_update_serial() {
        let mut config = ClockConfig::default();
        config.update_serial("/dev/ttyACM0".to_string(), 115200);
        assert_eq!(config.serial_port, "/dev/ttyACM0");
        assert_eq!(config.baudrate, 115200);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = ClockConfig::default();
        config.update_utc_offset(-5);

        let json = serde_json::to_string(&config).unwrap();
        let restored: ClockConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.serial_port, config.serial_port);
        assert_eq!(restored.baudrate, config.baudrate);
        assert_eq!(restored.utc_offset, -5);
    }
}
