//! Configuration file support
//!
//! Loads the converter configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{
    AppConfig, LogFormat, LoggingConfig, OutputConfig, OutputFormat, RequestConfig,
};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Input settings
    pub input: InputSettings,
    /// Output settings
    pub output: Option<OutputSettings>,
    /// Requested window
    pub request: Option<RequestSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    /// DFXP document to convert
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output file (stdout when absent)
    pub path: Option<String>,
    /// Output format (webvtt, json)
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSettings {
    pub start_ms: Option<u64>,
    pub end_ms: Option<u64>,
    pub clip_from_ms: Option<u64>,
    pub clip_to_ms: Option<u64>,
    /// Timestamps relative to the window start
    pub relative_timestamps: Option<bool>,
    /// Extract frames at all
    pub frames: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    #[allow(dead_code)]
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    #[allow(dead_code)]
    pub fn default_config() -> Self {
        Self {
            input: InputSettings {
                path: "subtitles.dfxp".to_string(),
            },
            output: Some(OutputSettings {
                path: None,
                format: Some(OutputFormat::Webvtt),
            }),
            request: Some(RequestSettings {
                start_ms: Some(0),
                end_ms: None,
                clip_from_ms: Some(0),
                clip_to_ms: None,
                relative_timestamps: Some(false),
                frames: Some(true),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some(LogFormat::Pretty),
            }),
        }
    }

    /// Convert to AppConfig
    pub fn into_app_config(self) -> AppConfig {
        let output = self.output.map_or_else(OutputConfig::default, |o| OutputConfig {
            path: o.path,
            format: o.format.unwrap_or_default(),
        });

        let request = self.request.unwrap_or_default();
        let defaults = RequestConfig::default();
        let request = RequestConfig {
            start_ms: request.start_ms.unwrap_or(defaults.start_ms),
            end_ms: request.end_ms,
            clip_from_ms: request.clip_from_ms.unwrap_or(defaults.clip_from_ms),
            clip_to_ms: request.clip_to_ms,
            relative_timestamps: request
                .relative_timestamps
                .unwrap_or(defaults.relative_timestamps),
            frames: request.frames.unwrap_or(defaults.frames),
        };

        let logging = self
            .logging
            .map_or_else(LoggingConfig::default, |l| LoggingConfig {
                level: l.level,
                format: l.format.unwrap_or_default(),
            });

        AppConfig {
            input_path: self.input.path,
            output,
            request,
            logging,
        }
    }
}
