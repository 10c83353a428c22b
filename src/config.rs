//! Runtime configuration

use dfxp_vod_lib::ParseParams;
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// What gets written for the extracted track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A complete WebVTT segment
    #[default]
    Webvtt,
    /// Metadata and frame table as JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output file; stdout when unset
    pub path: Option<String>,
    pub format: OutputFormat,
}

/// The requested window, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub start_ms: u64,
    /// Unbounded when unset
    pub end_ms: Option<u64>,
    pub clip_from_ms: u64,
    /// Unbounded when unset
    pub clip_to_ms: Option<u64>,
    pub relative_timestamps: bool,
    pub frames: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            start_ms: 0,
            end_ms: None,
            clip_from_ms: 0,
            clip_to_ms: None,
            relative_timestamps: false,
            frames: true,
        }
    }
}

impl RequestConfig {
    /// Build the per-request extraction parameters
    pub fn to_parse_params(&self) -> ParseParams {
        let end = self.end_ms.unwrap_or(u64::MAX);
        let params = if self.relative_timestamps {
            ParseParams::relative(self.start_ms, end)
        } else {
            ParseParams::absolute(self.start_ms, end)
        };
        let params = params.with_clip(self.clip_from_ms, self.clip_to_ms.unwrap_or(u64::MAX));
        if self.frames {
            params
        } else {
            params.without_frames()
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// DFXP document to convert
    pub input_path: String,
    pub output: OutputConfig,
    pub request: RequestConfig,
    pub logging: LoggingConfig,
}
