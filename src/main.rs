//! DFXP to WebVTT converter
//!
//! Reads a DFXP/TTML subtitle document, extracts the cues that fall in the
//! requested window and writes them out as a WebVTT segment.
//!
//! Usage: `dfxp-vod [config.toml] [input.dfxp]`

mod config;
mod config_file;
mod error;

use std::io::Write;
use std::path::Path;

use dfxp_vod_lib::{write_segment, DfxpFormat, MediaFormat, SubtitleMetadata, Track};
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat, LoggingConfig, OutputFormat};
use crate::config_file::ConfigFile;
use crate::error::{AppError, Result};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "dfxp-vod";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());
    let input_override = args.next();

    // Logging settings live in the config file, so load it first and report
    // problems once the subscriber is up.
    let (mut config, load_error) = load_config(&config_path);
    init_logging(&config.logging);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = load_error {
        tracing::warn!("{}. Using defaults.", e);
    }
    if let Some(path) = input_override {
        config.input_path = path;
    }
    tracing::info!("Configuration loaded: {:?}", config);

    dfxp_vod_lib::init();
    let result = run(&config);
    dfxp_vod_lib::cleanup();

    match &result {
        Err(AppError::Decoder(e)) => {
            tracing::error!(status = ?e.status(), "conversion failed: {}", e)
        }
        Err(e) => tracing::error!("conversion failed: {}", e),
        Ok(()) => {}
    }
    result
}

fn load_config(path: &str) -> (AppConfig, Option<String>) {
    if !Path::new(path).exists() {
        return (
            AppConfig::default(),
            Some(format!("Config file {} not found", path)),
        );
    }
    match ConfigFile::from_file(path) {
        Ok(cf) => (cf.into_app_config(), None),
        Err(e) => (
            AppConfig::default(),
            Some(format!("Failed to load config file {}: {}", path, e)),
        ),
    }
}

/// Initialize logging with tracing
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so the
/// segment can be piped from stdout.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn run(config: &AppConfig) -> Result<()> {
    if config.input_path.is_empty() {
        return Err(AppError::Config("no input file given".to_string()));
    }

    let source = std::fs::read(&config.input_path)?;
    let output = convert(config, &source)?;

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, &output)?;
            tracing::info!(bytes = output.len(), "wrote {}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    metadata: &'a SubtitleMetadata,
    track: &'a Track,
}

/// Convert one DFXP source into the configured output format
fn convert(config: &AppConfig, source: &[u8]) -> Result<Vec<u8>> {
    let format = DfxpFormat;
    if format.reader_init(source).is_err() {
        return Err(AppError::NotDfxp(config.input_path.clone()));
    }

    let parsed = format.parse(source)?;
    tracing::info!(
        format = format.name(),
        duration_ms = parsed.metadata.duration_ms,
        "parsed {}",
        config.input_path
    );

    let params = config.request.to_parse_params();
    let track = format.parse_frames(&parsed, &params)?;
    tracing::info!(
        frames = track.frame_count(),
        skipped = track.first_frame_index,
        duration_ms = track.total_frames_duration,
        "extracted frames"
    );

    let output = match config.output.format {
        OutputFormat::Webvtt => write_segment(&track).to_vec(),
        OutputFormat::Json => serde_json::to_vec_pretty(&Report {
            metadata: &parsed.metadata,
            track: &track,
        })?,
    };
    Ok(output)
}
