//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, MAX_TIMEOUT_SECS};

/// Parse and validate the trailing timeout in seconds (0-3600)
fn parse_timeout(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;
    if !(0.0..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(format!(
            "Timeout must be between 0 and {} seconds, got {}",
            MAX_TIMEOUT_SECS, secs
        ));
    }
    Ok(secs)
}

/// Records camera video only while a face is in view
#[derive(Parser, Debug)]
#[command(name = "face-recorder")]
#[command(version, about = "Record camera video while a face is in view", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Record to out.avi with a preview window (press q to quit)
    face-recorder

    # Headless recording to a custom file (Ctrl+C to quit)
    face-recorder --no-preview --output hallway.avi

    # Write a default config file
    face-recorder config init")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output video file (default: out.avi, or from config file)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Disable the live preview window
    #[arg(long)]
    pub no_preview: bool,

    /// Haar cascade XML file (default: face_cascade.xml)
    #[arg(long)]
    pub cascade: Option<PathBuf>,

    /// Camera device index (default: 0)
    #[arg(long)]
    pub camera: Option<i32>,

    /// Seconds to keep recording after the last detected face (default: 3)
    #[arg(long, short, value_parser = parse_timeout)]
    pub timeout: Option<f64>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.recording.output = output.clone();
        }
        if self.no_preview {
            config.preview.enabled = false;
        }
        if let Some(cascade) = &self.cascade {
            config.detector.cascade = cascade.clone();
        }
        if let Some(camera) = self.camera {
            config.camera.device = camera;
        }
        if let Some(timeout) = self.timeout {
            config.recording.timeout_secs = timeout;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create default config file
    Init,
}
