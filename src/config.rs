//! Configuration file handling for face-recorder.
//!
//! Loads configuration from `~/.config/face-recorder/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::DetectionParams;

/// Default cascade file, relative to the working directory.
pub const DEFAULT_CASCADE: &str = "face_cascade.xml";
/// Default output video file.
pub const DEFAULT_OUTPUT: &str = "out.avi";
/// Default four-character codec tag.
pub const DEFAULT_CODEC: &str = "MJPG";
/// Default output frame rate.
pub const DEFAULT_FPS: f64 = 20.0;
/// Longest accepted trailing timeout, in seconds.
pub const MAX_TIMEOUT_SECS: f64 = 3600.0;

/// Configuration file structure for face-recorder.
/// Loaded from ~/.config/face-recorder/config.toml (or custom path via --config).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DetectorConfig {
    #[serde(default = "default_cascade")]
    pub cascade: PathBuf,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default = "default_min_neighbors")]
    pub min_neighbors: i32,
    #[serde(default = "default_min_size")]
    pub min_size: i32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cascade: default_cascade(),
            scale_factor: default_scale_factor(),
            min_neighbors: default_min_neighbors(),
            min_size: default_min_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RecordingConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Seconds to keep recording after the last face
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            codec: default_codec(),
            fps: default_fps(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_cascade() -> PathBuf {
    PathBuf::from(DEFAULT_CASCADE)
}

fn default_scale_factor() -> f64 {
    DetectionParams::default().scale_factor
}

fn default_min_neighbors() -> i32 {
    DetectionParams::default().min_neighbors
}

fn default_min_size() -> i32 {
    DetectionParams::default().min_size
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_codec() -> String {
    DEFAULT_CODEC.to_string()
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

fn default_timeout_secs() -> f64 {
    3.0
}

/// The constructor-level options of a session: where to write and whether to show a window.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub output_path: PathBuf,
    pub display_camera: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_path: default_output(),
            display_camera: true,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the capture backends cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let codec = &self.recording.codec;
        if !codec.is_ascii() || codec.chars().count() != 4 {
            return Err(ConfigError::Invalid(format!(
                "recording.codec must be four ASCII characters, got '{}'",
                codec
            )));
        }
        if !self.recording.fps.is_finite() || self.recording.fps <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "recording.fps must be positive, got {}",
                self.recording.fps
            )));
        }
        if !(0.0..=MAX_TIMEOUT_SECS).contains(&self.recording.timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "recording.timeout_secs must be between 0 and {} seconds, got {}",
                MAX_TIMEOUT_SECS, self.recording.timeout_secs
            )));
        }
        if self.detector.scale_factor.is_nan() || self.detector.scale_factor <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "detector.scale_factor must be greater than 1.0, got {}",
                self.detector.scale_factor
            )));
        }
        if self.detector.min_neighbors < 0 {
            return Err(ConfigError::Invalid(format!(
                "detector.min_neighbors must not be negative, got {}",
                self.detector.min_neighbors
            )));
        }
        if self.detector.min_size < 0 {
            return Err(ConfigError::Invalid(format!(
                "detector.min_size must not be negative, got {}",
                self.detector.min_size
            )));
        }
        Ok(())
    }

    pub fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            scale_factor: self.detector.scale_factor,
            min_neighbors: self.detector.min_neighbors,
            min_size: self.detector.min_size,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.recording.timeout_secs)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            output_path: self.recording.output.clone(),
            display_camera: self.preview.enabled,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("face-recorder").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/face-recorder/config.toml")
        })
}

/// Commented config file written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# face-recorder configuration

[camera]
# Camera device index
device = 0

[detector]
# Haar cascade XML file
cascade = "face_cascade.xml"
# Image shrink per detection scale step
scale_factor = 1.1
# Neighbouring detections needed to confirm a face
min_neighbors = 5
# Smallest face in pixels (square)
min_size = 30

[recording]
# Output video file
output = "out.avi"
# Four-character codec tag
codec = "MJPG"
# Output frame rate
fps = 20.0
# Seconds to keep recording after the last face
timeout_secs = 3.0

[preview]
# Show a live preview window (press q to quit)
enabled = true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.camera.device, 0);
        assert_eq!(config.detector.cascade, PathBuf::from("face_cascade.xml"));
        assert_eq!(config.detector.scale_factor, 1.1);
        assert_eq!(config.detector.min_neighbors, 5);
        assert_eq!(config.detector.min_size, 30);
        assert_eq!(config.recording.output, PathBuf::from("out.avi"));
        assert_eq!(config.recording.codec, "MJPG");
        assert_eq!(config.recording.fps, 20.0);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.preview.enabled);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_config_toml_matches_defaults() {
        let config = Config::from_toml(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
[recording]
output = "faces.avi"
timeout_secs = 5.0
"#,
        )
        .unwrap();
        assert_eq!(config.recording.output, PathBuf::from("faces.avi"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.recording.codec, "MJPG");
        assert_eq!(config.recording.fps, 20.0);
    }

    #[test]
    fn test_session_config_from_file() {
        let config = Config::from_toml(
            r#"
[recording]
output = "/tmp/rec.avi"

[preview]
enabled = false
"#,
        )
        .unwrap();
        let session = config.session();
        assert_eq!(session.output_path, PathBuf::from("/tmp/rec.avi"));
        assert!(!session.display_camera);
    }

    #[test]
    fn test_session_config_default() {
        let session = SessionConfig::default();
        assert_eq!(session.output_path, PathBuf::from("out.avi"));
        assert!(session.display_camera);
        assert_eq!(Config::default().session(), session);
    }

    #[test]
    fn test_detection_params_from_config() {
        let config = Config::from_toml(
            r#"
[detector]
min_neighbors = 3
min_size = 48
"#,
        )
        .unwrap();
        let params = config.detection_params();
        assert_eq!(params.scale_factor, 1.1);
        assert_eq!(params.min_neighbors, 3);
        assert_eq!(params.min_size, 48);
    }

    #[test]
    fn test_rejects_bad_codec() {
        let err = Config::from_toml("[recording]\ncodec = \"MJPEG\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("codec"));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let err = Config::from_toml("[recording]\nfps = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("fps"));
    }

    #[test]
    fn test_rejects_infinite_fps() {
        let err = Config::from_toml("[recording]\nfps = inf\n").unwrap_err();
        assert!(err.to_string().contains("fps"));
    }

    #[test]
    fn test_rejects_huge_timeout() {
        for value in ["1e30", "1.5e19", "3600.5", "inf", "nan"] {
            let toml = format!("[recording]\ntimeout_secs = {}\n", value);
            let err = Config::from_toml(&toml).unwrap_err();
            assert!(
                err.to_string().contains("timeout_secs"),
                "timeout_secs = {} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_accepts_max_timeout() {
        let config = Config::from_toml("[recording]\ntimeout_secs = 3600.0\n").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(3600));
    }

    #[test]
    fn test_rejects_negative_timeout() {
        let err = Config::from_toml("[recording]\ntimeout_secs = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_rejects_scale_factor_of_one() {
        let err = Config::from_toml("[detector]\nscale_factor = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("scale_factor"));
    }

    #[test]
    fn test_rejects_unparseable_toml() {
        let err = Config::from_toml("[recording\noutput = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("missing.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "camera = [").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        match &err {
            ConfigError::Parse { path: p, .. } => assert_eq!(p, &path),
            other => panic!("Expected Parse error, got {:?}", other),
        }
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[camera]\ndevice = 2\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.camera.device, 2);
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = default_path();
        assert!(path.ends_with("face-recorder/config.toml"));
    }
}
