//! Error types for capture sessions.

use std::path::PathBuf;

/// Errors that can occur while opening or running a capture session.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// The camera device could not be opened
    #[error("Cannot open camera {index}")]
    CameraUnavailable { index: i32 },

    /// The cascade classifier file is missing or holds no classifier
    #[error("Failed to load face classifier from '{}'", path.display())]
    ClassifierLoad { path: PathBuf },

    /// The video writer refused the output path or codec
    #[error("Failed to open video output '{}' (codec {codec})", path.display())]
    WriterOpen { path: PathBuf, codec: String },

    /// Error reported by OpenCV
    #[cfg(feature = "opencv")]
    #[error("OpenCV error: {0}")]
    Vision(#[from] opencv::Error),

    /// Error reported by any other collaborator implementation
    #[error("{0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_unavailable_display() {
        let err = RecorderError::CameraUnavailable { index: 0 };
        assert_eq!(format!("{}", err), "Cannot open camera 0");
    }

    #[test]
    fn test_classifier_load_display() {
        let err = RecorderError::ClassifierLoad {
            path: PathBuf::from("face_cascade.xml"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("face classifier"));
        assert!(msg.contains("face_cascade.xml"));
    }

    #[test]
    fn test_writer_open_display() {
        let err = RecorderError::WriterOpen {
            path: PathBuf::from("/nonexistent/out.avi"),
            codec: "MJPG".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/nonexistent/out.avi"));
        assert!(msg.contains("MJPG"));
    }
}
