//! Session types and data structures.

use std::fmt;

/// Rectangle marking a detected face, in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Frame dimensions reported by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: i32,
    pub height: i32,
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fixed detector parameters passed to the classifier on every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// How much the image is shrunk at each scale step
    pub scale_factor: f64,
    /// Neighbouring detections needed to confirm a face
    pub min_neighbors: i32,
    /// Smallest face considered, in pixels (square)
    pub min_size: i32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: 30,
        }
    }
}

/// Why the session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The camera stopped delivering frames
    EndOfStream,
    /// 'q' was pressed in the preview window
    QuitKey,
    /// Ctrl+C was received
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::QuitKey => write!(f, "quit key"),
            StopReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Per-session counters, returned when the loop exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_read: u64,
    pub frames_written: u64,
    pub frames_with_faces: u64,
    /// Number of times recording switched on
    pub segments: u64,
    pub stop_reason: StopReason,
}

impl SessionSummary {
    pub(crate) fn new() -> Self {
        Self {
            frames_read: 0,
            frames_written: 0,
            frames_with_faces: 0,
            segments: 0,
            stop_reason: StopReason::EndOfStream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_display() {
        let size = FrameSize {
            width: 640,
            height: 480,
        };
        assert_eq!(format!("{}", size), "640x480");
    }

    #[test]
    fn test_detection_params_default() {
        let params = DetectionParams::default();
        assert_eq!(params.scale_factor, 1.1);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!(params.min_size, 30);
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(format!("{}", StopReason::EndOfStream), "end of stream");
        assert_eq!(format!("{}", StopReason::QuitKey), "quit key");
        assert_eq!(format!("{}", StopReason::Interrupted), "interrupted");
    }
}
