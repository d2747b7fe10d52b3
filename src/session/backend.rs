//! Collaborator traits wrapped by a capture session.
//!
//! The OpenCV implementations live in [`crate::vision`]; tests drive the
//! session through mock implementations.

use std::time::Instant;

use super::types::{BoundingBox, FrameSize};
use crate::error::RecorderError;

/// A camera or other stream of frames.
pub trait FrameSource {
    type Frame;

    /// Device index used in log and error messages.
    fn device_index(&self) -> i32;

    /// Whether the device was opened successfully.
    fn is_opened(&self) -> bool;

    /// Native frame dimensions reported by the device.
    fn frame_size(&self) -> Result<FrameSize, RecorderError>;

    /// Read the next frame. `None` marks the end of the stream.
    fn read_frame(&mut self) -> Result<Option<Self::Frame>, RecorderError>;

    fn release(&mut self) -> Result<(), RecorderError>;
}

/// Finds faces in a frame.
pub trait FaceDetector<F> {
    fn detect(&mut self, frame: &F) -> Result<Vec<BoundingBox>, RecorderError>;
}

/// Draws detection markers onto a frame.
pub trait Annotate {
    fn draw_face(&mut self, face: &BoundingBox) -> Result<(), RecorderError>;
}

/// Destination for recorded frames.
pub trait FrameSink<F> {
    fn write_frame(&mut self, frame: &F) -> Result<(), RecorderError>;

    fn release(&mut self) -> Result<(), RecorderError>;
}

/// Live on-screen view of the annotated stream.
pub trait Preview<F> {
    fn show(&mut self, frame: &F) -> Result<(), RecorderError>;

    /// Poll the keyboard once; true when quit was pressed.
    fn quit_requested(&mut self) -> Result<bool, RecorderError>;

    fn close(&mut self) -> Result<(), RecorderError>;
}

/// Placeholder preview for sessions that run without a window.
#[derive(Debug, Default)]
pub struct NoPreview;

impl<F> Preview<F> for NoPreview {
    fn show(&mut self, _frame: &F) -> Result<(), RecorderError> {
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool, RecorderError> {
        Ok(false)
    }

    fn close(&mut self) -> Result<(), RecorderError> {
        Ok(())
    }
}

/// Source of the per-frame timestamp.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Monotonic wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
