//! Camera device handle.

use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;

use crate::error::RecorderError;
use crate::session::{FrameSize, FrameSource};

/// OpenCV `VideoCapture` on a device index.
pub struct Camera {
    capture: videoio::VideoCapture,
    index: i32,
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("index", &self.index)
            .field("is_opened", &self.is_opened())
            .finish_non_exhaustive()
    }
}

impl Camera {
    /// Open the camera at `index` with whatever backend OpenCV picks.
    ///
    /// A device that exists but fails to open is reported later by
    /// [`FrameSource::is_opened`], not here.
    ///
    /// # Errors
    /// * `RecorderError::CameraUnavailable` - If OpenCV rejects the device outright
    pub fn open(index: i32) -> Result<Self, RecorderError> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY).map_err(|e| {
            log::debug!("VideoCapture::new({}) failed: {}", index, e);
            RecorderError::CameraUnavailable { index }
        })?;
        Ok(Self { capture, index })
    }
}

impl FrameSource for Camera {
    type Frame = Mat;

    fn device_index(&self) -> i32 {
        self.index
    }

    fn is_opened(&self) -> bool {
        self.capture.is_opened().unwrap_or(false)
    }

    fn frame_size(&self) -> Result<FrameSize, RecorderError> {
        let width = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        Ok(FrameSize {
            width: width as i32,
            height: height as i32,
        })
    }

    fn read_frame(&mut self) -> Result<Option<Mat>, RecorderError> {
        let mut frame = Mat::default();
        let grabbed = self.capture.read(&mut frame)?;
        if !grabbed || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn release(&mut self) -> Result<(), RecorderError> {
        self.capture.release()?;
        Ok(())
    }
}
