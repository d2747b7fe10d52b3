//! Video file output.

use std::path::{Path, PathBuf};

use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::videoio;

use crate::error::RecorderError;
use crate::session::{FrameSink, FrameSize};

/// Split a four-character codec tag (e.g. "MJPG") into its characters.
///
/// Returns `None` unless the tag is exactly four ASCII characters.
pub fn fourcc_chars(codec: &str) -> Option<[char; 4]> {
    if !codec.is_ascii() {
        return None;
    }
    let chars: Vec<char> = codec.chars().collect();
    <[char; 4]>::try_from(chars).ok()
}

/// OpenCV `VideoWriter` producing a colour video file.
pub struct VideoFileWriter {
    writer: videoio::VideoWriter,
    path: PathBuf,
}

impl std::fmt::Debug for VideoFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFileWriter")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl VideoFileWriter {
    /// Open `path` for writing frames of `size` at `fps`.
    ///
    /// # Errors
    /// * `RecorderError::WriterOpen` - If the codec tag is malformed or OpenCV
    ///   cannot open the output
    pub fn open(
        path: &Path,
        codec: &str,
        fps: f64,
        size: FrameSize,
    ) -> Result<Self, RecorderError> {
        let open_error = || RecorderError::WriterOpen {
            path: path.to_path_buf(),
            codec: codec.to_string(),
        };

        let [c1, c2, c3, c4] = fourcc_chars(codec).ok_or_else(open_error)?;
        let fourcc = videoio::VideoWriter::fourcc(c1, c2, c3, c4)?;
        let path_str = path.to_str().ok_or_else(open_error)?;

        let writer = videoio::VideoWriter::new(
            path_str,
            fourcc,
            fps,
            Size::new(size.width, size.height),
            true,
        )?;
        if !writer.is_opened()? {
            return Err(open_error());
        }

        log::info!(
            "Recording to {} ({} @ {} fps, {})",
            path.display(),
            codec,
            fps,
            size
        );
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }
}

impl FrameSink<Mat> for VideoFileWriter {
    fn write_frame(&mut self, frame: &Mat) -> Result<(), RecorderError> {
        self.writer.write(frame)?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), RecorderError> {
        self.writer.release()?;
        Ok(())
    }
}
