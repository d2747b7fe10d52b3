//! OpenCV-backed collaborators for a capture session.
//!
//! - Camera access via [`Camera`]
//! - Haar cascade face detection via [`CascadeDetector`]
//! - Video file output via [`VideoFileWriter`]
//! - On-screen preview via [`PreviewWindow`]

mod camera;
mod detector;
mod preview;
mod writer;

pub use camera::Camera;
pub use detector::CascadeDetector;
pub use preview::{is_quit_key, PreviewWindow, QUIT_KEY, WINDOW_NAME};
pub use writer::{fourcc_chars, VideoFileWriter};
