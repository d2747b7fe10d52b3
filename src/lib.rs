//! face-recorder library crate.
//!
//! Records camera video only while a face is in view, plus a short trailing
//! buffer. The session loop and recording state live in [`session`]; the
//! OpenCV camera, classifier, writer and preview live in [`vision`].

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod signal;
#[cfg(feature = "opencv")]
pub mod vision;

pub use error::RecorderError;
