//! Capture session: the read → detect → annotate → record loop.
//!
//! This module provides:
//! - The session owner and loop via [`CaptureSession`]
//! - The recording toggle via [`CaptureState`]
//! - Collaborator seams via [`FrameSource`], [`FaceDetector`], [`FrameSink`], [`Preview`]

mod backend;
mod state;
mod types;

pub use backend::{
    Annotate, Clock, FaceDetector, FrameSink, FrameSource, NoPreview, Preview, SystemClock,
};
pub use state::{CaptureState, Transition, DEFAULT_TIMEOUT};
pub use types::{BoundingBox, DetectionParams, FrameSize, SessionSummary, StopReason};

use std::time::Duration;

use crate::error::RecorderError;
use crate::signal::ShutdownSignal;

/// Runtime knobs for a session that don't belong to a collaborator.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long to keep recording after the last face
    pub timeout: Duration,
    /// Interrupt flag polled once per frame
    pub shutdown: ShutdownSignal,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            shutdown: ShutdownSignal::new(),
        }
    }
}

/// Owner of the camera, classifier, video sink and optional preview.
///
/// All handles are released together when the loop exits, or when the
/// session is dropped before [`run`](Self::run) is called.
pub struct CaptureSession<S, D, W, P, C>
where
    S: FrameSource,
    D: FaceDetector<S::Frame>,
    W: FrameSink<S::Frame>,
    P: Preview<S::Frame>,
    C: Clock,
{
    source: S,
    detector: D,
    sink: W,
    preview: Option<P>,
    clock: C,
    state: CaptureState,
    shutdown: ShutdownSignal,
    summary: SessionSummary,
    released: bool,
}

impl<S, D, W, P, C> std::fmt::Debug for CaptureSession<S, D, W, P, C>
where
    S: FrameSource,
    D: FaceDetector<S::Frame>,
    W: FrameSink<S::Frame>,
    P: Preview<S::Frame>,
    C: Clock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("state", &self.state)
            .field("preview", &self.preview.is_some())
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<S, D, W, P, C> CaptureSession<S, D, W, P, C>
where
    S: FrameSource,
    S::Frame: Annotate,
    D: FaceDetector<S::Frame>,
    W: FrameSink<S::Frame>,
    P: Preview<S::Frame>,
    C: Clock,
{
    /// Assemble a session around an opened camera.
    ///
    /// `open_sink` receives the camera's native frame size so the output
    /// matches it.
    ///
    /// # Errors
    /// * `RecorderError::CameraUnavailable` - If the source reports it is not opened.
    ///   No frame is read in that case.
    /// * Any error returned by `open_sink`
    ///
    /// On failure the preview is closed, and the camera is released if it was opened.
    pub fn open<O>(
        mut source: S,
        detector: D,
        open_sink: O,
        mut preview: Option<P>,
        clock: C,
        options: SessionOptions,
    ) -> Result<Self, RecorderError>
    where
        O: FnOnce(FrameSize) -> Result<W, RecorderError>,
    {
        if !source.is_opened() {
            close_preview::<S::Frame, P>(preview.as_mut());
            return Err(RecorderError::CameraUnavailable {
                index: source.device_index(),
            });
        }

        let opened = source.frame_size().and_then(|size| {
            log::info!("Camera {} opened at {}", source.device_index(), size);
            open_sink(size)
        });
        let sink = match opened {
            Ok(sink) => sink,
            Err(e) => {
                if let Err(release_err) = source.release() {
                    log::warn!("Failed to release camera: {}", release_err);
                }
                close_preview::<S::Frame, P>(preview.as_mut());
                return Err(e);
            }
        };

        Ok(Self {
            source,
            detector,
            sink,
            preview,
            clock,
            state: CaptureState::new(options.timeout),
            shutdown: options.shutdown,
            summary: SessionSummary::new(),
            released: false,
        })
    }

    /// Run the loop until end of stream, the quit key, or an interrupt.
    ///
    /// Resources are released before this returns, on both success and error.
    pub fn run(mut self) -> Result<SessionSummary, RecorderError> {
        let outcome = self.run_loop();
        self.release_all();

        let stop_reason = outcome?;
        self.summary.stop_reason = stop_reason;
        log::info!(
            "Session ended ({}): {} frames read, {} written, {} segment(s)",
            stop_reason,
            self.summary.frames_read,
            self.summary.frames_written,
            self.summary.segments
        );
        Ok(self.summary.clone())
    }

    fn run_loop(&mut self) -> Result<StopReason, RecorderError> {
        loop {
            let Some(mut frame) = self.source.read_frame()? else {
                log::info!("Can't receive frame (stream end?). Exiting ...");
                return Ok(StopReason::EndOfStream);
            };
            self.summary.frames_read += 1;

            let faces = self.detector.detect(&frame)?;
            log::debug!(
                "Frame {}: {} face(s)",
                self.summary.frames_read,
                faces.len()
            );
            if !faces.is_empty() {
                self.summary.frames_with_faces += 1;
            }

            let now = self.clock.now();
            match self.state.update(!faces.is_empty(), now) {
                Transition::Started => {
                    self.summary.segments += 1;
                    log::info!("Face detected, recording started");
                }
                Transition::Stopped => {
                    log::info!(
                        "No face for {:?}, recording stopped",
                        self.state.timeout()
                    );
                }
                Transition::Continued | Transition::Idle => {}
            }

            for face in &faces {
                frame.draw_face(face)?;
            }

            if self.state.capturing() {
                self.sink.write_frame(&frame)?;
                self.summary.frames_written += 1;
            }

            if let Some(preview) = self.preview.as_mut() {
                preview.show(&frame)?;
                if preview.quit_requested()? {
                    log::info!("Quit requested");
                    return Ok(StopReason::QuitKey);
                }
            }

            if self.shutdown.is_triggered() {
                return Ok(StopReason::Interrupted);
            }
        }
    }
}

impl<S, D, W, P, C> CaptureSession<S, D, W, P, C>
where
    S: FrameSource,
    D: FaceDetector<S::Frame>,
    W: FrameSink<S::Frame>,
    P: Preview<S::Frame>,
    C: Clock,
{
    /// Current recording state.
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Release sink, camera and preview, in that order. Runs at most once.
    fn release_all(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = self.sink.release() {
            log::warn!("Failed to release video output: {}", e);
        }
        if let Err(e) = self.source.release() {
            log::warn!("Failed to release camera: {}", e);
        }
        close_preview::<S::Frame, P>(self.preview.as_mut());
    }
}

fn close_preview<F, P: Preview<F>>(preview: Option<&mut P>) {
    if let Some(preview) = preview {
        if let Err(e) = preview.close() {
            log::warn!("Failed to close preview window: {}", e);
        }
    }
}

impl<S, D, W, P, C> Drop for CaptureSession<S, D, W, P, C>
where
    S: FrameSource,
    D: FaceDetector<S::Frame>,
    W: FrameSink<S::Frame>,
    P: Preview<S::Frame>,
    C: Clock,
{
    fn drop(&mut self) {
        self.release_all();
    }
}
