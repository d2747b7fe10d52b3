//! Capture on/off state with a trailing timeout.

use std::time::{Duration, Instant};

/// Default trailing buffer after the last detected face.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Outcome of a single [`CaptureState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Recording switched on at this frame
    Started,
    /// Recording stays on
    Continued,
    /// Recording switched off at this frame
    Stopped,
    /// Recording stays off
    Idle,
}

/// Tracks whether frames should currently be recorded.
///
/// `capturing` is true while a face has been seen within the last `timeout`.
#[derive(Debug, Clone)]
pub struct CaptureState {
    capturing: bool,
    last_face_seen_at: Option<Instant>,
    timeout: Duration,
}

impl CaptureState {
    pub fn new(timeout: Duration) -> Self {
        Self {
            capturing: false,
            last_face_seen_at: None,
            timeout,
        }
    }

    pub fn capturing(&self) -> bool {
        self.capturing
    }

    pub fn last_face_seen_at(&self) -> Option<Instant> {
        self.last_face_seen_at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Feed the detection result for the frame observed at `now`.
    pub fn update(&mut self, faces_present: bool, now: Instant) -> Transition {
        if faces_present {
            let was_capturing = self.capturing;
            self.capturing = true;
            self.last_face_seen_at = Some(now);
            return if was_capturing {
                Transition::Continued
            } else {
                Transition::Started
            };
        }

        if !self.capturing {
            return Transition::Idle;
        }

        let expired = match self.last_face_seen_at {
            Some(seen) => now.saturating_duration_since(seen) > self.timeout,
            None => true,
        };
        if expired {
            self.capturing = false;
            Transition::Stopped
        } else {
            Transition::Continued
        }
    }
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_starts_idle() {
        let state = CaptureState::default();
        assert!(!state.capturing());
        assert!(state.last_face_seen_at().is_none());
        assert_eq!(state.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_no_faces_while_idle_stays_idle() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        assert_eq!(state.update(false, t0), Transition::Idle);
        assert_eq!(state.update(false, t0 + secs(10.0)), Transition::Idle);
        assert!(!state.capturing());
    }

    #[test]
    fn test_face_activates_and_records_timestamp() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        assert_eq!(state.update(true, t0), Transition::Started);
        assert!(state.capturing());
        assert_eq!(state.last_face_seen_at(), Some(t0));
    }

    #[test]
    fn test_repeated_faces_refresh_timestamp() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        state.update(true, t0);
        let t1 = t0 + secs(2.5);
        assert_eq!(state.update(true, t1), Transition::Continued);
        assert_eq!(state.last_face_seen_at(), Some(t1));
    }

    #[test]
    fn test_keeps_capturing_within_timeout() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        state.update(true, t0);
        assert_eq!(state.update(false, t0 + secs(1.0)), Transition::Continued);
        assert_eq!(state.update(false, t0 + secs(2.9)), Transition::Continued);
        assert!(state.capturing());
    }

    #[test]
    fn test_exactly_at_timeout_still_capturing() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        state.update(true, t0);
        assert_eq!(state.update(false, t0 + secs(3.0)), Transition::Continued);
        assert!(state.capturing());
    }

    #[test]
    fn test_stops_after_timeout() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        state.update(true, t0);
        assert_eq!(state.update(false, t0 + secs(3.1)), Transition::Stopped);
        assert!(!state.capturing());
        assert_eq!(state.update(false, t0 + secs(4.0)), Transition::Idle);
    }

    #[test]
    fn test_face_after_stop_restarts() {
        let mut state = CaptureState::default();
        let t0 = Instant::now();
        state.update(true, t0);
        state.update(false, t0 + secs(5.0));
        assert_eq!(state.update(true, t0 + secs(6.0)), Transition::Started);
        assert!(state.capturing());
    }

    #[test]
    fn test_timeout_measured_from_latest_face() {
        let mut state = CaptureState::new(secs(1.0));
        let t0 = Instant::now();
        state.update(true, t0);
        state.update(true, t0 + secs(0.9));
        // 1.5s after the first face but only 0.6s after the latest one
        assert_eq!(state.update(false, t0 + secs(1.5)), Transition::Continued);
        assert_eq!(state.update(false, t0 + secs(2.0)), Transition::Stopped);
    }

    #[test]
    fn test_huge_timeout_keeps_capturing() {
        let mut state = CaptureState::new(Duration::MAX);
        let t0 = Instant::now();
        state.update(true, t0);
        assert_eq!(state.update(false, t0), Transition::Continued);
        assert_eq!(state.update(false, t0 + secs(3600.0)), Transition::Continued);
    }

    #[test]
    fn test_clock_before_last_face_counts_as_no_time() {
        let t0 = Instant::now();
        let mut state = CaptureState::default();
        state.update(true, t0 + secs(1.0));
        assert_eq!(state.update(false, t0), Transition::Continued);
    }

    #[test]
    fn test_zero_timeout_stops_on_next_empty_frame() {
        let mut state = CaptureState::new(Duration::ZERO);
        let t0 = Instant::now();
        state.update(true, t0);
        assert_eq!(
            state.update(false, t0 + Duration::from_millis(1)),
            Transition::Stopped
        );
    }
}
