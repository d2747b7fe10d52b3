//! Live preview window.

use opencv::core::Mat;
use opencv::highgui;

use crate::error::RecorderError;
use crate::session::Preview;

/// Title of the preview window.
pub const WINDOW_NAME: &str = "Camera";

/// Key that ends the session when pressed in the preview window.
pub const QUIT_KEY: char = 'q';

/// Whether a `wait_key` result is the quit key. -1 means no key was pressed.
pub fn is_quit_key(code: i32) -> bool {
    code >= 0 && (code & 0xFF) == QUIT_KEY as i32
}

/// highgui window showing the annotated stream. Destroyed on drop if not closed.
#[derive(Debug)]
pub struct PreviewWindow {
    name: String,
    closed: bool,
}

impl PreviewWindow {
    pub fn open(name: &str) -> Result<Self, RecorderError> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            name: name.to_string(),
            closed: false,
        })
    }
}

impl Preview<Mat> for PreviewWindow {
    fn show(&mut self, frame: &Mat) -> Result<(), RecorderError> {
        highgui::imshow(&self.name, frame)?;
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool, RecorderError> {
        Ok(is_quit_key(highgui::wait_key(1)?))
    }

    fn close(&mut self) -> Result<(), RecorderError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        highgui::destroy_window(&self.name)?;
        Ok(())
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close preview window: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_is_not_quit() {
        assert!(!is_quit_key(-1));
    }

    #[test]
    fn test_q_is_quit() {
        assert!(is_quit_key('q' as i32));
    }

    #[test]
    fn test_q_with_modifier_bits_is_quit() {
        assert!(is_quit_key(0x10_0000 | 'q' as i32));
    }

    #[test]
    fn test_other_keys_are_not_quit() {
        assert!(!is_quit_key('Q' as i32));
        assert!(!is_quit_key(27));
    }
}
