//! Haar cascade face detection.

use std::path::{Path, PathBuf};

use opencv::core::{Mat, Rect, Scalar, Size, Vector};
use opencv::prelude::*;
use opencv::{imgproc, objdetect};

use crate::error::RecorderError;
use crate::session::{Annotate, BoundingBox, DetectionParams, FaceDetector};

/// Marker colour (BGR green) and stroke width.
const MARKER_COLOR: (f64, f64, f64) = (0.0, 255.0, 0.0);
const MARKER_THICKNESS: i32 = 2;

/// Face detector backed by an OpenCV `CascadeClassifier`.
pub struct CascadeDetector {
    classifier: objdetect::CascadeClassifier,
    params: DetectionParams,
    /// Reused grayscale buffer
    gray: Mat,
}

impl CascadeDetector {
    /// Load a cascade from an XML file.
    ///
    /// # Errors
    /// * `RecorderError::ClassifierLoad` - If the file is missing, unreadable,
    ///   or holds no classifier
    pub fn load(path: impl AsRef<Path>, params: DetectionParams) -> Result<Self, RecorderError> {
        let path = path.as_ref();
        let load_error = || RecorderError::ClassifierLoad {
            path: PathBuf::from(path),
        };

        if !path.is_file() {
            return Err(load_error());
        }
        let path_str = path.to_str().ok_or_else(load_error)?;

        let classifier = objdetect::CascadeClassifier::new(path_str).map_err(|e| {
            log::debug!("CascadeClassifier::new failed: {}", e);
            load_error()
        })?;
        if classifier.empty()? {
            return Err(load_error());
        }

        log::info!("Loaded face classifier from {}", path.display());
        Ok(Self {
            classifier,
            params,
            gray: Mat::default(),
        })
    }
}

impl FaceDetector<Mat> for CascadeDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<BoundingBox>, RecorderError> {
        imgproc::cvt_color_def(frame, &mut self.gray, imgproc::COLOR_BGR2GRAY)?;

        let min_size = Size::new(self.params.min_size, self.params.min_size);
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &self.gray,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors,
            objdetect::CASCADE_DO_ROUGH_SEARCH,
            min_size,
            Size::default(),
        )?;

        Ok(faces
            .iter()
            .map(|r| BoundingBox::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

impl Annotate for Mat {
    fn draw_face(&mut self, face: &BoundingBox) -> Result<(), RecorderError> {
        let (b, g, r) = MARKER_COLOR;
        imgproc::rectangle(
            self,
            Rect::new(face.x, face.y, face.width, face.height),
            Scalar::new(b, g, r, 0.0),
            MARKER_THICKNESS,
            imgproc::LINE_8,
            0,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cascade_file() {
        let result = CascadeDetector::load("/nonexistent/face_cascade.xml", DetectionParams::default());
        match result {
            Err(RecorderError::ClassifierLoad { path }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/face_cascade.xml"));
            }
            Err(other) => panic!("Expected ClassifierLoad, got {:?}", other),
            Ok(_) => panic!("Expected ClassifierLoad, got a detector"),
        }
    }

    #[test]
    fn test_garbage_cascade_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        std::fs::write(&path, "not a cascade").unwrap();

        let result = CascadeDetector::load(&path, DetectionParams::default());
        assert!(result.is_err());
    }
}
