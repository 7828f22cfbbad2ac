//! Contract consumed from the external face and landmark detector.
//!
//! The gaze pipeline never runs face detection itself; it only requires
//! something that can find at most one face per grayscale frame and report
//! the 68 ordered facial landmark points for it. Implementations typically
//! wrap a cascade classifier or an ONNX landmark model.

use crate::constants::NUM_FACIAL_LANDMARKS;
use crate::types::Point2D;
use crate::{Error, Result};
use image::GrayImage;

/// Axis-aligned region of a detected face in full-frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    /// Left edge of the face box
    pub x: i32,
    /// Top edge of the face box
    pub y: i32,
    /// Width of the face box
    pub width: i32,
    /// Height of the face box
    pub height: i32,
}

/// The 68 ordered landmark points of one detected face.
///
/// Indices follow the standard 68-point facial landmark convention:
/// 36-41 outline the left eye, 42-47 the right eye.
#[derive(Debug, Clone)]
pub struct Landmarks {
    points: [Point2D; NUM_FACIAL_LANDMARKS],
}

impl Landmarks {
    /// Build a landmark set from detector output.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `points` does not contain exactly
    /// 68 entries.
    pub fn from_points(points: Vec<Point2D>) -> Result<Self> {
        let count = points.len();
        let points: [Point2D; NUM_FACIAL_LANDMARKS] = points.try_into().map_err(|_| {
            Error::InvalidInput(format!(
                "expected {NUM_FACIAL_LANDMARKS} facial landmarks, got {count}"
            ))
        })?;

        Ok(Self { points })
    }

    /// The landmark point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 68 or greater.
    #[must_use]
    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }

    /// All 68 points in order
    #[must_use]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }
}

/// External face and landmark detection capability.
///
/// Both calls are expected to be deterministic per frame and free of
/// pipeline-visible side effects; `&mut self` only allows implementations
/// to keep internal caches warm.
pub trait FaceLandmarkDetector {
    /// Detect the most prominent face in a grayscale frame, if any
    fn detect_face(&mut self, frame: &GrayImage) -> Option<FaceRegion>;

    /// Detect the 68 facial landmarks for a previously detected face.
    ///
    /// # Errors
    ///
    /// Implementations return an error when landmark inference fails; the
    /// session treats that the same as an undetected face.
    fn detect_landmarks(&mut self, frame: &GrayImage, region: &FaceRegion) -> Result<Landmarks>;
}
