//! Pupil localisation contract and the built-in centroid locator.

use crate::types::PupilPosition;
use image::{GrayImage, Luma};

/// External pupil localisation capability.
///
/// `binarize` must preserve the input dimensions and produce a
/// single-channel image whose pixels are either 0 (dark, read as iris or
/// pupil tissue) or 255. The calibrator relies on that polarity when it
/// measures iris coverage.
pub trait PupilLocator {
    /// Binarize an eye frame: pixels above `threshold` become 255, the rest 0
    fn binarize(&self, eye_frame: &GrayImage, threshold: u8) -> GrayImage;

    /// Locate the pupil in eye-local coordinates.
    ///
    /// `None` signals that no pupil was found in this frame; it is a normal
    /// outcome, not an error.
    fn locate(&self, eye_frame: &GrayImage, threshold: u8) -> Option<PupilPosition>;
}

/// Default pupil locator: binarizes the eye frame and takes the centroid of
/// the remaining dark pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct CentroidPupilLocator;

impl CentroidPupilLocator {
    /// Create the default locator
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PupilLocator for CentroidPupilLocator {
    fn binarize(&self, eye_frame: &GrayImage, threshold: u8) -> GrayImage {
        let mut binary = GrayImage::new(eye_frame.width(), eye_frame.height());
        for (x, y, pixel) in eye_frame.enumerate_pixels() {
            let value = if pixel.0[0] > threshold { 255 } else { 0 };
            binary.put_pixel(x, y, Luma([value]));
        }
        binary
    }

    #[allow(clippy::cast_possible_truncation)] // centroid fits the frame dimensions
    fn locate(&self, eye_frame: &GrayImage, threshold: u8) -> Option<PupilPosition> {
        let binary = self.binarize(eye_frame, threshold);

        let mut sum_x: u64 = 0;
        let mut sum_y: u64 = 0;
        let mut count: u64 = 0;

        for (x, y, pixel) in binary.enumerate_pixels() {
            if pixel.0[0] == 0 {
                sum_x += u64::from(x);
                sum_y += u64::from(y);
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        Some(PupilPosition {
            x: (sum_x / count) as i32,
            y: (sum_y / count) as i32,
        })
    }
}
