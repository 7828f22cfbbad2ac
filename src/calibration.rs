//! Binarization-threshold auto-calibration.
//!
//! The pupil locator needs a binarization threshold matched to the person
//! and the camera. During the first frames of a session the calibrator
//! sweeps a fixed set of candidate thresholds per eye, keeps the candidate
//! whose dark-pixel coverage is closest to an empirical iris-to-eye-surface
//! ratio, and serves the running average of those picks. Once both eyes
//! have collected their full sample count the averages are frozen for the
//! rest of the session.

use crate::constants::{
    CALIBRATION_FRAMES, IRIS_FRAME_MARGIN, TARGET_IRIS_RATIO, THRESHOLD_CANDIDATE_MAX,
    THRESHOLD_CANDIDATE_MIN, THRESHOLD_CANDIDATE_STEP,
};
use crate::pupil::PupilLocator;
use crate::types::EyeSide;
use crate::{Error, Result};
use image::GrayImage;

/// Lifecycle of a session's calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// No sample collected yet for either eye
    Uncalibrated,
    /// At least one sample collected, at least one eye below its cap
    Calibrating,
    /// Both eyes reached their sample cap; thresholds are frozen
    Calibrated,
}

/// Per-session threshold calibrator holding one bounded sample sequence per eye
#[derive(Debug, Clone)]
pub struct ThresholdCalibrator {
    sample_cap: usize,
    target_iris_ratio: f64,
    thresholds_left: Vec<u8>,
    thresholds_right: Vec<u8>,
}

impl ThresholdCalibrator {
    /// Create a calibrator with the default sample cap and iris ratio target
    #[must_use]
    pub fn new() -> Self {
        Self::with_parameters(CALIBRATION_FRAMES, TARGET_IRIS_RATIO)
    }

    /// Create a calibrator with explicit parameters
    #[must_use]
    pub fn with_parameters(sample_cap: usize, target_iris_ratio: f64) -> Self {
        Self {
            sample_cap,
            target_iris_ratio,
            thresholds_left: Vec::with_capacity(sample_cap),
            thresholds_right: Vec::with_capacity(sample_cap),
        }
    }

    /// True once both eyes have reached their sample cap
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.side_complete(EyeSide::Left) && self.side_complete(EyeSide::Right)
    }

    /// True once one eye has reached its sample cap
    #[must_use]
    pub fn side_complete(&self, side: EyeSide) -> bool {
        self.samples(side).len() >= self.sample_cap
    }

    /// Collected threshold samples for one eye
    #[must_use]
    pub fn samples(&self, side: EyeSide) -> &[u8] {
        match side {
            EyeSide::Left => &self.thresholds_left,
            EyeSide::Right => &self.thresholds_right,
        }
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> CalibrationPhase {
        if self.is_complete() {
            CalibrationPhase::Calibrated
        } else if self.thresholds_left.is_empty() && self.thresholds_right.is_empty() {
            CalibrationPhase::Uncalibrated
        } else {
            CalibrationPhase::Calibrating
        }
    }

    /// Current operating threshold for one eye: the floor average of its samples.
    ///
    /// # Errors
    ///
    /// Returns `Error::CalibrationNotReady` when no sample has been
    /// collected for `side` yet.
    pub fn threshold(&self, side: EyeSide) -> Result<u8> {
        let samples = self.samples(side);
        if samples.is_empty() {
            return Err(Error::CalibrationNotReady(side));
        }

        let sum: u32 = samples.iter().map(|&t| u32::from(t)).sum();
        #[allow(clippy::cast_possible_truncation)] // average of u8 samples fits u8
        let average = (sum / samples.len() as u32) as u8;
        Ok(average)
    }

    /// Take one calibration sample from an eye frame.
    ///
    /// No-op once `side` has reached its sample cap. A frame too small for
    /// a meaningful iris measurement contributes no sample; calibration
    /// simply resumes on the next frame.
    pub fn evaluate(&mut self, eye_frame: &GrayImage, side: EyeSide, locator: &dyn PupilLocator) {
        if self.side_complete(side) {
            return;
        }

        let Some(best) = Self::find_best_threshold(eye_frame, locator, self.target_iris_ratio)
        else {
            log::debug!("calibration sample skipped for the {side} eye: frame too small");
            return;
        };

        match side {
            EyeSide::Left => self.thresholds_left.push(best),
            EyeSide::Right => self.thresholds_right.push(best),
        }

        if self.is_complete() {
            log::debug!(
                "threshold calibration complete: left={:?} right={:?}",
                self.threshold(EyeSide::Left),
                self.threshold(EyeSide::Right)
            );
        }
    }

    /// Fraction of dark pixels in a binarized eye frame, ignoring a border
    /// margin that only contains masking artifacts.
    ///
    /// Returns `None` when the frame is too small to leave any pixels after
    /// the margin is cropped.
    #[must_use]
    pub fn iris_size(binary_frame: &GrayImage) -> Option<f64> {
        let (width, height) = binary_frame.dimensions();
        if width <= 2 * IRIS_FRAME_MARGIN || height <= 2 * IRIS_FRAME_MARGIN {
            return None;
        }

        let mut dark: u64 = 0;
        for y in IRIS_FRAME_MARGIN..height - IRIS_FRAME_MARGIN {
            for x in IRIS_FRAME_MARGIN..width - IRIS_FRAME_MARGIN {
                if binary_frame.get_pixel(x, y).0[0] == 0 {
                    dark += 1;
                }
            }
        }

        let total =
            u64::from(width - 2 * IRIS_FRAME_MARGIN) * u64::from(height - 2 * IRIS_FRAME_MARGIN);
        #[allow(clippy::cast_precision_loss)] // pixel counts are far below 2^52
        let fraction = dark as f64 / total as f64;
        Some(fraction)
    }

    /// Sweep all candidate thresholds and return the one whose iris coverage
    /// is closest to `target_iris_ratio`.
    ///
    /// Candidates are tried in ascending order and only a strictly smaller
    /// distance replaces the current best, so exact ties resolve to the
    /// lowest candidate. Returns `None` when the frame is too small to
    /// measure. The search space is 19 values, so an exhaustive sweep is
    /// cheaper than anything smarter.
    #[must_use]
    pub fn find_best_threshold(
        eye_frame: &GrayImage,
        locator: &dyn PupilLocator,
        target_iris_ratio: f64,
    ) -> Option<u8> {
        let mut best: Option<(u8, f64)> = None;

        let mut candidate = THRESHOLD_CANDIDATE_MIN;
        while candidate <= THRESHOLD_CANDIDATE_MAX {
            let binary = locator.binarize(eye_frame, candidate);
            if let Some(coverage) = Self::iris_size(&binary) {
                let distance = (coverage - target_iris_ratio).abs();
                if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                    best = Some((candidate, distance));
                }
            }
            candidate += THRESHOLD_CANDIDATE_STEP;
        }

        best.map(|(candidate, _)| candidate)
    }
}

impl Default for ThresholdCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pupil::CentroidPupilLocator;
    use image::Luma;

    /// Eye frame whose interior (after the 5-px iris margin) is an exact
    /// split: `dark_fraction` of its pixels are 0, the rest 255.
    fn split_frame(width: u32, height: u32, dark_fraction: f64) -> GrayImage {
        let mut frame = GrayImage::from_pixel(width, height, Luma([255]));
        let inner_w = width - 2 * IRIS_FRAME_MARGIN;
        let inner_h = height - 2 * IRIS_FRAME_MARGIN;
        let dark_target = (f64::from(inner_w * inner_h) * dark_fraction).round() as u32;

        let mut painted = 0;
        'rows: for y in IRIS_FRAME_MARGIN..height - IRIS_FRAME_MARGIN {
            for x in IRIS_FRAME_MARGIN..width - IRIS_FRAME_MARGIN {
                if painted >= dark_target {
                    break 'rows;
                }
                frame.put_pixel(x, y, Luma([0]));
                painted += 1;
            }
        }
        frame
    }

    #[test]
    fn test_iris_size_excludes_margin() {
        // Dark border, bright interior: coverage must be zero
        let mut frame = GrayImage::from_pixel(20, 20, Luma([255]));
        for x in 0..20 {
            frame.put_pixel(x, 0, Luma([0]));
            frame.put_pixel(x, 19, Luma([0]));
        }
        assert_eq!(ThresholdCalibrator::iris_size(&frame), Some(0.0));
    }

    #[test]
    fn test_iris_size_too_small() {
        let frame = GrayImage::from_pixel(10, 10, Luma([0]));
        assert!(ThresholdCalibrator::iris_size(&frame).is_none());
    }

    #[test]
    fn test_find_best_threshold_hits_known_coverage() {
        // Pixel values 0 and 255 only: every candidate threshold yields the
        // same binary image, so all 19 distances tie and the lowest
        // candidate must win.
        let frame = split_frame(30, 30, 0.48);
        let locator = CentroidPupilLocator::new();
        let best = ThresholdCalibrator::find_best_threshold(&frame, &locator, TARGET_IRIS_RATIO);
        assert_eq!(best, Some(THRESHOLD_CANDIDATE_MIN));
    }

    #[test]
    fn test_find_best_threshold_gradient() {
        // Interior pixel i takes value i/4, so values 0..=99 each appear
        // exactly 4 times in the 400-pixel interior and
        // coverage(t) = (t + 1) / 100. Against the 0.48 target the distances
        // are 0.02 at t = 45 and 0.03 at t = 50, so 45 must win.
        let mut frame = GrayImage::from_pixel(30, 30, Luma([255]));
        let inner: Vec<(u32, u32)> = (IRIS_FRAME_MARGIN..25)
            .flat_map(|y| (IRIS_FRAME_MARGIN..25).map(move |x| (x, y)))
            .collect();
        assert_eq!(inner.len(), 400);
        for (i, &(x, y)) in inner.iter().enumerate() {
            frame.put_pixel(x, y, Luma([(i / 4) as u8]));
        }

        let locator = CentroidPupilLocator::new();
        let best =
            ThresholdCalibrator::find_best_threshold(&frame, &locator, TARGET_IRIS_RATIO).unwrap();
        assert_eq!(best, 45);
    }

    #[test]
    fn test_evaluate_caps_samples() {
        let mut calibrator = ThresholdCalibrator::with_parameters(3, TARGET_IRIS_RATIO);
        let frame = split_frame(30, 30, 0.48);
        let locator = CentroidPupilLocator::new();

        for _ in 0..10 {
            calibrator.evaluate(&frame, EyeSide::Left, &locator);
        }
        assert_eq!(calibrator.samples(EyeSide::Left).len(), 3);
        assert!(calibrator.side_complete(EyeSide::Left));
        assert!(!calibrator.is_complete());

        for _ in 0..3 {
            calibrator.evaluate(&frame, EyeSide::Right, &locator);
        }
        assert!(calibrator.is_complete());
        assert_eq!(calibrator.phase(), CalibrationPhase::Calibrated);
    }

    #[test]
    fn test_threshold_not_ready() {
        let calibrator = ThresholdCalibrator::new();
        assert!(matches!(
            calibrator.threshold(EyeSide::Left),
            Err(Error::CalibrationNotReady(EyeSide::Left))
        ));
        assert_eq!(calibrator.phase(), CalibrationPhase::Uncalibrated);
    }

    #[test]
    fn test_threshold_floor_average() {
        let mut calibrator = ThresholdCalibrator::with_parameters(3, TARGET_IRIS_RATIO);
        calibrator.thresholds_left = vec![5, 10, 20];
        // (5 + 10 + 20) / 3 = 11 with floor division
        assert_eq!(calibrator.threshold(EyeSide::Left).unwrap(), 11);
    }

    #[test]
    fn test_degenerate_frame_contributes_no_sample() {
        let mut calibrator = ThresholdCalibrator::new();
        let tiny = GrayImage::from_pixel(8, 8, Luma([0]));
        let locator = CentroidPupilLocator::new();

        calibrator.evaluate(&tiny, EyeSide::Left, &locator);
        assert!(calibrator.samples(EyeSide::Left).is_empty());
        assert_eq!(calibrator.phase(), CalibrationPhase::Uncalibrated);
    }
}
