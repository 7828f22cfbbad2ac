//! Stateful gaze session driving the per-frame pipeline.
//!
//! A [`GazeSession`] owns the external detector and pupil locator, the
//! threshold calibrator and the two most recent per-eye results. Feed it
//! frames one at a time with [`GazeSession::next_frame`] and read the
//! derived gaze state through the query methods; every query returns
//! `None` instead of failing when the current frame yielded no usable
//! pupils.

use crate::calibration::{CalibrationPhase, ThresholdCalibrator};
use crate::config::TrackerConfig;
use crate::constants::PUPIL_MARKER_HALF_LENGTH;
use crate::detection::FaceLandmarkDetector;
use crate::eye::Eye;
use crate::pupil::{CentroidPupilLocator, PupilLocator};
use crate::types::{EyeSide, GazeDirection, GazeResult, Point2D};
use image::{DynamicImage, GrayImage};

/// Line segment in full-frame coordinates, used for pupil cross markers
pub type MarkerSegment = (Point2D, Point2D);

/// Top-level gaze tracking session.
///
/// Generic over the external face/landmark detector `D` and the pupil
/// locator `P`; the latter defaults to the built-in
/// [`CentroidPupilLocator`].
pub struct GazeSession<D, P = CentroidPupilLocator> {
    detector: D,
    locator: P,
    calibration: ThresholdCalibrator,
    config: TrackerConfig,
    left_eye: Option<Eye>,
    right_eye: Option<Eye>,
}

impl<D: FaceLandmarkDetector> GazeSession<D> {
    /// Create a session with the built-in pupil locator and default configuration
    pub fn new(detector: D) -> Self {
        Self::with_locator(detector, CentroidPupilLocator::new())
    }
}

impl<D: FaceLandmarkDetector, P: PupilLocator> GazeSession<D, P> {
    /// Create a session with a custom pupil locator
    pub fn with_locator(detector: D, locator: P) -> Self {
        Self::with_config(detector, locator, TrackerConfig::default())
    }

    /// Create a session with a custom pupil locator and configuration
    pub fn with_config(detector: D, locator: P, config: TrackerConfig) -> Self {
        let calibration = ThresholdCalibrator::with_parameters(
            config.calibration.sample_frames,
            config.calibration.target_iris_ratio,
        );

        Self {
            detector,
            locator,
            calibration,
            config,
            left_eye: None,
            right_eye: None,
        }
    }

    /// Analyze the next frame, replacing the previous per-eye results.
    ///
    /// Color frames are converted to grayscale first. A frame without a
    /// detectable face clears both eye results; it never fails.
    pub fn next_frame(&mut self, frame: &DynamicImage) {
        self.next_gray_frame(&frame.to_luma8());
    }

    /// Analyze the next frame that is already grayscale
    pub fn next_gray_frame(&mut self, frame: &GrayImage) {
        let Some(region) = self.detector.detect_face(frame) else {
            self.left_eye = None;
            self.right_eye = None;
            return;
        };

        let landmarks = match self.detector.detect_landmarks(frame, &region) {
            Ok(landmarks) => landmarks,
            Err(error) => {
                log::warn!("landmark detection failed: {error}");
                self.left_eye = None;
                self.right_eye = None;
                return;
            }
        };

        self.left_eye = Some(Eye::analyze(
            frame,
            &landmarks,
            EyeSide::Left,
            &mut self.calibration,
            &self.locator,
        ));
        self.right_eye = Some(Eye::analyze(
            frame,
            &landmarks,
            EyeSide::Right,
            &mut self.calibration,
            &self.locator,
        ));
    }

    /// True when both eyes were analyzed on the current frame and both
    /// pupils were found
    #[must_use]
    pub fn pupils_located(&self) -> bool {
        self.located_eyes().is_some()
    }

    /// Left pupil in full-frame coordinates
    #[must_use]
    pub fn left_pupil_coords(&self) -> Option<Point2D> {
        let (left, _) = self.located_eyes()?;
        Self::pupil_coords(left)
    }

    /// Right pupil in full-frame coordinates
    #[must_use]
    pub fn right_pupil_coords(&self) -> Option<Point2D> {
        let (_, right) = self.located_eyes()?;
        Self::pupil_coords(right)
    }

    /// Normalized horizontal gaze ratio averaged over both eyes.
    ///
    /// 0.0 means the pupils sit at the far right of their eye boxes, 1.0 at
    /// the far left; the inversion relative to screen direction matches a
    /// mirrored webcam view.
    #[must_use]
    pub fn horizontal_ratio(&self) -> Option<f64> {
        let (left, right) = self.located_eyes()?;
        let offset = self.config.gaze.center_span_offset;

        let left_ratio = Self::axis_ratio(left.region.center.0, left.pupil?.x, offset)?;
        let right_ratio = Self::axis_ratio(right.region.center.0, right.pupil?.x, offset)?;
        Some((left_ratio + right_ratio) / 2.0)
    }

    /// Normalized vertical gaze ratio averaged over both eyes.
    ///
    /// 0.0 means the pupils sit at the top of their eye boxes, 1.0 at the
    /// bottom.
    #[must_use]
    pub fn vertical_ratio(&self) -> Option<f64> {
        let (left, right) = self.located_eyes()?;
        let offset = self.config.gaze.center_span_offset;

        let left_ratio = Self::axis_ratio(left.region.center.1, left.pupil?.y, offset)?;
        let right_ratio = Self::axis_ratio(right.region.center.1, right.pupil?.y, offset)?;
        Some((left_ratio + right_ratio) / 2.0)
    }

    /// Whether the user is looking right; `None` when pupils are not located
    #[must_use]
    pub fn looking_right(&self) -> Option<bool> {
        self.horizontal_ratio()
            .map(|ratio| ratio <= self.config.gaze.looking_right_max)
    }

    /// Whether the user is looking left; `None` when pupils are not located
    #[must_use]
    pub fn looking_left(&self) -> Option<bool> {
        self.horizontal_ratio()
            .map(|ratio| ratio >= self.config.gaze.looking_left_min)
    }

    /// Whether the user is looking at the center; `None` when pupils are not located
    #[must_use]
    pub fn looking_center(&self) -> Option<bool> {
        self.direction().map(|d| d == GazeDirection::Center)
    }

    /// Direction classification for the current frame
    #[must_use]
    pub fn direction(&self) -> Option<GazeDirection> {
        let ratio = self.horizontal_ratio()?;
        if ratio <= self.config.gaze.looking_right_max {
            Some(GazeDirection::Right)
        } else if ratio >= self.config.gaze.looking_left_min {
            Some(GazeDirection::Left)
        } else {
            Some(GazeDirection::Center)
        }
    }

    /// Whether the eyes are closed, from the averaged blinking ratio.
    ///
    /// `None` when pupils are not located or either eye's geometry was too
    /// degenerate to measure.
    #[must_use]
    pub fn is_blinking(&self) -> Option<bool> {
        let (left, right) = self.located_eyes()?;
        let average = (left.blinking? + right.blinking?) / 2.0;
        Some(average > self.config.gaze.blink_ratio_threshold)
    }

    /// Full per-frame snapshot; `None` when any component is unavailable
    #[must_use]
    pub fn result(&self) -> Option<GazeResult> {
        Some(GazeResult {
            left_pupil: self.left_pupil_coords()?,
            right_pupil: self.right_pupil_coords()?,
            horizontal_ratio: self.horizontal_ratio()?,
            vertical_ratio: self.vertical_ratio()?,
            blinking: self.is_blinking()?,
            direction: self.direction()?,
        })
    }

    /// Cross-marker segments over both pupils, for callers drawing overlays
    #[must_use]
    pub fn pupil_markers(&self) -> Option<[MarkerSegment; 4]> {
        let left = self.left_pupil_coords()?;
        let right = self.right_pupil_coords()?;
        Some([
            Self::horizontal_marker(left),
            Self::vertical_marker(left),
            Self::horizontal_marker(right),
            Self::vertical_marker(right),
        ])
    }

    /// True once both eyes have frozen their binarization thresholds
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_complete()
    }

    /// Calibration lifecycle phase for this session
    #[must_use]
    pub fn calibration_phase(&self) -> CalibrationPhase {
        self.calibration.phase()
    }

    /// Access the calibrator, e.g. to inspect collected samples
    #[must_use]
    pub fn calibration(&self) -> &ThresholdCalibrator {
        &self.calibration
    }

    /// Both eyes of the current frame, only when both pupils were found
    fn located_eyes(&self) -> Option<(&Eye, &Eye)> {
        match (&self.left_eye, &self.right_eye) {
            (Some(left), Some(right)) if left.pupil.is_some() && right.pupil.is_some() => {
                Some((left, right))
            }
            _ => None,
        }
    }

    fn pupil_coords(eye: &Eye) -> Option<Point2D> {
        let pupil = eye.pupil?;
        Some(Point2D::new(
            eye.region.origin.x + pupil.x,
            eye.region.origin.y + pupil.y,
        ))
    }

    /// Pupil coordinate normalized against the eye box span minus the
    /// empirical offset; `None` when the span is degenerate.
    fn axis_ratio(center: f64, pupil_coord: i32, center_span_offset: f64) -> Option<f64> {
        let span = center * 2.0 - center_span_offset;
        if span <= 0.0 {
            return None;
        }
        Some(f64::from(pupil_coord) / span)
    }

    fn horizontal_marker(pupil: Point2D) -> MarkerSegment {
        (
            Point2D::new(pupil.x - PUPIL_MARKER_HALF_LENGTH, pupil.y),
            Point2D::new(pupil.x + PUPIL_MARKER_HALF_LENGTH, pupil.y),
        )
    }

    fn vertical_marker(pupil: Point2D) -> MarkerSegment {
        (
            Point2D::new(pupil.x, pupil.y - PUPIL_MARKER_HALF_LENGTH),
            Point2D::new(pupil.x, pupil.y + PUPIL_MARKER_HALF_LENGTH),
        )
    }
}
