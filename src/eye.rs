//! Eye isolation and per-eye analysis.
//!
//! Each analyzed frame produces one [`Eye`] per side: the eye region is cut
//! out of the full frame along its landmark polygon, the blinking ratio is
//! measured on the raw landmark geometry, and the pupil locator is run on
//! the isolated crop with the calibrated threshold.

use crate::calibration::ThresholdCalibrator;
use crate::constants::EYE_CROP_MARGIN;
use crate::detection::Landmarks;
use crate::pupil::PupilLocator;
use crate::types::{EyeSide, Point2D, PupilPosition};
use image::{GrayImage, Luma};

/// Masked, cropped single-eye image with its placement in the full frame
#[derive(Debug, Clone)]
pub struct EyeRegion {
    /// Cropped grayscale frame; pixels outside the eye polygon are white
    pub frame: GrayImage,
    /// Top-left corner of the crop in full-frame coordinates
    pub origin: Point2D,
    /// Midpoint of the crop in crop-local coordinates
    pub center: (f64, f64),
}

impl EyeRegion {
    /// Isolate one eye from a full grayscale frame.
    ///
    /// The six landmark points of the side form a closed polygon; pixels
    /// inside it keep their original intensity, everything else becomes
    /// white so the binarization step never mistakes surrounding face
    /// texture for iris. The crop box is the polygon bounding box expanded
    /// by a fixed margin and clamped to the frame.
    #[must_use]
    pub fn isolate(frame: &GrayImage, landmarks: &Landmarks, side: EyeSide) -> Self {
        let polygon: Vec<Point2D> = side
            .landmark_indices()
            .iter()
            .map(|&index| landmarks.point(index))
            .collect();

        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for point in &polygon {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        #[allow(clippy::cast_possible_wrap)] // frame dimensions fit i32
        let (frame_width, frame_height) = (frame.width() as i32, frame.height() as i32);
        let left = (min_x - EYE_CROP_MARGIN).max(0).min(frame_width);
        let top = (min_y - EYE_CROP_MARGIN).max(0).min(frame_height);
        let right = (max_x + EYE_CROP_MARGIN).clamp(left, frame_width);
        let bottom = (max_y + EYE_CROP_MARGIN).clamp(top, frame_height);

        #[allow(clippy::cast_sign_loss)] // clamped to be non-negative above
        let (crop_width, crop_height) = ((right - left) as u32, (bottom - top) as u32);

        let mut eye = GrayImage::from_pixel(crop_width, crop_height, Luma([255]));
        for y in 0..crop_height {
            for x in 0..crop_width {
                #[allow(clippy::cast_possible_wrap)] // crop fits the frame
                let (frame_x, frame_y) = (left + x as i32, top + y as i32);
                if point_in_polygon(frame_x, frame_y, &polygon) {
                    #[allow(clippy::cast_sign_loss)] // inside the frame by construction
                    eye.put_pixel(x, y, *frame.get_pixel(frame_x as u32, frame_y as u32));
                }
            }
        }

        Self {
            frame: eye,
            origin: Point2D::new(left, top),
            center: (f64::from(crop_width) / 2.0, f64::from(crop_height) / 2.0),
        }
    }
}

/// Width-to-height ratio of one eye from raw landmark geometry.
///
/// The width is the corner-to-corner distance, the height the distance
/// between the midpoints of the upper and lower lid landmark pairs. A large
/// ratio indicates a nearly closed eye. Returns `None` when the eye height
/// is exactly zero.
#[must_use]
pub fn blinking_ratio(landmarks: &Landmarks, side: EyeSide) -> Option<f64> {
    let indices = side.landmark_indices();
    let left = landmarks.point(indices[0]);
    let right = landmarks.point(indices[3]);
    let top = Point2D::midpoint(landmarks.point(indices[1]), landmarks.point(indices[2]));
    let bottom = Point2D::midpoint(landmarks.point(indices[5]), landmarks.point(indices[4]));

    let eye_width = Point2D::distance(left, right);
    let eye_height = Point2D::distance(top, bottom);

    if eye_height == 0.0 {
        return None;
    }
    Some(eye_width / eye_height)
}

/// Per-frame analysis result for one eye
#[derive(Debug, Clone)]
pub struct Eye {
    /// Isolated eye region
    pub region: EyeRegion,
    /// Width/height blinking ratio; `None` for degenerate eye geometry
    pub blinking: Option<f64>,
    /// Pupil position inside the region; `None` when no pupil was found
    pub pupil: Option<PupilPosition>,
}

impl Eye {
    /// Run the full per-eye analysis for one frame.
    ///
    /// While calibration for this side is incomplete, the isolated region
    /// also feeds one calibration sample before the pupil search runs.
    pub fn analyze(
        frame: &GrayImage,
        landmarks: &Landmarks,
        side: EyeSide,
        calibrator: &mut ThresholdCalibrator,
        locator: &dyn PupilLocator,
    ) -> Self {
        let blinking = blinking_ratio(landmarks, side);
        let region = EyeRegion::isolate(frame, landmarks, side);

        if !calibrator.side_complete(side) {
            calibrator.evaluate(&region.frame, side, locator);
        }

        let pupil = match calibrator.threshold(side) {
            Ok(threshold) => locator.locate(&region.frame, threshold),
            Err(error) => {
                log::warn!("{error}; skipping pupil search for the {side} eye");
                None
            }
        };

        Self {
            region,
            blinking,
            pupil,
        }
    }
}

/// Even-odd point-in-polygon test
fn point_in_polygon(x: i32, y: i32, polygon: &[Point2D]) -> bool {
    let (px, py) = (f64::from(x), f64::from(y));
    let mut inside = false;

    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (f64::from(polygon[i].x), f64::from(polygon[i].y));
        let (xj, yj) = (f64::from(polygon[j].x), f64::from(polygon[j].y));

        if ((yi > py) != (yj > py)) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}
