//! Constants used throughout the gaze-estimation pipeline

/// Number of facial landmarks in the standard face model
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Landmark indices outlining the left eye contour
pub const LEFT_EYE_LANDMARKS: [usize; 6] = [36, 37, 38, 39, 40, 41];

/// Landmark indices outlining the right eye contour
pub const RIGHT_EYE_LANDMARKS: [usize; 6] = [42, 43, 44, 45, 46, 47];

/// Calibration samples collected per eye before the threshold freezes
pub const CALIBRATION_FRAMES: usize = 20;

/// Empirical fraction of the eye surface covered by the iris
pub const TARGET_IRIS_RATIO: f64 = 0.48;

/// Lowest binarization threshold candidate tried during calibration
pub const THRESHOLD_CANDIDATE_MIN: u8 = 5;

/// Highest binarization threshold candidate tried during calibration
pub const THRESHOLD_CANDIDATE_MAX: u8 = 95;

/// Step between consecutive threshold candidates
pub const THRESHOLD_CANDIDATE_STEP: u8 = 5;

/// Border stripped from a binarized eye frame before measuring iris coverage
pub const IRIS_FRAME_MARGIN: u32 = 5;

/// Margin added around the eye landmark bounding box when cropping
pub const EYE_CROP_MARGIN: i32 = 5;

/// Pixels subtracted from the doubled eye-box center when normalizing pupil positions
pub const CENTER_SPAN_OFFSET: f64 = 10.0;

/// Horizontal ratio at or below which the gaze counts as looking right
pub const LOOKING_RIGHT_MAX: f64 = 0.35;

/// Horizontal ratio at or above which the gaze counts as looking left
pub const LOOKING_LEFT_MIN: f64 = 0.65;

/// Average width/height ratio above which the eyes count as closed
pub const BLINK_RATIO_THRESHOLD: f64 = 3.8;

/// Half-length of the cross marker placed over a located pupil
pub const PUPIL_MARKER_HALF_LENGTH: i32 = 5;
