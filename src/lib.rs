//! Gaze tracking library for estimating gaze direction and blink state from
//! webcam frames.
//!
//! For each frame the pipeline:
//! 1. Locates a face and its 68 facial landmarks through an external
//!    detector (see [`detection::FaceLandmarkDetector`])
//! 2. Isolates both eye regions along their landmark polygons
//! 3. Auto-calibrates a binarization threshold per eye over the first
//!    frames of the session
//! 4. Locates each pupil inside its eye region
//! 5. Derives normalized horizontal/vertical gaze ratios, a blink flag and
//!    a direction classification across both eyes
//!
//! Face detection and pupil localisation are capability traits so callers
//! can plug in their own models; a centroid-based pupil locator ships with
//! the crate. Webcam capture and drawing are deliberately out of scope.
//!
//! # Examples
//!
//! ```
//! use gaze_tracking::detection::{FaceLandmarkDetector, FaceRegion, Landmarks};
//! use gaze_tracking::{GazeSession, Point2D, Result};
//! use image::{DynamicImage, GrayImage};
//!
//! /// Detector stub standing in for a real landmark model
//! struct StaticDetector {
//!     points: Vec<Point2D>,
//! }
//!
//! impl FaceLandmarkDetector for StaticDetector {
//!     fn detect_face(&mut self, _frame: &GrayImage) -> Option<FaceRegion> {
//!         Some(FaceRegion { x: 0, y: 0, width: 320, height: 240 })
//!     }
//!
//!     fn detect_landmarks(&mut self, _frame: &GrayImage, _region: &FaceRegion) -> Result<Landmarks> {
//!         Landmarks::from_points(self.points.clone())
//!     }
//! }
//!
//! let detector = StaticDetector { points: vec![Point2D::new(0, 0); 68] };
//! let mut session = GazeSession::new(detector);
//!
//! session.next_frame(&DynamicImage::ImageLuma8(GrayImage::new(320, 240)));
//!
//! // Degenerate landmarks yield no pupils; queries degrade to None
//! assert!(!session.pupils_located());
//! assert!(session.horizontal_ratio().is_none());
//! assert!(session.is_blinking().is_none());
//! ```
//!
//! With a real detector the session converges after the calibration frames
//! and the classification queries become available:
//!
//! ```no_run
//! # use gaze_tracking::detection::{FaceLandmarkDetector, FaceRegion, Landmarks};
//! # use gaze_tracking::{GazeSession, Point2D, Result};
//! # use image::{DynamicImage, GrayImage};
//! # struct OnnxDetector;
//! # impl FaceLandmarkDetector for OnnxDetector {
//! #     fn detect_face(&mut self, _frame: &GrayImage) -> Option<FaceRegion> { None }
//! #     fn detect_landmarks(&mut self, _frame: &GrayImage, _region: &FaceRegion) -> Result<Landmarks> {
//! #         Landmarks::from_points(vec![Point2D::new(0, 0); 68])
//! #     }
//! # }
//! # fn capture_frame() -> DynamicImage { DynamicImage::ImageLuma8(GrayImage::new(1, 1)) }
//! let mut session = GazeSession::new(OnnxDetector);
//!
//! loop {
//!     let frame = capture_frame();
//!     session.next_frame(&frame);
//!
//!     if session.is_blinking() == Some(true) {
//!         println!("blinking");
//!     } else if let Some(direction) = session.direction() {
//!         println!("looking {direction:?}");
//!     }
//! }
//! ```

/// Binarization threshold auto-calibration
pub mod calibration;

/// Configuration management
pub mod config;

/// Constants used throughout the pipeline
pub mod constants;

/// External face and landmark detection contract
pub mod detection;

/// Error types and result handling
pub mod error;

/// Eye region isolation and per-eye analysis
pub mod eye;

/// Pupil localisation contract and the built-in centroid locator
pub mod pupil;

/// Stateful per-frame gaze session
pub mod session;

/// Core value types
pub mod types;

pub use error::{Error, Result};
pub use session::GazeSession;
pub use types::{EyeSide, GazeDirection, GazeResult, Point2D, PupilPosition};
