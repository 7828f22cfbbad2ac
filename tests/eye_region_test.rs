//! Eye region isolation properties


use gaze_tracking::eye::{blinking_ratio, EyeRegion};
use gaze_tracking::types::{EyeSide, Point2D};
use image::GrayImage;
use test_helpers::{default_left_eye, default_right_eye, eye_polygon, face_landmarks};

/// Frame whose pixel values encode their coordinates, so passthrough can
/// be checked exactly
fn patterned_frame(width: u32, height: u32) -> GrayImage {
    let mut frame = GrayImage::new(width, height);
    for (x, y, pixel) in frame.enumerate_pixels_mut() {
        pixel.0[0] = ((x + 3 * y) % 251) as u8;
    }
    frame
}

#[test]
fn test_masking_polarity() {
    let frame = patterned_frame(320, 240);
    let landmarks = face_landmarks(default_left_eye(), default_right_eye());

    let region = EyeRegion::isolate(&frame, &landmarks, EyeSide::Left);
    assert_eq!(region.origin, Point2D::new(55, 95));
    assert_eq!(region.frame.dimensions(), (70, 40));
    assert_eq!(region.center, (35.0, 20.0));

    // Strictly inside the hexagon: original intensity preserved
    for (x, y) in [(35u32, 20u32), (30, 15), (40, 25)] {
        let full = frame.get_pixel(x + 55, y + 95).0[0];
        assert_eq!(
            region.frame.get_pixel(x, y).0[0],
            full,
            "interior pixel ({x}, {y}) was not passed through"
        );
    }

    // Outside the polygon, inside the crop: masked to white, not black
    for (x, y) in [(0u32, 0u32), (69, 0), (0, 39), (69, 39), (2, 20)] {
        assert_eq!(
            region.frame.get_pixel(x, y).0[0],
            255,
            "exterior pixel ({x}, {y}) was not masked white"
        );
    }
}

#[test]
fn test_both_eyes_have_disjoint_regions() {
    let frame = patterned_frame(320, 240);
    let landmarks = face_landmarks(default_left_eye(), default_right_eye());

    let left = EyeRegion::isolate(&frame, &landmarks, EyeSide::Left);
    let right = EyeRegion::isolate(&frame, &landmarks, EyeSide::Right);

    assert_eq!(left.origin, Point2D::new(55, 95));
    assert_eq!(right.origin, Point2D::new(195, 95));
    assert!(left.origin.x + left.frame.width() as i32 <= right.origin.x);
}

#[test]
fn test_crop_clamped_at_frame_border() {
    let frame = patterned_frame(100, 80);
    // Eye pushed into the top-left corner; the 5-px margin has no room
    let landmarks = face_landmarks(eye_polygon(0, 0, 30, 20), eye_polygon(60, 10, 90, 30));

    let region = EyeRegion::isolate(&frame, &landmarks, EyeSide::Left);
    assert_eq!(region.origin, Point2D::new(0, 0));
    assert_eq!(region.frame.dimensions(), (35, 25));
}

#[test]
fn test_blinking_ratio_uses_raw_landmarks() {
    // Width 60 between the corners, 30 between the lid midpoints
    let landmarks = face_landmarks(default_left_eye(), default_right_eye());

    let left = blinking_ratio(&landmarks, EyeSide::Left).unwrap();
    let right = blinking_ratio(&landmarks, EyeSide::Right).unwrap();
    assert!((left - 2.0).abs() < 1e-12);
    assert!((right - 2.0).abs() < 1e-12);
}

#[test]
fn test_blinking_ratio_zero_height_is_unavailable() {
    let landmarks = face_landmarks(eye_polygon(60, 110, 120, 110), default_right_eye());
    assert!(blinking_ratio(&landmarks, EyeSide::Left).is_none());
    assert!(blinking_ratio(&landmarks, EyeSide::Right).is_some());
}
