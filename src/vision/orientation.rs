//! Orientation resolution by trial OCR
//!
//! A rectified frame may still be sideways or upside-down. Recognition is
//! attempted at a fixed set of rotations and the highest-confidence result
//! wins. Right-side-up and sideways framings dominate in practice, so the
//! sweep tries 0, 90 and 270 before 180.

use anyhow::{anyhow, Result};
use image::imageops::{rotate180, rotate270, rotate90};
use image::GrayImage;
use tracing::{debug, warn};

use super::ocr::OcrEngine;

/// Rotations attempted, in priority order. Ties in confidence keep the
/// earlier entry.
pub const ROTATION_SWEEP: [i32; 4] = [0, 90, 270, 180];

/// The winning OCR attempt for a rectified frame
#[derive(Debug, Clone)]
pub struct OrientationAttempt {
    /// Rotation applied to the rectified image, in degrees clockwise
    pub rotation_degrees: i32,
    /// Text recognized at that rotation
    pub text: String,
    /// Engine-reported confidence in [0, 1]; 0 means the attempt failed
    pub confidence: f32,
}

/// Rotate an image by a multiple of 90 degrees, returning a new image.
///
/// Degrees are normalized into [0, 360), so -90 behaves as 270 and 360 as
/// 0. 90/270 swap width and height; 0/180 keep them.
pub fn rotate_image(src: &GrayImage, degrees: i32) -> Result<GrayImage> {
    let normalized = ((degrees % 360) + 360) % 360;
    match normalized {
        0 => Ok(src.clone()),
        90 => Ok(rotate90(src)),
        180 => Ok(rotate180(src)),
        270 => Ok(rotate270(src)),
        other => Err(anyhow!("Rotation must be a multiple of 90 degrees, got {other}")),
    }
}

/// Try OCR at each rotation in [`ROTATION_SWEEP`] and return the attempt
/// with the strictly highest confidence, together with the image rotated to
/// that orientation.
///
/// Individual attempts that raise are logged and recorded at confidence 0;
/// the sweep only fails when every attempt raised.
pub fn resolve_orientation(
    rectified: &GrayImage,
    engine: &dyn OcrEngine,
) -> Result<(OrientationAttempt, GrayImage)> {
    let mut best: Option<OrientationAttempt> = None;
    let mut any_succeeded = false;

    for degrees in ROTATION_SWEEP {
        let rotated = rotate_image(rectified, degrees)?;
        let attempt = match engine.recognize(&rotated) {
            Ok(result) => {
                any_succeeded = true;
                debug!(
                    "OCR at {}°: confidence {:.2}, {} chars",
                    degrees,
                    result.confidence,
                    result.text.len()
                );
                OrientationAttempt {
                    rotation_degrees: degrees,
                    text: result.text,
                    confidence: result.confidence,
                }
            }
            Err(e) => {
                warn!("OCR attempt at {}° failed: {e:#}", degrees);
                OrientationAttempt {
                    rotation_degrees: degrees,
                    text: String::new(),
                    confidence: 0.0,
                }
            }
        };

        let is_better = best
            .as_ref()
            .map(|b| attempt.confidence > b.confidence)
            .unwrap_or(true);
        if is_better {
            best = Some(attempt);
        }
    }

    let winner = match best {
        Some(attempt) if any_succeeded => attempt,
        _ => return Err(anyhow!("OCR failed at all orientations")),
    };
    let oriented = rotate_image(rectified, winner.rotation_degrees)?;
    debug!(
        "Best orientation: {}° at confidence {:.2}",
        winner.rotation_degrees, winner.confidence
    );
    Ok((winner, oriented))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::ocr::OcrText;
    use std::cell::RefCell;

    /// Scripted engine: returns the queued result for each call in order
    struct ScriptedOcr {
        script: RefCell<Vec<Result<OcrText>>>,
    }

    impl ScriptedOcr {
        fn new(script: Vec<Result<OcrText>>) -> Self {
            let mut script = script;
            script.reverse();
            Self {
                script: RefCell::new(script),
            }
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, _image: &GrayImage) -> Result<OcrText> {
            self.script
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(anyhow!("script exhausted")))
        }
    }

    fn ok(text: &str, confidence: f32) -> Result<OcrText> {
        Ok(OcrText {
            text: text.to_string(),
            confidence,
        })
    }

    fn canvas(w: u32, h: u32) -> GrayImage {
        GrayImage::new(w, h)
    }

    #[test]
    fn test_rotate_0_and_180_preserve_dimensions() {
        let img = canvas(100, 200);
        assert_eq!(rotate_image(&img, 0).unwrap().dimensions(), (100, 200));
        assert_eq!(rotate_image(&img, 180).unwrap().dimensions(), (100, 200));
    }

    #[test]
    fn test_rotate_90_and_270_swap_dimensions() {
        let img = canvas(100, 200);
        assert_eq!(rotate_image(&img, 90).unwrap().dimensions(), (200, 100));
        assert_eq!(rotate_image(&img, 270).unwrap().dimensions(), (200, 100));
    }

    #[test]
    fn test_rotate_normalizes_degrees() {
        let img = canvas(100, 200);
        assert_eq!(rotate_image(&img, 360).unwrap().dimensions(), (100, 200));
        assert_eq!(rotate_image(&img, 450).unwrap().dimensions(), (200, 100));
        assert_eq!(rotate_image(&img, -90).unwrap().dimensions(), (200, 100));
        assert_eq!(rotate_image(&img, -180).unwrap().dimensions(), (100, 200));
    }

    #[test]
    fn test_rotate_rejects_odd_angles() {
        let img = canvas(10, 10);
        assert!(rotate_image(&img, 45).is_err());
    }

    #[test]
    fn test_rotate_returns_new_instance() {
        let mut img = canvas(2, 2);
        img.put_pixel(0, 0, image::Luma([7u8]));
        let rotated = rotate_image(&img, 90).unwrap();
        // source untouched
        assert_eq!(img.get_pixel(0, 0).0[0], 7);
        assert_eq!(rotated.dimensions(), (2, 2));
    }

    #[test]
    fn test_sweep_picks_highest_confidence() {
        let engine = ScriptedOcr::new(vec![
            ok("upright", 0.4),
            ok("sideways", 0.9),
            ok("other side", 0.2),
            ok("upside down", 0.1),
        ]);
        let (best, oriented) = resolve_orientation(&canvas(100, 200), &engine).unwrap();
        assert_eq!(best.rotation_degrees, 90);
        assert_eq!(best.text, "sideways");
        // winner is 90°, so the returned image is rotated
        assert_eq!(oriented.dimensions(), (200, 100));
    }

    #[test]
    fn test_sweep_tie_keeps_priority_order() {
        let engine = ScriptedOcr::new(vec![
            ok("first", 0.5),
            ok("second", 0.5),
            ok("third", 0.5),
            ok("fourth", 0.5),
        ]);
        let (best, _) = resolve_orientation(&canvas(50, 50), &engine).unwrap();
        assert_eq!(best.rotation_degrees, 0);
        assert_eq!(best.text, "first");
    }

    #[test]
    fn test_sweep_continues_past_failed_attempts() {
        let engine = ScriptedOcr::new(vec![
            Err(anyhow!("engine hiccup")),
            Err(anyhow!("engine hiccup")),
            ok("recovered", 0.7),
            Err(anyhow!("engine hiccup")),
        ]);
        let (best, _) = resolve_orientation(&canvas(50, 50), &engine).unwrap();
        assert_eq!(best.rotation_degrees, 270);
        assert_eq!(best.text, "recovered");
    }

    #[test]
    fn test_sweep_fails_when_all_attempts_raise() {
        let engine = ScriptedOcr::new(vec![
            Err(anyhow!("down")),
            Err(anyhow!("down")),
            Err(anyhow!("down")),
            Err(anyhow!("down")),
        ]);
        let result = resolve_orientation(&canvas(50, 50), &engine);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("all orientations"));
    }

    #[test]
    fn test_failed_attempt_counts_as_zero_confidence() {
        // The raised 0° attempt is recorded at confidence 0 and can be
        // beaten by any orientation that produced text.
        let engine = ScriptedOcr::new(vec![
            Err(anyhow!("down")),
            ok("", 0.0),
            ok("faint", 0.01),
            ok("", 0.0),
        ]);
        let (best, _) = resolve_orientation(&canvas(50, 50), &engine).unwrap();
        assert_eq!(best.rotation_degrees, 270);
        assert_eq!(best.text, "faint");
    }
}
