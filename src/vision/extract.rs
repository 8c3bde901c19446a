//! Quadrilateral candidate extraction
//!
//! Finds convex four-cornered contours in a photograph that could be the
//! printed registration frame. Grayscale → blur → binarize → contours →
//! polygon approximation, with an area-ratio window to drop noise and the
//! image border itself.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::contrast::{adaptive_threshold, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use tracing::debug;

use super::geometry::{is_convex, polygon_area, Point, Quad};

/// Parameters for candidate extraction
#[derive(Debug, Clone)]
pub struct DetectParams {
    /// Candidates smaller than this fraction of the image are dropped
    pub min_area_ratio: f64,
    /// Candidates larger than this fraction of the image are dropped
    pub max_area_ratio: f64,
    /// Polygon approximation tolerance, as a fraction of contour perimeter
    pub approx_epsilon: f64,
    /// Fixed binarization threshold; adaptive thresholding when `None`
    pub threshold: Option<u8>,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.0005,
            max_area_ratio: 0.5,
            approx_epsilon: 0.02,
            threshold: None,
        }
    }
}

/// Block radius for adaptive thresholding (matches an 11px window)
const ADAPTIVE_BLOCK_RADIUS: u32 = 5;

/// Sigma for the pre-threshold Gaussian blur
const BLUR_SIGMA: f32 = 1.4;

/// Find convex quadrilateral candidates in a grayscale image.
///
/// An empty result is not an error; it means nothing in frame qualified and
/// the caller should ask the user to re-frame.
pub fn find_square_candidates(gray: &GrayImage, params: &DetectParams) -> Vec<Quad> {
    let (img_w, img_h) = gray.dimensions();
    let image_area = f64::from(img_w) * f64::from(img_h);

    let blurred = gaussian_blur_f32(gray, BLUR_SIGMA);
    let binary = match params.threshold {
        Some(t) => threshold(&blurred, t, ThresholdType::Binary),
        None => adaptive_threshold(&blurred, ADAPTIVE_BLOCK_RADIUS),
    };

    let contours = find_contours::<i32>(&binary);
    debug!("Found {} contours in {}x{} image", contours.len(), img_w, img_h);

    let mut candidates = Vec::new();
    for contour in &contours {
        if contour.points.len() < 4 {
            continue;
        }

        let perimeter = arc_length(&contour.points, true);
        let epsilon = params.approx_epsilon * perimeter;
        let approx = approximate_polygon_dp(&contour.points, epsilon, true);
        if approx.len() != 4 {
            continue;
        }

        let quad: Quad = [
            Point::new(f64::from(approx[0].x), f64::from(approx[0].y)),
            Point::new(f64::from(approx[1].x), f64::from(approx[1].y)),
            Point::new(f64::from(approx[2].x), f64::from(approx[2].y)),
            Point::new(f64::from(approx[3].x), f64::from(approx[3].y)),
        ];
        if !is_convex(&quad) {
            continue;
        }

        let area_ratio = polygon_area(&quad) / image_area;
        if area_ratio > params.min_area_ratio && area_ratio < params.max_area_ratio {
            candidates.push(quad);
        }
    }

    debug!("{} quadrilateral candidates survived filtering", candidates.len());
    candidates
}
