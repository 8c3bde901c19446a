//! End-to-end scan pipeline
//!
//! photo → candidates → selected frame → rectified image → oriented text →
//! (URL, body) → normalized body → fingerprint. Everything is request-
//! scoped: each call builds its artifacts fresh and nothing persists across
//! attempts.

use image::{DynamicImage, GrayImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::vision::{
    find_square_candidates, resolve_orientation, select_registration_corners, warp_to_rect,
    DetectParams, OcrEngine, Quad,
};
use crate::verify::{
    extract_cert_text, extract_verification_url, fingerprint, normalize_for_fingerprint,
    ParseError,
};

/// Terminal failures of a scan cycle. Detection failure is the only
/// re-frame-and-retry case; the rest abort the cycle.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No registration square detected")]
    NoFrameDetected,
    #[error("Rectification failed: {0}")]
    Rectification(anyhow::Error),
    #[error("{0}")]
    OcrExhausted(anyhow::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A located and rectified registration frame
#[derive(Debug)]
pub struct Detection {
    /// Frame corners in the source image, TL, TR, BR, BL
    pub corners: Quad,
    /// The frame contents, perspective-corrected
    pub rectified: GrayImage,
}

/// Everything read from one successful scan
#[derive(Debug)]
pub struct ScannedDocument {
    pub corners: Quad,
    /// Rectified frame contents, rotated to the winning orientation
    pub oriented: GrayImage,
    /// Rotation that produced the best OCR read, degrees clockwise
    pub rotation_degrees: i32,
    /// OCR confidence of the winning orientation, in [0, 1]
    pub confidence: f32,
    /// Raw text of the winning OCR attempt
    pub raw_text: String,
    /// Certification body (lines above the URL), as OCR read it
    pub certification_body: String,
    /// Whitespace-stripped verification URL from the bottom line
    pub verification_url: String,
    /// Canonically normalized certification body (the hash input)
    pub normalized_body: String,
    /// Lowercase-hex SHA-256 of the normalized body
    pub fingerprint: String,
}

/// Locate the registration frame in a photograph and rectify its contents.
pub fn detect_frame(image: &DynamicImage, params: &DetectParams) -> Result<Detection, ScanError> {
    let gray = image.to_luma8();
    let (img_w, img_h) = gray.dimensions();

    let candidates = find_square_candidates(&gray, params);
    let corners = select_registration_corners(&candidates, img_w, img_h)
        .ok_or(ScanError::NoFrameDetected)?;
    debug!("Selected registration corners: {:?}", corners);

    let rectified = warp_to_rect(&gray, &corners).map_err(ScanError::Rectification)?;

    Ok(Detection { corners, rectified })
}

/// Run the full scan: detect, rectify, resolve orientation, parse, and
/// fingerprint. Verification against a database or the network is the
/// caller's next step.
pub fn scan_document(
    image: &DynamicImage,
    params: &DetectParams,
    engine: &dyn OcrEngine,
) -> Result<ScannedDocument, ScanError> {
    let detection = detect_frame(image, params)?;

    let (attempt, oriented) =
        resolve_orientation(&detection.rectified, engine).map_err(ScanError::OcrExhausted)?;
    info!(
        "OCR settled on {}° rotation at confidence {:.2}",
        attempt.rotation_degrees, attempt.confidence
    );

    let extracted = extract_verification_url(&attempt.text)?;
    let certification_body = extract_cert_text(&attempt.text, extracted.line_index);
    let normalized_body = normalize_for_fingerprint(&certification_body);
    let fp = fingerprint(&certification_body);
    info!("Fingerprint: {fp}");

    Ok(ScannedDocument {
        corners: detection.corners,
        oriented,
        rotation_degrees: attempt.rotation_degrees,
        confidence: attempt.confidence,
        raw_text: attempt.text,
        certification_body,
        verification_url: extracted.url,
        normalized_body,
        fingerprint: fp,
    })
}
