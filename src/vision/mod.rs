//! Vision Layer
//!
//! Locates the printed registration frame in a photograph, rectifies the
//! region it bounds, and resolves the correct reading orientation by trial
//! OCR. Every stage is a pure function of its inputs; the OCR engine is the
//! only injected capability.

pub mod extract;
pub mod geometry;
pub mod ocr;
pub mod orientation;
pub mod rectify;

pub use extract::{find_square_candidates, DetectParams};
pub use geometry::{order_corners, select_registration_corners, Point, Quad};
pub use ocr::{OcrEngine, OcrText, TesseractCli};
pub use orientation::{resolve_orientation, rotate_image, OrientationAttempt, ROTATION_SWEEP};
pub use rectify::warp_to_rect;
