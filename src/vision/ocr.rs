//! OCR capability seam
//!
//! The orientation resolver and pipeline only see the `OcrEngine` trait, so
//! they stay deterministic and unit-testable against scripted fakes. The
//! shipped backend shells out to the `tesseract` binary with TSV output to
//! recover both text and a confidence score.

use anyhow::{bail, Context, Result};
use image::GrayImage;
use std::process::Command;
use tracing::debug;

/// Text recognized from one image, with the engine's confidence in [0, 1]
#[derive(Debug, Clone)]
pub struct OcrText {
    /// Recognized text, line structure preserved
    pub text: String,
    /// Mean recognition confidence (0.0 when nothing was recognized)
    pub confidence: f32,
}

/// A text recognition backend
pub trait OcrEngine {
    /// Run recognition on a grayscale image. May fail when the backend
    /// itself is unavailable; an empty result is not a failure.
    fn recognize(&self, image: &GrayImage) -> Result<OcrText>;
}

/// OCR backend backed by the `tesseract` command-line binary
pub struct TesseractCli {
    language: String,
}

impl TesseractCli {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<OcrText> {
        let dir = tempfile::tempdir().context("Failed to create temp dir for OCR input")?;
        let input_path = dir.path().join("frame.png");
        image
            .save(&input_path)
            .context("Failed to write OCR input image")?;

        let output = Command::new("tesseract")
            .arg(&input_path)
            .arg("stdout")
            .args(["-l", &self.language, "tsv"])
            .output()
            .context("Failed to run tesseract (is it installed and on PATH?)")?;

        if !output.status.success() {
            bail!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let result = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        debug!(
            "tesseract recognized {} chars at confidence {:.2}",
            result.text.len(),
            result.confidence
        );
        Ok(result)
    }
}

/// Rebuild line-structured text and a mean word confidence from tesseract's
/// TSV output. Word rows are level 5; conf is 0-100, or -1 for non-words.
fn parse_tsv(tsv: &str) -> OcrText {
    let mut lines: Vec<String> = Vec::new();
    let mut current_key: Option<(u32, u32, u32)> = None;
    let mut conf_sum = 0.0f32;
    let mut conf_count = 0u32;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }

        let key = (
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        let word = cols[11].trim();
        if word.is_empty() {
            continue;
        }

        if current_key == Some(key) {
            if let Some(last) = lines.last_mut() {
                last.push(' ');
                last.push_str(word);
            }
        } else {
            lines.push(word.to_string());
            current_key = Some(key);
        }

        if let Ok(conf) = cols[10].parse::<f32>() {
            if conf >= 0.0 {
                conf_sum += conf;
                conf_count += 1;
            }
        }
    }

    let confidence = if conf_count > 0 {
        (conf_sum / conf_count as f32) / 100.0
    } else {
        0.0
    };

    OcrText {
        text: lines.join("\n"),
        confidence,
    }
}
