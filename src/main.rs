//! certiscan - verify printed certification documents from a photograph
//!
//! Locates the registration frame printed on a certification document,
//! rectifies and OCRs the text inside it, and checks the SHA-256
//! fingerprint of that text against a local hash database or the
//! verification URL printed on the document itself.

mod config;
mod pipeline;
mod verify;
mod vision;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{default_config_path, load_config, save_config, ScanConfig};
use crate::pipeline::{scan_document, ScanError};
use crate::verify::{
    normalize_for_display, verify_local, HashDatabase, RemoteVerifier, VerificationOutcome,
};
use crate::vision::{DetectParams, TesseractCli};

/// certiscan - photograph-based certification document verification
#[derive(Parser, Debug)]
#[command(name = "certiscan")]
#[command(about = "Verify a printed certification document from a photo")]
struct Args {
    /// Photo of the document (the registration frame must be in view)
    image: PathBuf,

    /// Local hash database (JSON) to verify against
    #[arg(long)]
    db: Option<PathBuf>,

    /// Verify against the claimed URL over the network
    #[arg(long)]
    remote: bool,

    /// OCR language (tesseract language code)
    #[arg(long)]
    lang: Option<String>,

    /// Fixed binarization threshold (adaptive by default)
    #[arg(long)]
    threshold: Option<u8>,

    /// Config file path (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the default config location
    #[arg(long)]
    save_config: bool,

    /// Print the recognized text (display normalization, blank lines kept)
    #[arg(long)]
    show_text: bool,

    /// Save the rectified, orientation-corrected frame to this path
    #[arg(long)]
    save_crop: Option<PathBuf>,
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to initialize logging");
    }

    let args = Args::parse();

    match run(args) {
        Ok(outcome) => {
            let verified = outcome.as_ref().map(|o| o.verified).unwrap_or(true);
            if verified {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<Option<VerificationOutcome>> {
    let config = resolve_config(&args)?;

    if args.save_config {
        let path = default_config_path()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        save_config(&config, &path)?;
        info!("Saved configuration to {path:?}");
    }

    let image = image::open(&args.image)
        .with_context(|| format!("Failed to load image {:?}", args.image))?;
    info!("Loaded {:?} ({}x{})", args.image, image.width(), image.height());

    let params = DetectParams {
        min_area_ratio: config.detect.min_area_ratio,
        max_area_ratio: config.detect.max_area_ratio,
        approx_epsilon: config.detect.approx_epsilon,
        threshold: config.detect.threshold,
    };
    let engine = TesseractCli::new(&config.ocr.language);

    let doc = match scan_document(&image, &params, &engine) {
        Ok(doc) => doc,
        Err(ScanError::NoFrameDetected) => {
            anyhow::bail!("No registration square detected - re-frame the document and try again")
        }
        Err(e) => return Err(e.into()),
    };

    info!("Registration frame corners: {:?}", doc.corners);
    tracing::debug!("Certification body: {:?}", doc.certification_body);

    if let Some(crop_path) = &args.save_crop {
        doc.oriented
            .save(crop_path)
            .with_context(|| format!("Failed to save rectified frame to {crop_path:?}"))?;
        info!("Saved rectified frame to {crop_path:?}");
    }

    if args.show_text {
        println!("--- recognized text ---");
        println!("{}", normalize_for_display(&doc.raw_text));
        println!("--- normalized (hash input) ---");
        println!("{}", doc.normalized_body);
        println!("-------------------------------");
    }

    println!("Rotation:    {}°", doc.rotation_degrees);
    println!("Confidence:  {:.2}", doc.confidence);
    println!("URL:         {}", doc.verification_url);
    println!("Fingerprint: {}", doc.fingerprint);

    if let Some(db_path) = &config.verify.database {
        let db = HashDatabase::load(db_path)?;
        if db.is_empty() {
            tracing::warn!("Hash database {db_path:?} is empty");
        }
        let outcome = verify_local(&db, &doc.fingerprint);
        report(&outcome);
        return Ok(Some(outcome));
    }

    if config.verify.remote {
        let verifier = RemoteVerifier::new()?;
        let outcome = verifier.verify(&doc.verification_url, &doc.fingerprint);
        report(&outcome);
        return Ok(Some(outcome));
    }

    info!("No database or remote verification configured; reporting fingerprint only");
    Ok(None)
}

/// Merge the config file (if any) with command-line overrides
fn resolve_config(args: &Args) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {path:?}"))?,
        None => match default_config_path() {
            Ok(path) if path.exists() => load_config(&path).unwrap_or_default(),
            _ => ScanConfig::default(),
        },
    };

    if let Some(lang) = &args.lang {
        config.ocr.language = lang.clone();
    }
    if let Some(threshold) = args.threshold {
        config.detect.threshold = Some(threshold);
    }
    if let Some(db) = &args.db {
        config.verify.database = Some(db.clone());
    }
    if args.remote {
        config.verify.remote = true;
    }

    Ok(config)
}

fn report(outcome: &VerificationOutcome) {
    let marker = if outcome.verified { "✅" } else { "❌" };
    match &outcome.detail {
        Some(detail) => println!("{marker} {} - {detail}", outcome.reason),
        None => println!("{marker} {}", outcome.reason),
    }
}
