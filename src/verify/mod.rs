//! Verification Layer
//!
//! Turns the OCR text read from a rectified frame into a verdict: parse out
//! the verification URL and certification body, normalize the body, hash
//! it, and check the fingerprint against a local database or the claimed
//! URL itself.

pub mod fingerprint;
pub mod local;
pub mod normalize;
pub mod parse;
pub mod remote;

use std::fmt;

pub use fingerprint::{fingerprint, sha256_hex};
pub use local::{verify_local, HashDatabase, RecordStatus, VerificationRecord};
pub use normalize::{normalize_for_display, normalize_for_fingerprint};
pub use parse::{extract_cert_text, extract_verification_url, ExtractedUrl, ParseError};
pub use remote::{full_verification_url, hash_matches_url, RemoteVerifier};

/// Why a verification attempt passed or failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyReason {
    /// Fingerprint confirmed
    Verified,
    /// Record present but the certification was denied
    Denied,
    /// Record present but the certification was revoked
    Revoked,
    /// Fingerprint absent from the local database
    NotFound,
    /// Record present with a status this tool does not recognize
    UnknownStatus(String),
    /// Computed hash not present in the claimed URL
    HashNotInUrl,
    /// Remote endpoint answered with a non-200 status
    HttpStatus(u16),
    /// Remote endpoint answered 200 but without "OK" in the body
    BodyMissingOk,
    /// Remote endpoint unreachable
    NetworkError,
}

impl fmt::Display for VerifyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyReason::Verified => write!(f, "VERIFIED - certification confirmed"),
            VerifyReason::Denied => write!(f, "DENIED - certification application denied"),
            VerifyReason::Revoked => write!(f, "REVOKED - certification revoked or product recalled"),
            VerifyReason::NotFound => write!(f, "NOT FOUND - hash not in database"),
            VerifyReason::UnknownStatus(s) => write!(f, "UNKNOWN STATUS - {s}"),
            VerifyReason::HashNotInUrl => write!(f, "hash not found at claimed URL"),
            VerifyReason::HttpStatus(code) => write!(f, "URL returned status {code}"),
            VerifyReason::BodyMissingOk => write!(f, "URL response does not contain \"OK\""),
            VerifyReason::NetworkError => write!(f, "network error or CORS restriction"),
        }
    }
}

/// Terminal artifact of the pipeline: the verdict plus its reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub verified: bool,
    pub reason: VerifyReason,
    pub detail: Option<String>,
}
