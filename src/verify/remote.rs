//! Remote verification against the claimed URL
//!
//! The document claims a base URL; appending the fingerprint must yield a
//! page that answers 200 with "OK" in the body. Distinct failure reasons
//! are kept for diagnostics but every failure folds to `verified: false`.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::{VerificationOutcome, VerifyReason};

/// Whether the computed hash appears in the claimed URL. Case-sensitive
/// substring semantics, not equality.
pub fn hash_matches_url(claimed_url: &str, computed_hash: &str) -> bool {
    claimed_url.contains(computed_hash)
}

/// Build the full per-document URL: base URL with the fingerprint appended
pub fn full_verification_url(base_url: &str, fingerprint: &str) -> String {
    format!("{base_url}/{fingerprint}")
}

/// Fold an HTTP response into a verdict: 200 with "OK" in the body passes,
/// everything else fails with the specific reason preserved.
fn outcome_from_response(status: u16, body: &str) -> VerificationOutcome {
    if status != 200 {
        return VerificationOutcome {
            verified: false,
            reason: VerifyReason::HttpStatus(status),
            detail: None,
        };
    }
    if !body.contains("OK") {
        return VerificationOutcome {
            verified: false,
            reason: VerifyReason::BodyMissingOk,
            detail: None,
        };
    }
    VerificationOutcome {
        verified: true,
        reason: VerifyReason::Verified,
        detail: None,
    }
}

/// HTTP-backed remote verifier
pub struct RemoteVerifier {
    client: reqwest::Client,
    runtime: Runtime,
}

impl RemoteVerifier {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        Ok(Self { client, runtime })
    }

    /// Verify a `(verification_url, fingerprint)` pair against the network.
    ///
    /// The URL is first sanity-checked to contain the fingerprint; given
    /// how the full URL is constructed this is structurally always true,
    /// but it is validated anyway before touching the network.
    pub fn verify(&self, verification_url: &str, fingerprint: &str) -> VerificationOutcome {
        let full_url = full_verification_url(verification_url, fingerprint);

        if !hash_matches_url(&full_url, fingerprint) {
            return VerificationOutcome {
                verified: false,
                reason: VerifyReason::HashNotInUrl,
                detail: Some(full_url),
            };
        }

        debug!("Fetching {}", full_url);
        let response = self.runtime.block_on(async {
            let resp = self.client.get(&full_url).send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        match response {
            Ok((status, body)) => {
                let mut outcome = outcome_from_response(status, &body);
                if outcome.detail.is_none() {
                    outcome.detail = Some(full_url);
                }
                outcome
            }
            Err(e) => {
                warn!("Remote verification fetch failed: {e}");
                VerificationOutcome {
                    verified: false,
                    reason: VerifyReason::NetworkError,
                    detail: Some(e.to_string()),
                }
            }
        }
    }
}
