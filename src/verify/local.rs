//! Local (offline) verification against a published hash database
//!
//! The database is a flat JSON document keyed by lowercase-hex SHA-256
//! fingerprints. It is produced by an external build step and read-only
//! here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::{VerificationOutcome, VerifyReason};

/// Registration status of one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Verified,
    Denied,
    Revoked,
    #[serde(untagged)]
    Other(String),
}

/// One entry in the hash database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Preloaded fingerprint-to-record table
#[derive(Debug, Clone, Default)]
pub struct HashDatabase {
    records: HashMap<String, VerificationRecord>,
}

impl HashDatabase {
    /// Parse a database from its JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let records: HashMap<String, VerificationRecord> =
            serde_json::from_str(json).context("Malformed hash database JSON")?;
        Ok(Self { records })
    }

    /// Load a database from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hash database {path:?}"))?;
        let db = Self::from_json(&content)?;
        info!("Loaded {} hashes from {:?}", db.len(), path);
        Ok(db)
    }

    pub fn lookup(&self, fingerprint: &str) -> Option<&VerificationRecord> {
        self.records.get(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Look up a fingerprint and fold the record into a verdict. The record's
/// message and timestamp are surfaced verbatim in the detail.
pub fn verify_local(db: &HashDatabase, fingerprint: &str) -> VerificationOutcome {
    let Some(record) = db.lookup(fingerprint) else {
        return VerificationOutcome {
            verified: false,
            reason: VerifyReason::NotFound,
            detail: None,
        };
    };

    let mut detail = record.message.clone().unwrap_or_default();
    if let Some(ts) = &record.timestamp {
        if !detail.is_empty() {
            detail.push_str(" | ");
        }
        detail.push_str("Registered: ");
        detail.push_str(ts);
    }
    let detail = (!detail.is_empty()).then_some(detail);

    match &record.status {
        RecordStatus::Verified => VerificationOutcome {
            verified: true,
            reason: VerifyReason::Verified,
            detail,
        },
        RecordStatus::Denied => VerificationOutcome {
            verified: false,
            reason: VerifyReason::Denied,
            detail,
        },
        RecordStatus::Revoked => VerificationOutcome {
            verified: false,
            reason: VerifyReason::Revoked,
            detail,
        },
        RecordStatus::Other(status) => VerificationOutcome {
            verified: false,
            reason: VerifyReason::UnknownStatus(status.clone()),
            detail,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DB: &str = r#"{
        "e6200eead4c2ec90f6393eb1559d4b24c3dcbdc54e6fd610014bb9f668cc8710": {
            "status": "verified",
            "message": "Intertek certification validated",
            "timestamp": "2025-10-23T12:15:33.749Z"
        },
        "d8f402889929a49d489d30ca9991989111c4bd0e3bdac15791d95c81269c31a5": {
            "status": "revoked",
            "message": "Product recalled due to safety concerns"
        },
        "fe59b91b97619ae831e895bd38a123d3500a393778d0ab58c2fffb894e0704be": {
            "status": "denied"
        },
        "1111111111111111111111111111111111111111111111111111111111111111": {
            "status": "pending"
        }
    }"#;

    #[test]
    fn test_parse_flat_database() {
        let db = HashDatabase::from_json(SAMPLE_DB).unwrap();
        assert_eq!(db.len(), 4);
        let record = db
            .lookup("e6200eead4c2ec90f6393eb1559d4b24c3dcbdc54e6fd610014bb9f668cc8710")
            .unwrap();
        assert_eq!(record.status, RecordStatus::Verified);
        assert_eq!(
            record.message.as_deref(),
            Some("Intertek certification validated")
        );
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(HashDatabase::from_json("not json {{").is_err());
    }

    #[test]
    fn test_verified_record() {
        let db = HashDatabase::from_json(SAMPLE_DB).unwrap();
        let outcome = verify_local(
            &db,
            "e6200eead4c2ec90f6393eb1559d4b24c3dcbdc54e6fd610014bb9f668cc8710",
        );
        assert!(outcome.verified);
        assert_eq!(outcome.reason, VerifyReason::Verified);
        let detail = outcome.detail.unwrap();
        assert!(detail.contains("Intertek certification validated"));
        assert!(detail.contains("Registered: 2025-10-23"));
    }

    #[test]
    fn test_revoked_record_surfaces_message() {
        let db = HashDatabase::from_json(SAMPLE_DB).unwrap();
        let outcome = verify_local(
            &db,
            "d8f402889929a49d489d30ca9991989111c4bd0e3bdac15791d95c81269c31a5",
        );
        assert!(!outcome.verified);
        assert_eq!(outcome.reason, VerifyReason::Revoked);
        assert_eq!(
            outcome.detail.as_deref(),
            Some("Product recalled due to safety concerns")
        );
    }

    #[test]
    fn test_denied_record_without_message() {
        let db = HashDatabase::from_json(SAMPLE_DB).unwrap();
        let outcome = verify_local(
            &db,
            "fe59b91b97619ae831e895bd38a123d3500a393778d0ab58c2fffb894e0704be",
        );
        assert!(!outcome.verified);
        assert_eq!(outcome.reason, VerifyReason::Denied);
        assert!(outcome.detail.is_none());
    }

    #[test]
    fn test_unrecognized_status_is_not_verified() {
        let db = HashDatabase::from_json(SAMPLE_DB).unwrap();
        let outcome = verify_local(
            &db,
            "1111111111111111111111111111111111111111111111111111111111111111",
        );
        assert!(!outcome.verified);
        assert_eq!(
            outcome.reason,
            VerifyReason::UnknownStatus("pending".to_string())
        );
    }

    #[test]
    fn test_absent_fingerprint_is_not_found() {
        let db = HashDatabase::from_json(SAMPLE_DB).unwrap();
        let outcome = verify_local(&db, "0000000000000000000000000000000000000000000000000000000000000000");
        assert!(!outcome.verified);
        assert_eq!(outcome.reason, VerifyReason::NotFound);
    }
}
