use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sentence flagged by the scanner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismMatch {
    pub text: String,
    pub similarity: u8, // percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismResult {
    pub id: String,
    pub service_id: String,
    pub text: String,
    pub originality_score: u8, // 0 to 100
    pub matches: Vec<PlagiarismMatch>,
    pub created_at: DateTime<Utc>,
}

/// Scan output before it is stamped and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanVerdict {
    pub service_id: String,
    pub text: String,
    pub originality_score: u8,
    pub matches: Vec<PlagiarismMatch>,
}

impl Record for PlagiarismResult {
    type Draft = ScanVerdict;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assemble(id: String, created_at: DateTime<Utc>, verdict: ScanVerdict) -> Self {
        PlagiarismResult {
            id,
            service_id: verdict.service_id,
            text: verdict.text,
            originality_score: verdict.originality_score,
            matches: verdict.matches,
            created_at,
        }
    }
}
