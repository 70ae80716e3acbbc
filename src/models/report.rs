use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reasons offered by the report form.
pub const REPORT_REASONS: &[(&str, &str)] = &[
    ("plagiarism", "Plagiarism or academic dishonesty"),
    ("harassment", "Harassment or abuse"),
    ("spam", "Spam or scam"),
    ("inappropriate", "Inappropriate content"),
    ("other", "Other"),
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Service,
    User,
}

/// Moderation state. Reports are created `Pending`; nothing moves them yet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewing,
    Resolved,
    Dismissed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub target_id: String,
    pub target_type: TargetType,
    pub reason: String,
    pub details: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub target_id: String,
    pub target_type: TargetType,
    pub reason: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub reporter_id: String,
    pub draft: ReportDraft,
}

impl Record for Report {
    type Draft = NewReport;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assemble(id: String, created_at: DateTime<Utc>, new: NewReport) -> Self {
        Report {
            id,
            reporter_id: new.reporter_id,
            target_id: new.draft.target_id,
            target_type: new.draft.target_type,
            reason: new.draft.reason,
            details: new.draft.details,
            status: ReportStatus::Pending,
            created_at,
        }
    }
}
