// src/models/review.rs
use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub service_id: String,   // Tutoring service the review is about
    pub reviewer_id: String,  // User who wrote the review
    pub provider_id: String,  // Tutor who provided the service
    pub rating: u8,           // 1 to 5
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review fields supplied by the form. The reviewer comes from the session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub service_id: String,
    pub provider_id: String,
    pub rating: u8,
    pub comment: String,
}

/// Draft plus the authenticated reviewer, as stored.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_id: String,
    pub draft: ReviewDraft,
}

impl Record for Review {
    type Draft = NewReview;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assemble(id: String, created_at: DateTime<Utc>, new: NewReview) -> Self {
        Review {
            id,
            service_id: new.draft.service_id,
            reviewer_id: new.reviewer_id,
            provider_id: new.draft.provider_id,
            rating: new.draft.rating,
            comment: new.draft.comment,
            created_at,
        }
    }
}
