use crate::error::{AppError, AppResult};
use crate::models::review::{NewReview, Review, ReviewDraft};
use crate::models::session::Session;
use crate::storage::{KeyValueStorage, REVIEWS_KEY};
use crate::store::RecordStore;
use leptos::logging::log;

/// Tutor reviews: submission plus the per-provider queries the profile page
/// needs.
#[derive(Debug)]
pub struct ReviewService<S> {
    store: RecordStore<Review, S>,
}

impl<S: KeyValueStorage> ReviewService<S> {
    pub fn new(store: RecordStore<Review, S>) -> Self {
        Self { store }
    }

    pub fn load(storage: S) -> AppResult<Self> {
        Ok(Self::new(RecordStore::load(storage, REVIEWS_KEY)?))
    }

    pub fn add_review(&mut self, session: Option<&Session>, draft: ReviewDraft) -> AppResult<Review> {
        let session = session.ok_or(AppError::NotAuthenticated)?;
        validate_review(&draft)?;

        let review = self.store.append(NewReview {
            reviewer_id: session.user_id.clone(),
            draft,
        });
        log!(
            "[REVIEWS] {} rated provider {} {}/5",
            review.reviewer_id,
            review.provider_id,
            review.rating
        );
        Ok(review)
    }

    /// Reviews received by `provider_id`, in storage order.
    pub fn get_user_reviews<'a>(&'a self, provider_id: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.store.query_by(move |review| review.provider_id == provider_id)
    }

    pub fn get_service_reviews<'a>(&'a self, service_id: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.store.query_by(move |review| review.service_id == service_id)
    }

    /// Mean rating received by `user_id`, 0 when they have no reviews.
    pub fn get_average_rating(&self, user_id: &str) -> f64 {
        self.store
            .mean_by(|review| review.provider_id == user_id, |review| f64::from(review.rating))
            .unwrap_or(0.0)
    }

    pub fn store(&self) -> &RecordStore<Review, S> {
        &self.store
    }
}

fn validate_review(draft: &ReviewDraft) -> AppResult<()> {
    if draft.service_id.trim().is_empty() || draft.provider_id.trim().is_empty() {
        return Err(AppError::validation("Please choose a service to review"));
    }
    if !(1..=5).contains(&draft.rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    if draft.comment.trim().is_empty() {
        return Err(AppError::validation("Please write a comment"));
    }
    Ok(())
}
