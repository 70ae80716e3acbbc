//! Domain services over the three record stores.
//!
//! [`Services`] is built once per process or browser session around an
//! injected storage backend and handed to consumers by reference.

pub mod plagiarism;
pub mod reports;
pub mod reviews;

use crate::error::AppResult;
use crate::storage::{KeyValueStorage, PLAGIARISM_RESULTS_KEY, REPORTS_KEY, REVIEWS_KEY};
use crate::store::RecordStore;
use plagiarism::{PlagiarismService, SampledScanPolicy};
use reports::ReportService;
use reviews::ReviewService;

#[derive(Debug)]
pub struct Services<S> {
    pub reviews: ReviewService<S>,
    pub plagiarism: PlagiarismService<S>,
    pub reports: ReportService<S>,
}

impl<S: KeyValueStorage + Clone> Services<S> {
    /// Loads every collection, failing on the first corrupt one.
    pub fn load(storage: S) -> AppResult<Self> {
        Ok(Self {
            reviews: ReviewService::load(storage.clone())?,
            plagiarism: PlagiarismService::load(storage.clone())?,
            reports: ReportService::load(storage)?,
        })
    }

    /// Loads every collection, quarantining corrupt ones instead of failing.
    /// Storage read errors are still returned.
    pub fn open(storage: S) -> AppResult<Self> {
        Ok(Self {
            reviews: ReviewService::new(RecordStore::load_or_quarantine(storage.clone(), REVIEWS_KEY)?),
            plagiarism: PlagiarismService::new(
                RecordStore::load_or_quarantine(storage.clone(), PLAGIARISM_RESULTS_KEY)?,
                Box::new(SampledScanPolicy),
            ),
            reports: ReportService::new(RecordStore::load_or_quarantine(storage, REPORTS_KEY)?),
        })
    }

    /// Empty services that keep everything in memory and never touch the
    /// saved collections. Used when storage cannot be read at startup.
    pub fn detached(storage: S) -> Self {
        Self {
            reviews: ReviewService::new(RecordStore::detached(storage.clone(), REVIEWS_KEY)),
            plagiarism: PlagiarismService::new(
                RecordStore::detached(storage.clone(), PLAGIARISM_RESULTS_KEY),
                Box::new(SampledScanPolicy),
            ),
            reports: ReportService::new(RecordStore::detached(storage, REPORTS_KEY)),
        }
    }
}
