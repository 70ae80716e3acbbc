//! Simulated originality scanner.
//!
//! There is no text-similarity engine here. The scanner splits the text into
//! sentences and asks a [`ScanPolicy`] which of them to flag; the score is a
//! fixed formula over the flagged matches.

use crate::error::{AppError, AppResult};
use crate::models::plagiarism::{PlagiarismMatch, PlagiarismResult, ScanVerdict};
use crate::storage::{KeyValueStorage, PLAGIARISM_RESULTS_KEY};
use crate::store::RecordStore;
use leptos::logging::log;
use std::fmt;
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Below this many sentences a text is reported as fully original.
pub const MIN_SENTENCES: usize = 4;
pub const MAX_MATCHES: usize = 3;
pub const SIMILARITY_RANGE: RangeInclusive<u8> = 65..=95;
/// Shortest text the scan form accepts.
pub const MIN_SCAN_CHARS: usize = 50;

const CANNED_SOURCES: &[&str] = &[
    "Wikipedia",
    "Course Hero",
    "Chegg Study",
    "Quizlet",
    "Published journal article",
    "Student essay archive",
];

/// Decides which sentences are reported as matches.
///
/// `pick` should return between 1 and `budget` matches, in document order.
/// The scanner truncates longer answers, falls back to one sampled match when
/// the answer is empty, and clamps similarities into [`SIMILARITY_RANGE`].
pub trait ScanPolicy: Send + Sync {
    fn pick(&self, sentences: &[&str], budget: usize) -> Vec<PlagiarismMatch>;
}

/// Random sampling. Two scans of the same text generally disagree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledScanPolicy;

// UUID v4 carries 122 random bits, plenty for picking small indices.
fn random_below(bound: usize) -> usize {
    (Uuid::new_v4().as_u128() % bound as u128) as usize
}

impl ScanPolicy for SampledScanPolicy {
    fn pick(&self, sentences: &[&str], budget: usize) -> Vec<PlagiarismMatch> {
        let mut indices: Vec<usize> = (0..sentences.len()).collect();
        let take = budget.min(indices.len());
        for slot in 0..take {
            let chosen = slot + random_below(indices.len() - slot);
            indices.swap(slot, chosen);
        }
        let mut chosen = indices[..take].to_vec();
        chosen.sort_unstable();

        let span = usize::from(SIMILARITY_RANGE.end() - SIMILARITY_RANGE.start()) + 1;
        chosen
            .into_iter()
            .map(|index| PlagiarismMatch {
                text: sentences[index].to_string(),
                similarity: SIMILARITY_RANGE.start() + random_below(span) as u8,
                source: Some(CANNED_SOURCES[random_below(CANNED_SOURCES.len())].to_string()),
            })
            .collect()
    }
}

/// Deterministic policy: flags the given sentence indices with one similarity.
#[derive(Debug, Clone, Default)]
pub struct FixedScanPolicy {
    pub indices: Vec<usize>,
    pub similarity: u8,
    pub source: Option<String>,
}

impl ScanPolicy for FixedScanPolicy {
    fn pick(&self, sentences: &[&str], _budget: usize) -> Vec<PlagiarismMatch> {
        self.indices
            .iter()
            .filter_map(|&index| sentences.get(index))
            .map(|sentence| PlagiarismMatch {
                text: sentence.to_string(),
                similarity: self.similarity,
                source: self.source.clone(),
            })
            .collect()
    }
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// How many matches a text of `sentence_count` sentences may receive.
pub fn match_budget(sentence_count: usize) -> usize {
    (sentence_count / MIN_SENTENCES).clamp(1, MAX_MATCHES)
}

/// `100 - 10 per match - half the mean similarity`, rounded and floored at 0.
pub fn originality_score(matches: &[PlagiarismMatch]) -> u8 {
    if matches.is_empty() {
        return 100;
    }
    let count = matches.len() as f64;
    let mean = matches.iter().map(|m| f64::from(m.similarity)).sum::<f64>() / count;
    (100.0 - 10.0 * count - mean / 2.0).round().clamp(0.0, 100.0) as u8
}

/// Runs the simulator over `text`; returns the score and the matches.
pub fn scan(text: &str, policy: &dyn ScanPolicy) -> (u8, Vec<PlagiarismMatch>) {
    let sentences = split_sentences(text);
    if sentences.len() < MIN_SENTENCES {
        return (100, Vec::new());
    }

    let budget = match_budget(sentences.len());
    let mut matches = policy.pick(&sentences, budget);
    if matches.is_empty() {
        log!("[SCAN] Policy flagged nothing in {} sentences, sampling one", sentences.len());
        matches = SampledScanPolicy.pick(&sentences, 1);
    }
    matches.truncate(budget);
    for found in &mut matches {
        found.similarity = found
            .similarity
            .clamp(*SIMILARITY_RANGE.start(), *SIMILARITY_RANGE.end());
    }
    (originality_score(&matches), matches)
}

/// Form-level check run before a scan is submitted.
pub fn validate_scan_input(text: &str) -> AppResult<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Please paste some text to check"));
    }
    if trimmed.chars().count() < MIN_SCAN_CHARS {
        return Err(AppError::validation(format!(
            "Please enter at least {MIN_SCAN_CHARS} characters"
        )));
    }
    Ok(())
}

pub struct PlagiarismService<S> {
    store: RecordStore<PlagiarismResult, S>,
    policy: Box<dyn ScanPolicy>,
}

impl<S: fmt::Debug> fmt::Debug for PlagiarismService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlagiarismService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> PlagiarismService<S> {
    pub fn new(store: RecordStore<PlagiarismResult, S>, policy: Box<dyn ScanPolicy>) -> Self {
        Self { store, policy }
    }

    pub fn load(storage: S) -> AppResult<Self> {
        Ok(Self::new(
            RecordStore::load(storage, PLAGIARISM_RESULTS_KEY)?,
            Box::new(SampledScanPolicy),
        ))
    }

    pub fn set_policy(&mut self, policy: Box<dyn ScanPolicy>) {
        self.policy = policy;
    }

    /// Scans `text` and records the verdict. Not idempotent under the
    /// default policy.
    pub fn check_plagiarism(&mut self, service_id: &str, text: &str) -> PlagiarismResult {
        let (originality_score, matches) = scan(text, self.policy.as_ref());
        let result = self.store.append(ScanVerdict {
            service_id: service_id.to_string(),
            text: text.to_string(),
            originality_score,
            matches,
        });
        log!(
            "[SCAN] Service {} scored {}% original with {} matches",
            result.service_id,
            result.originality_score,
            result.matches.len()
        );
        result
    }

    /// Validates the form input, then scans.
    pub fn submit_scan(&mut self, service_id: &str, text: &str) -> AppResult<PlagiarismResult> {
        validate_scan_input(text)?;
        Ok(self.check_plagiarism(service_id, text))
    }

    pub fn get_service_results<'a>(
        &'a self,
        service_id: &'a str,
    ) -> impl Iterator<Item = &'a PlagiarismResult> + 'a {
        self.store.query_by(move |result| result.service_id == service_id)
    }

    pub fn store(&self) -> &RecordStore<PlagiarismResult, S> {
        &self.store
    }
}
