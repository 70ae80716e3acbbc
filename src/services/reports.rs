use crate::error::{AppError, AppResult};
use crate::models::report::{NewReport, Report, ReportDraft, TargetType};
use crate::models::session::Session;
use crate::storage::{KeyValueStorage, REPORTS_KEY};
use crate::store::RecordStore;
use leptos::logging::log;

/// Violation reports. Reports are only ever filed; there is no moderation
/// workflow yet, so every stored report keeps its initial `pending` status.
#[derive(Debug)]
pub struct ReportService<S> {
    store: RecordStore<Report, S>,
}

impl<S: KeyValueStorage> ReportService<S> {
    pub fn new(store: RecordStore<Report, S>) -> Self {
        Self { store }
    }

    pub fn load(storage: S) -> AppResult<Self> {
        Ok(Self::new(RecordStore::load(storage, REPORTS_KEY)?))
    }

    pub fn submit_report(&mut self, session: Option<&Session>, draft: ReportDraft) -> AppResult<Report> {
        let session = session.ok_or(AppError::NotAuthenticated)?;
        if draft.reason.trim().is_empty() {
            return Err(AppError::validation("Please select a reason for reporting"));
        }
        if draft.target_id.trim().is_empty() {
            return Err(AppError::validation("Nothing selected to report"));
        }

        let report = self.store.append(NewReport {
            reporter_id: session.user_id.clone(),
            draft,
        });
        log!(
            "[REPORTS] {} reported {:?} {} for '{}'",
            report.reporter_id,
            report.target_type,
            report.target_id,
            report.reason
        );
        Ok(report)
    }

    pub fn get_reports_by_target<'a>(
        &'a self,
        target_type: TargetType,
        target_id: &'a str,
    ) -> impl Iterator<Item = &'a Report> + 'a {
        self.store
            .query_by(move |report| report.target_type == target_type && report.target_id == target_id)
    }

    pub fn get_reports_by_reporter<'a>(&'a self, reporter_id: &'a str) -> impl Iterator<Item = &'a Report> + 'a {
        self.store.query_by(move |report| report.reporter_id == reporter_id)
    }

    pub fn store(&self) -> &RecordStore<Report, S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::ReportStatus;
    use crate::models::session::SubscriptionTier;
    use crate::storage::MemoryStorage;

    fn session() -> Session {
        Session {
            user_id: "reporter-1".into(),
            name: "Reporter".into(),
            email: "reporter@example.com".into(),
            tier: SubscriptionTier::Premium,
        }
    }

    fn draft(target_type: TargetType, target_id: &str, reason: &str) -> ReportDraft {
        ReportDraft {
            target_id: target_id.into(),
            target_type,
            reason: reason.into(),
            details: String::new(),
        }
    }

    #[test]
    fn new_reports_start_pending() {
        let mut reports = ReportService::load(MemoryStorage::new()).unwrap();
        let report = reports
            .submit_report(Some(&session()), draft(TargetType::Service, "svc-9", "spam"))
            .unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.reporter_id, "reporter-1");
    }

    #[test]
    fn reason_is_required() {
        let mut reports = ReportService::load(MemoryStorage::new()).unwrap();
        let err = reports
            .submit_report(Some(&session()), draft(TargetType::User, "u-2", " "))
            .unwrap_err();

        assert_eq!(err.to_string(), "Please select a reason for reporting");
        assert!(reports.store().is_empty());
    }

    #[test]
    fn anonymous_reports_are_rejected() {
        let mut reports = ReportService::load(MemoryStorage::new()).unwrap();
        let err = reports
            .submit_report(None, draft(TargetType::User, "u-2", "harassment"))
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
    }

    #[test]
    fn queries_filter_by_target_and_reporter() {
        let mut reports = ReportService::load(MemoryStorage::new()).unwrap();
        let me = session();
        reports.submit_report(Some(&me), draft(TargetType::User, "x", "spam")).unwrap();
        reports.submit_report(Some(&me), draft(TargetType::Service, "x", "spam")).unwrap();
        reports.submit_report(Some(&me), draft(TargetType::Service, "y", "other")).unwrap();

        assert_eq!(reports.get_reports_by_target(TargetType::Service, "x").count(), 1);
        assert_eq!(reports.get_reports_by_target(TargetType::User, "x").count(), 1);
        assert_eq!(reports.get_reports_by_reporter("reporter-1").count(), 3);
        assert_eq!(reports.get_reports_by_reporter("someone-else").count(), 0);
    }
}
