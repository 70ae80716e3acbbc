#[cfg(feature = "ssr")]
mod api_impl {
    use crate::error::AppError;
    use crate::models::plagiarism::PlagiarismResult;
    use crate::models::report::{Report, ReportDraft, TargetType};
    use crate::models::review::{Review, ReviewDraft};
    use crate::models::session::Session;
    use crate::services::Services;
    use crate::storage::KeyValueStorage;
    use actix_web::http::StatusCode;
    use actix_web::{web, HttpResponse, ResponseError};
    use leptos::logging::log;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    pub type SharedServices<S> = web::Data<Arc<Mutex<Services<S>>>>;

    #[derive(Serialize, Deserialize)]
    pub struct ReviewRequest {
        pub session: Option<Session>,
        pub draft: ReviewDraft,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ScanRequest {
        pub service_id: String,
        pub text: String,
    }

    #[derive(Serialize, Deserialize)]
    pub struct ReportRequest {
        pub session: Option<Session>,
        pub draft: ReportDraft,
    }

    #[derive(Deserialize)]
    pub struct ReviewQuery {
        pub provider_id: Option<String>,
        pub service_id: Option<String>,
    }

    #[derive(Deserialize)]
    pub struct ReportQuery {
        pub target_type: TargetType,
        pub target_id: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct RatingResponse {
        pub user_id: String,
        pub average_rating: f64,
        pub review_count: usize,
    }

    #[derive(Serialize)]
    struct ErrorBody {
        error: String,
    }

    impl ResponseError for AppError {
        fn status_code(&self) -> StatusCode {
            match self {
                AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            HttpResponse::build(self.status_code()).json(ErrorBody {
                error: self.to_string(),
            })
        }
    }

    /// Registers the JSON routes under `/api`.
    pub fn configure<S: KeyValueStorage + 'static>(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api")
                .route("/reviews", web::get().to(list_reviews::<S>)) // GET /api/reviews
                .route("/reviews", web::post().to(create_review::<S>)) // POST /api/reviews
                .route("/users/{id}/rating", web::get().to(user_rating::<S>)) // GET /api/users/{id}/rating
                .route("/plagiarism", web::post().to(check_plagiarism::<S>)) // POST /api/plagiarism
                .route("/reports", web::get().to(list_reports::<S>)) // GET /api/reports
                .route("/reports", web::post().to(create_report::<S>)), // POST /api/reports
        );
    }

    pub async fn list_reviews<S: KeyValueStorage + 'static>(
        services: SharedServices<S>,
        query: web::Query<ReviewQuery>,
    ) -> HttpResponse {
        let services = services.lock().await;
        let reviews: Vec<Review> = match (&query.provider_id, &query.service_id) {
            (Some(provider_id), _) => services.reviews.get_user_reviews(provider_id).cloned().collect(),
            (None, Some(service_id)) => services.reviews.get_service_reviews(service_id).cloned().collect(),
            (None, None) => services.reviews.store().records().to_vec(),
        };
        log!("[API] Returning {} reviews", reviews.len());
        HttpResponse::Ok().json(reviews)
    }

    pub async fn create_review<S: KeyValueStorage + 'static>(
        services: SharedServices<S>,
        request: web::Json<ReviewRequest>,
    ) -> HttpResponse {
        let ReviewRequest { session, draft } = request.into_inner();
        log!("[API] Received review for provider {}", draft.provider_id);

        let mut services = services.lock().await;
        match services.reviews.add_review(session.as_ref(), draft) {
            Ok(review) => {
                log!("[API] Saved review ID: {}", review.id);
                HttpResponse::Created().json(review)
            }
            Err(err) => {
                log!("[API] Review rejected: {}", err);
                err.error_response()
            }
        }
    }

    pub async fn user_rating<S: KeyValueStorage + 'static>(
        services: SharedServices<S>,
        user_id: web::Path<String>,
    ) -> HttpResponse {
        let user_id = user_id.into_inner();
        let services = services.lock().await;
        let response = RatingResponse {
            average_rating: services.reviews.get_average_rating(&user_id),
            review_count: services.reviews.get_user_reviews(&user_id).count(),
            user_id,
        };
        HttpResponse::Ok().json(response)
    }

    pub async fn check_plagiarism<S: KeyValueStorage + 'static>(
        services: SharedServices<S>,
        request: web::Json<ScanRequest>,
    ) -> HttpResponse {
        let mut services = services.lock().await;
        let result: Result<PlagiarismResult, AppError> = services
            .plagiarism
            .submit_scan(&request.service_id, &request.text);
        match result {
            Ok(result) => HttpResponse::Created().json(result),
            Err(err) => {
                log!("[API] Scan rejected: {}", err);
                err.error_response()
            }
        }
    }

    pub async fn list_reports<S: KeyValueStorage + 'static>(
        services: SharedServices<S>,
        query: web::Query<ReportQuery>,
    ) -> HttpResponse {
        let services = services.lock().await;
        let reports: Vec<Report> = services
            .reports
            .get_reports_by_target(query.target_type, &query.target_id)
            .cloned()
            .collect();
        HttpResponse::Ok().json(reports)
    }

    pub async fn create_report<S: KeyValueStorage + 'static>(
        services: SharedServices<S>,
        request: web::Json<ReportRequest>,
    ) -> HttpResponse {
        let ReportRequest { session, draft } = request.into_inner();
        let mut services = services.lock().await;
        match services.reports.submit_report(session.as_ref(), draft) {
            Ok(report) => {
                log!("[API] Filed report ID: {}", report.id);
                HttpResponse::Created().json(report)
            }
            Err(err) => {
                leptos::logging::error!("[API] Report rejected: {}", err);
                err.error_response()
            }
        }
    }

}

#[cfg(feature = "ssr")]
pub use api_impl::*;
