use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AdminId, AnswerSubmission, ApprovalDecision, ReviewDecision, RoleId, SubmissionId,
    SubmissionKind, WorkerId,
};
use super::repository::{NotificationPublisher, RepositoryError, VerificationRepository};
use super::service::{VerificationError, VerificationService};

/// Router builder exposing the verification workflow over HTTP.
pub fn verification_router<R, N>(service: Arc<VerificationService<R, N>>) -> Router
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/workers/:worker_id/test-attempts",
            post(submit_attempt_handler::<R, N>),
        )
        .route(
            "/api/v1/workers/:worker_id/verification",
            get(verification_handler::<R, N>),
        )
        .route(
            "/api/v1/workers/:worker_id/approval",
            post(approval_handler::<R, N>),
        )
        .route(
            "/api/v1/workers/:worker_id/suspension",
            post(suspension_handler::<R, N>),
        )
        .route(
            "/api/v1/workers/:worker_id/forced-passes",
            post(force_passes_handler::<R, N>).delete(revoke_passes_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:kind/:submission_id/review",
            post(review_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestAttemptRequest {
    pub(crate) role: String,
    pub(crate) answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApprovalRequest {
    pub(crate) decision: ApprovalDecision,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    pub(crate) admin_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) decision: ReviewDecision,
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuspensionRequest {
    pub(crate) suspended: bool,
}

pub(crate) async fn submit_attempt_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path(worker_id): Path<String>,
    axum::Json(request): axum::Json<TestAttemptRequest>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let worker_id = WorkerId(worker_id);
    let role = RoleId(request.role);

    match service.submit_test_attempt(&worker_id, &role, &request.answers) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verification_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path(worker_id): Path<String>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.verification_view(&WorkerId(worker_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approval_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path(worker_id): Path<String>,
    axum::Json(request): axum::Json<ApprovalRequest>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let admin = AdminId(request.admin_id);
    match service.decide_approval(
        &WorkerId(worker_id),
        request.decision,
        request.notes,
        &admin,
    ) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn suspension_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path(worker_id): Path<String>,
    axum::Json(request): axum::Json<SuspensionRequest>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.set_suspended(&WorkerId(worker_id), request.suspended) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn force_passes_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path(worker_id): Path<String>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.force_pass_all_roles(&WorkerId(worker_id)) {
        Ok(inserted) => (StatusCode::OK, axum::Json(json!({ "inserted": inserted }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn revoke_passes_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path(worker_id): Path<String>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.revoke_forced_passes(&WorkerId(worker_id)) {
        Ok(removed) => (StatusCode::OK, axum::Json(json!({ "removed": removed }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<VerificationService<R, N>>>,
    Path((kind, submission_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(kind) = SubmissionKind::parse(&kind) else {
        let payload = json!({
            "error": format!("unknown submission kind '{kind}'"),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.review_submission(
        kind,
        &SubmissionId(submission_id),
        request.decision,
        request.reason,
    ) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "reviewed" }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: VerificationError) -> Response {
    let status = match &error {
        VerificationError::LockedOut { .. } => StatusCode::LOCKED,
        VerificationError::AlreadyPassed => StatusCode::CONFLICT,
        VerificationError::NoQuestionsAvailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        VerificationError::MissingRejectionReason | VerificationError::RoleNotDeclared(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        VerificationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        VerificationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        VerificationError::Repository(RepositoryError::Unavailable(_))
        | VerificationError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut payload = json!({ "error": error.to_string() });
    if let VerificationError::LockedOut { until } = &error {
        payload["lockout_until"] = json!(until);
    }

    (status, axum::Json(payload)).into_response()
}
