use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    ChannelStatuses, IdVerification, Qualification, Question, Reference, RoleId, SubmissionId,
    TestAttempt, WorkerId, WorkerProfile,
};
use super::scoring::ChannelCredit;

/// Storage abstraction over the profile store so the service module can be
/// exercised in isolation. Each call is an independent unit of work; the
/// domain layer adds no retry policy of its own.
pub trait VerificationRepository: Send + Sync {
    fn worker(&self, id: &WorkerId) -> Result<Option<WorkerProfile>, RepositoryError>;
    fn update_worker(&self, profile: WorkerProfile) -> Result<(), RepositoryError>;

    fn attempts(&self, worker: &WorkerId) -> Result<Vec<TestAttempt>, RepositoryError>;
    fn insert_attempt(&self, attempt: TestAttempt) -> Result<TestAttempt, RepositoryError>;
    fn remove_forced_attempts(&self, worker: &WorkerId) -> Result<usize, RepositoryError>;

    fn references(&self, worker: &WorkerId) -> Result<Vec<Reference>, RepositoryError>;
    fn reference(&self, id: &SubmissionId) -> Result<Option<Reference>, RepositoryError>;
    fn update_reference(&self, reference: Reference) -> Result<(), RepositoryError>;

    fn documents(&self, worker: &WorkerId) -> Result<Vec<IdVerification>, RepositoryError>;
    fn document(&self, id: &SubmissionId) -> Result<Option<IdVerification>, RepositoryError>;
    fn update_document(&self, document: IdVerification) -> Result<(), RepositoryError>;

    fn qualification(&self, id: &SubmissionId) -> Result<Option<Qualification>, RepositoryError>;
    fn update_qualification(&self, qualification: Qualification) -> Result<(), RepositoryError>;

    fn questions(&self, role: &RoleId) -> Result<Vec<Question>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks (e-mail or in-app adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: WorkerNotification) -> Result<(), NotificationError>;
}

/// Simple notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerNotification {
    pub template: String,
    pub worker_id: WorkerId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized verification snapshot exposed to the calling UI.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationView {
    pub worker_id: WorkerId,
    pub public_name: String,
    pub score: u8,
    pub approval_status: &'static str,
    pub suspended: bool,
    pub channels: ChannelStatusView,
    pub breakdown: Vec<ChannelCredit>,
}

/// Labelled channel statuses for progress UI.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelStatusView {
    pub testing: &'static str,
    pub references: &'static str,
    pub id_document: &'static str,
    pub insurance: &'static str,
}

impl From<ChannelStatuses> for ChannelStatusView {
    fn from(statuses: ChannelStatuses) -> Self {
        Self {
            testing: statuses.testing.label(),
            references: statuses.references.label(),
            id_document: statuses.id_document.label(),
            insurance: statuses.insurance.label(),
        }
    }
}

/// Public view of a worker profile after an approval or suspension action.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalView {
    pub worker_id: WorkerId,
    pub approval_status: &'static str,
    pub approval_notes: Option<String>,
    pub approved_by: Option<String>,
    pub suspended: bool,
}

impl ApprovalView {
    pub fn from_profile(profile: &WorkerProfile) -> Self {
        Self {
            worker_id: profile.worker_id.clone(),
            approval_status: profile.approval_status.label(),
            approval_notes: profile.approval_notes.clone(),
            approved_by: profile.approved_by.as_ref().map(|admin| admin.0.clone()),
            suspended: profile.is_suspended,
        }
    }
}
