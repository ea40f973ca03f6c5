//! Worker verification workflow: skills testing, reference and document
//! review, channel-based scoring, and profile approval.
//!
//! The scoring and grading rules live in pure modules (`scoring`, `testing`)
//! so they can be tested without storage; `VerificationService` composes them
//! over the repository and notification seams, and `router` exposes the
//! workflow over HTTP.

pub mod config;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod testing;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use domain::{
    AdminId, AnswerSubmission, ApprovalDecision, ApprovalStatus, ChannelStatuses,
    DocumentChannelStatus, DocumentStatus, IdVerification, Qualification, Question, QuestionId,
    Reference, ReferenceStatus, ReferencesStatus, ReviewDecision, RoleId, SubmissionId,
    SubmissionKind, TestAttempt, TestingStatus, VerificationChannel, WorkerId, WorkerProfile,
};
pub use repository::{
    ApprovalView, ChannelStatusView, NotificationError, NotificationPublisher, RepositoryError,
    VerificationRepository, VerificationView, WorkerNotification,
};
pub use router::verification_router;
pub use scoring::{ChannelCredit, CHANNEL_POINTS, MIN_VERIFIED_REFERENCES};
pub use service::{VerificationError, VerificationService};
pub use testing::{AttemptEligibility, AttemptOutcome};
