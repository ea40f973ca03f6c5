use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for worker profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

/// Identifier for a declared role, e.g. `bookkeeper` or `payroll_clerk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub String);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for the admin acting on a review or approval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub String);

/// Identifier shared by worker submissions (references, documents, qualifications).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Admin-controlled gate determining whether a worker profile is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Active,
    Declined,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Active => "active",
            ApprovalStatus::Declined => "declined",
        }
    }
}

/// Decision an admin records against a pending (or previously decided) profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Active,
    Declined,
}

impl ApprovalDecision {
    pub const fn status(self) -> ApprovalStatus {
        match self {
            ApprovalDecision::Active => ApprovalStatus::Active,
            ApprovalDecision::Declined => ApprovalStatus::Declined,
        }
    }
}

/// Persisted worker profile as the verification workflow sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub worker_id: WorkerId,
    pub display_name: String,
    pub pseudonym: Option<String>,
    pub uses_pseudonym: bool,
    pub roles: Vec<RoleId>,
    pub approval_status: ApprovalStatus,
    pub approval_notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<AdminId>,
    pub is_suspended: bool,
}

impl WorkerProfile {
    /// Name shown to businesses; workers may list under a pseudonym.
    pub fn public_name(&self) -> &str {
        if self.uses_pseudonym {
            if let Some(pseudonym) = &self.pseudonym {
                return pseudonym;
            }
        }
        &self.display_name
    }
}

/// One graded skills-test sitting for a (worker, role) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAttempt {
    pub worker_id: WorkerId,
    pub role: RoleId,
    pub score: u8,
    pub passed: bool,
    /// True only for attempts injected by `force_pass_all_roles`.
    pub forced: bool,
    pub attempted_at: DateTime<Utc>,
    pub lockout_until: Option<DateTime<Utc>>,
}

/// Review lifecycle for a professional reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStatus {
    Pending,
    Verified,
    Declined,
}

/// Referee contact details plus the admin review trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub submission_id: SubmissionId,
    pub worker_id: WorkerId,
    pub referee_name: String,
    pub referee_email: String,
    pub relationship: String,
    pub status: ReferenceStatus,
    pub admin_notes: Option<String>,
}

/// Review lifecycle for uploaded documents and qualifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

/// An identity or insurance document awaiting (or past) admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdVerification {
    pub submission_id: SubmissionId,
    pub worker_id: WorkerId,
    /// Distinguishes insurance certificates from identity documents.
    pub is_insurance: bool,
    pub status: DocumentStatus,
    pub rejection_reason: Option<String>,
}

/// A declared credential (e.g. ACCA, AAT) reviewed by admins. Qualifications
/// do not feed the verification score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    pub submission_id: SubmissionId,
    pub worker_id: WorkerId,
    pub title: String,
    pub issuing_body: String,
    pub status: DocumentStatus,
    pub rejection_reason: Option<String>,
}

/// The four independent proof categories behind the verification score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationChannel {
    Testing,
    References,
    IdDocument,
    Insurance,
}

impl VerificationChannel {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationChannel::Testing => "testing",
            VerificationChannel::References => "references",
            VerificationChannel::IdDocument => "id_document",
            VerificationChannel::Insurance => "insurance",
        }
    }
}

/// Progress of the skills-testing channel across all declared roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestingStatus {
    NotStarted,
    InProgress,
    Passed,
}

impl TestingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TestingStatus::NotStarted => "not_started",
            TestingStatus::InProgress => "in_progress",
            TestingStatus::Passed => "passed",
        }
    }
}

/// Progress of the references channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencesStatus {
    NotStarted,
    Pending,
    Verified,
}

impl ReferencesStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReferencesStatus::NotStarted => "not_started",
            ReferencesStatus::Pending => "pending",
            ReferencesStatus::Verified => "verified",
        }
    }
}

/// Progress of a document channel (identity or insurance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentChannelStatus {
    NotSubmitted,
    Pending,
    Verified,
    Rejected,
}

impl DocumentChannelStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentChannelStatus::NotSubmitted => "not_submitted",
            DocumentChannelStatus::Pending => "pending",
            DocumentChannelStatus::Verified => "verified",
            DocumentChannelStatus::Rejected => "rejected",
        }
    }
}

/// Per-channel display statuses, derived on demand from the raw records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStatuses {
    pub testing: TestingStatus,
    pub references: ReferencesStatus,
    pub id_document: DocumentChannelStatus,
    pub insurance: DocumentChannelStatus,
}

/// Which record family an admin review targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Reference,
    IdDocument,
    Qualification,
}

impl SubmissionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "reference" => Some(SubmissionKind::Reference),
            "id_document" => Some(SubmissionKind::IdDocument),
            "qualification" => Some(SubmissionKind::Qualification),
            _ => None,
        }
    }
}

/// Admin verdict on a submission under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Verified,
    Rejected,
}

/// One row of the per-role question bank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: QuestionId,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_choice: usize,
}

/// A worker's answer to one question, matched by question id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected_choice: usize,
}
