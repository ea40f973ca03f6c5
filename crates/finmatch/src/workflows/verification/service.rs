use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::config::VerificationConfig;
use super::domain::{
    AdminId, AnswerSubmission, ApprovalDecision, ChannelStatuses, DocumentStatus, ReferenceStatus,
    ReviewDecision, RoleId, SubmissionId, SubmissionKind, TestAttempt, WorkerId, WorkerProfile,
};
use super::repository::{
    ApprovalView, NotificationError, NotificationPublisher, RepositoryError,
    VerificationRepository, VerificationView, WorkerNotification,
};
use super::scoring;
use super::testing::{self, AttemptEligibility, AttemptOutcome};

/// Service composing the scoring rules, retake gate, and approval workflow
/// over the repository and notification seams.
pub struct VerificationService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    config: VerificationConfig,
}

impl<R, N> VerificationService<R, N>
where
    R: VerificationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: VerificationConfig) -> Self {
        Self {
            repository,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Grade and record a skills-test sitting for one declared role.
    pub fn submit_test_attempt(
        &self,
        worker_id: &WorkerId,
        role: &RoleId,
        answers: &[AnswerSubmission],
    ) -> Result<AttemptOutcome, VerificationError> {
        self.submit_test_attempt_at(worker_id, role, answers, Utc::now())
    }

    /// [`Self::submit_test_attempt`] with an explicit clock, used by tests
    /// and backfills.
    pub fn submit_test_attempt_at(
        &self,
        worker_id: &WorkerId,
        role: &RoleId,
        answers: &[AnswerSubmission],
        now: DateTime<Utc>,
    ) -> Result<AttemptOutcome, VerificationError> {
        let worker = self.require_worker(worker_id)?;
        if !worker.roles.contains(role) {
            return Err(VerificationError::RoleNotDeclared(role.clone()));
        }

        let prior = self.repository.attempts(worker_id)?;
        match testing::attempt_eligibility(&prior, role, now) {
            AttemptEligibility::AlreadyPassed => return Err(VerificationError::AlreadyPassed),
            AttemptEligibility::LockedUntil(until) => {
                return Err(VerificationError::LockedOut { until })
            }
            AttemptEligibility::Eligible => {}
        }

        let questions = self.repository.questions(role)?;
        let score = testing::grade(&questions, answers)
            .ok_or_else(|| VerificationError::NoQuestionsAvailable { role: role.clone() })?;
        let outcome = testing::attempt_outcome(score, &self.config, now);

        self.repository.insert_attempt(TestAttempt {
            worker_id: worker_id.clone(),
            role: role.clone(),
            score: outcome.score,
            passed: outcome.passed,
            forced: false,
            attempted_at: now,
            lockout_until: outcome.lockout_until,
        })?;

        if outcome.passed {
            let mut details = BTreeMap::new();
            details.insert("role".to_string(), role.0.clone());
            details.insert("score".to_string(), outcome.score.to_string());
            self.notifier.publish(WorkerNotification {
                template: "skills_test_passed".to_string(),
                worker_id: worker_id.clone(),
                details,
            })?;
        }

        info!(
            worker = %worker_id.0,
            role = %role,
            score = outcome.score,
            passed = outcome.passed,
            "skills test attempt recorded"
        );

        Ok(outcome)
    }

    /// Aggregate 0-100 verification score, derived from raw records.
    pub fn verification_score(&self, worker_id: &WorkerId) -> Result<u8, VerificationError> {
        self.require_worker(worker_id)?;
        let attempts = self.repository.attempts(worker_id)?;
        let references = self.repository.references(worker_id)?;
        let documents = self.repository.documents(worker_id)?;
        Ok(scoring::verification_score(
            &attempts,
            &references,
            &documents,
        ))
    }

    /// Per-channel display statuses for progress UI.
    pub fn channel_statuses(
        &self,
        worker_id: &WorkerId,
    ) -> Result<ChannelStatuses, VerificationError> {
        let worker = self.require_worker(worker_id)?;
        let attempts = self.repository.attempts(worker_id)?;
        let references = self.repository.references(worker_id)?;
        let documents = self.repository.documents(worker_id)?;
        Ok(scoring::channel_statuses(
            &worker.roles,
            &attempts,
            &references,
            &documents,
        ))
    }

    /// Score, breakdown, channel statuses, and approval gate in one payload.
    pub fn verification_view(
        &self,
        worker_id: &WorkerId,
    ) -> Result<VerificationView, VerificationError> {
        let worker = self.require_worker(worker_id)?;
        let attempts = self.repository.attempts(worker_id)?;
        let references = self.repository.references(worker_id)?;
        let documents = self.repository.documents(worker_id)?;

        let breakdown = scoring::score_breakdown(&attempts, &references, &documents);
        let score = breakdown
            .iter()
            .filter(|credit| credit.earned)
            .map(|credit| credit.points)
            .sum();
        let channels =
            scoring::channel_statuses(&worker.roles, &attempts, &references, &documents);

        Ok(VerificationView {
            worker_id: worker.worker_id.clone(),
            public_name: worker.public_name().to_string(),
            score,
            approval_status: worker.approval_status.label(),
            suspended: worker.is_suspended,
            channels: channels.into(),
            breakdown,
        })
    }

    /// Record an admin approval decision.
    ///
    /// The verification score is never consulted: it is advisory input to a
    /// human decision, not an automated gate. A later admin action may
    /// re-decide either way.
    pub fn decide_approval(
        &self,
        worker_id: &WorkerId,
        decision: ApprovalDecision,
        notes: Option<String>,
        admin: &AdminId,
    ) -> Result<ApprovalView, VerificationError> {
        self.decide_approval_at(worker_id, decision, notes, admin, Utc::now())
    }

    pub fn decide_approval_at(
        &self,
        worker_id: &WorkerId,
        decision: ApprovalDecision,
        notes: Option<String>,
        admin: &AdminId,
        now: DateTime<Utc>,
    ) -> Result<ApprovalView, VerificationError> {
        let mut worker = self.require_worker(worker_id)?;
        worker.approval_status = decision.status();
        worker.approval_notes = notes;
        worker.approved_at = Some(now);
        worker.approved_by = Some(admin.clone());
        self.repository.update_worker(worker.clone())?;

        let template = match decision {
            ApprovalDecision::Active => "worker_approved",
            ApprovalDecision::Declined => "worker_declined",
        };
        let mut details = BTreeMap::new();
        details.insert("decided_by".to_string(), admin.0.clone());
        self.notifier.publish(WorkerNotification {
            template: template.to_string(),
            worker_id: worker_id.clone(),
            details,
        })?;

        info!(
            worker = %worker_id.0,
            status = worker.approval_status.label(),
            admin = %admin.0,
            "approval decision recorded"
        );

        Ok(ApprovalView::from_profile(&worker))
    }

    /// Admin review of a reference, document, or qualification submission.
    /// Rejection requires a non-empty reason.
    pub fn review_submission(
        &self,
        kind: SubmissionKind,
        submission_id: &SubmissionId,
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> Result<(), VerificationError> {
        let reason = match decision {
            ReviewDecision::Rejected => Some(
                reason
                    .filter(|text| !text.trim().is_empty())
                    .ok_or(VerificationError::MissingRejectionReason)?,
            ),
            ReviewDecision::Verified => None,
        };

        match kind {
            SubmissionKind::Reference => {
                let mut reference = self
                    .repository
                    .reference(submission_id)?
                    .ok_or(RepositoryError::NotFound)?;
                reference.status = match decision {
                    ReviewDecision::Verified => ReferenceStatus::Verified,
                    ReviewDecision::Rejected => ReferenceStatus::Declined,
                };
                reference.admin_notes = reason;
                self.repository.update_reference(reference)?;
            }
            SubmissionKind::IdDocument => {
                let mut document = self
                    .repository
                    .document(submission_id)?
                    .ok_or(RepositoryError::NotFound)?;
                document.status = match decision {
                    ReviewDecision::Verified => DocumentStatus::Verified,
                    ReviewDecision::Rejected => DocumentStatus::Rejected,
                };
                document.rejection_reason = reason;
                self.repository.update_document(document)?;
            }
            SubmissionKind::Qualification => {
                let mut qualification = self
                    .repository
                    .qualification(submission_id)?
                    .ok_or(RepositoryError::NotFound)?;
                qualification.status = match decision {
                    ReviewDecision::Verified => DocumentStatus::Verified,
                    ReviewDecision::Rejected => DocumentStatus::Rejected,
                };
                qualification.rejection_reason = reason;
                self.repository.update_qualification(qualification)?;
            }
        }

        Ok(())
    }

    /// Fixture operation: insert a forced passing attempt for every declared
    /// role that lacks a pass. Replaces the hidden demo-mode toggle with an
    /// explicit, revocable administrative action.
    pub fn force_pass_all_roles(
        &self,
        worker_id: &WorkerId,
    ) -> Result<usize, VerificationError> {
        self.force_pass_all_roles_at(worker_id, Utc::now())
    }

    pub fn force_pass_all_roles_at(
        &self,
        worker_id: &WorkerId,
        now: DateTime<Utc>,
    ) -> Result<usize, VerificationError> {
        let worker = self.require_worker(worker_id)?;
        let attempts = self.repository.attempts(worker_id)?;

        let mut inserted = 0usize;
        for role in &worker.roles {
            let already_passed = attempts
                .iter()
                .any(|attempt| attempt.passed && attempt.role == *role);
            if already_passed {
                continue;
            }
            self.repository.insert_attempt(TestAttempt {
                worker_id: worker_id.clone(),
                role: role.clone(),
                score: 100,
                passed: true,
                forced: true,
                attempted_at: now,
                lockout_until: None,
            })?;
            inserted += 1;
        }

        info!(worker = %worker_id.0, inserted, "forced passes applied");
        Ok(inserted)
    }

    /// Fixture operation: remove every forced attempt for the worker,
    /// returning how many were removed.
    pub fn revoke_forced_passes(&self, worker_id: &WorkerId) -> Result<usize, VerificationError> {
        self.require_worker(worker_id)?;
        let removed = self.repository.remove_forced_attempts(worker_id)?;
        info!(worker = %worker_id.0, removed, "forced passes revoked");
        Ok(removed)
    }

    /// Suspension is the post-approval revocation path and never touches the
    /// approval fields.
    pub fn set_suspended(
        &self,
        worker_id: &WorkerId,
        suspended: bool,
    ) -> Result<ApprovalView, VerificationError> {
        let mut worker = self.require_worker(worker_id)?;
        worker.is_suspended = suspended;
        self.repository.update_worker(worker.clone())?;
        info!(worker = %worker_id.0, suspended, "suspension updated");
        Ok(ApprovalView::from_profile(&worker))
    }

    fn require_worker(&self, worker_id: &WorkerId) -> Result<WorkerProfile, VerificationError> {
        Ok(self
            .repository
            .worker(worker_id)?
            .ok_or(RepositoryError::NotFound)?)
    }
}

/// Error raised by the verification service.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("skills test retake locked until {until}")]
    LockedOut { until: DateTime<Utc> },
    #[error("skills test already passed for this role")]
    AlreadyPassed,
    #[error("no questions available for role {role}")]
    NoQuestionsAvailable { role: RoleId },
    #[error("a rejection reason is required")]
    MissingRejectionReason,
    #[error("role {0} is not declared on the worker profile")]
    RoleNotDeclared(RoleId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
