use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::verification::config::VerificationConfig;
use crate::workflows::verification::domain::{
    AnswerSubmission, ApprovalStatus, DocumentStatus, IdVerification, Qualification, Question,
    QuestionId, Reference, ReferenceStatus, RoleId, SubmissionId, TestAttempt, WorkerId,
    WorkerProfile,
};
use crate::workflows::verification::repository::{
    NotificationError, NotificationPublisher, RepositoryError, VerificationRepository,
    WorkerNotification,
};
use crate::workflows::verification::{verification_router, VerificationService};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid timestamp")
}

pub(super) fn worker_id() -> WorkerId {
    WorkerId("worker-001".to_string())
}

pub(super) fn role(name: &str) -> RoleId {
    RoleId(name.to_string())
}

pub(super) fn worker(roles: &[&str]) -> WorkerProfile {
    WorkerProfile {
        worker_id: worker_id(),
        display_name: "Priya Shah".to_string(),
        pseudonym: Some("PS Finance".to_string()),
        uses_pseudonym: false,
        roles: roles.iter().map(|name| role(name)).collect(),
        approval_status: ApprovalStatus::Pending,
        approval_notes: None,
        approved_at: None,
        approved_by: None,
        is_suspended: false,
    }
}

pub(super) fn passing_attempt(role_name: &str) -> TestAttempt {
    TestAttempt {
        worker_id: worker_id(),
        role: role(role_name),
        score: 85,
        passed: true,
        forced: false,
        attempted_at: fixed_now(),
        lockout_until: None,
    }
}

pub(super) fn failing_attempt(role_name: &str, lockout_until: DateTime<Utc>) -> TestAttempt {
    TestAttempt {
        worker_id: worker_id(),
        role: role(role_name),
        score: 60,
        passed: false,
        forced: false,
        attempted_at: fixed_now(),
        lockout_until: Some(lockout_until),
    }
}

pub(super) fn reference(id: &str, status: ReferenceStatus) -> Reference {
    Reference {
        submission_id: SubmissionId(id.to_string()),
        worker_id: worker_id(),
        referee_name: "Jordan Miles".to_string(),
        referee_email: "jordan@example.com".to_string(),
        relationship: "former manager".to_string(),
        status,
        admin_notes: None,
    }
}

pub(super) fn document(id: &str, insurance: bool, status: DocumentStatus) -> IdVerification {
    IdVerification {
        submission_id: SubmissionId(id.to_string()),
        worker_id: worker_id(),
        is_insurance: insurance,
        status,
        rejection_reason: None,
    }
}

pub(super) fn qualification(id: &str) -> Qualification {
    Qualification {
        submission_id: SubmissionId(id.to_string()),
        worker_id: worker_id(),
        title: "AAT Level 3".to_string(),
        issuing_body: "AAT".to_string(),
        status: DocumentStatus::Pending,
        rejection_reason: None,
    }
}

pub(super) fn question_bank(count: usize) -> Vec<Question> {
    (0..count)
        .map(|index| Question {
            question_id: QuestionId(format!("q-{index:02}")),
            prompt: format!("Question {index}"),
            choices: vec![
                "Correct".to_string(),
                "Plausible".to_string(),
                "Wrong".to_string(),
            ],
            correct_choice: 0,
        })
        .collect()
}

/// First `correct` answers select the right choice, the rest a wrong one.
pub(super) fn answers(questions: &[Question], correct: usize) -> Vec<AnswerSubmission> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| AnswerSubmission {
            question_id: question.question_id.clone(),
            selected_choice: if index < correct { 0 } else { 1 },
        })
        .collect()
}

#[derive(Default)]
struct MemoryState {
    workers: HashMap<WorkerId, WorkerProfile>,
    attempts: Vec<TestAttempt>,
    references: HashMap<SubmissionId, Reference>,
    documents: HashMap<SubmissionId, IdVerification>,
    qualifications: HashMap<SubmissionId, Qualification>,
    questions: HashMap<RoleId, Vec<Question>>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(super) fn seed_worker(&self, profile: WorkerProfile) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.workers.insert(profile.worker_id.clone(), profile);
    }

    pub(super) fn seed_attempt(&self, attempt: TestAttempt) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.attempts.push(attempt);
    }

    pub(super) fn seed_reference(&self, reference: Reference) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .references
            .insert(reference.submission_id.clone(), reference);
    }

    pub(super) fn seed_document(&self, document: IdVerification) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .documents
            .insert(document.submission_id.clone(), document);
    }

    pub(super) fn seed_qualification(&self, qualification: Qualification) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .qualifications
            .insert(qualification.submission_id.clone(), qualification);
    }

    pub(super) fn seed_questions(&self, role: RoleId, questions: Vec<Question>) {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.questions.insert(role, questions);
    }

    pub(super) fn stored_attempts(&self, worker: &WorkerId) -> Vec<TestAttempt> {
        let state = self.state.lock().expect("repository mutex poisoned");
        state
            .attempts
            .iter()
            .filter(|attempt| attempt.worker_id == *worker)
            .cloned()
            .collect()
    }

    pub(super) fn stored_worker(&self, worker: &WorkerId) -> Option<WorkerProfile> {
        let state = self.state.lock().expect("repository mutex poisoned");
        state.workers.get(worker).cloned()
    }

    pub(super) fn stored_reference(&self, id: &SubmissionId) -> Option<Reference> {
        let state = self.state.lock().expect("repository mutex poisoned");
        state.references.get(id).cloned()
    }

    pub(super) fn stored_document(&self, id: &SubmissionId) -> Option<IdVerification> {
        let state = self.state.lock().expect("repository mutex poisoned");
        state.documents.get(id).cloned()
    }

    pub(super) fn stored_qualification(&self, id: &SubmissionId) -> Option<Qualification> {
        let state = self.state.lock().expect("repository mutex poisoned");
        state.qualifications.get(id).cloned()
    }
}

impl VerificationRepository for MemoryRepository {
    fn worker(&self, id: &WorkerId) -> Result<Option<WorkerProfile>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.workers.get(id).cloned())
    }

    fn update_worker(&self, profile: WorkerProfile) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        if !state.workers.contains_key(&profile.worker_id) {
            return Err(RepositoryError::NotFound);
        }
        state.workers.insert(profile.worker_id.clone(), profile);
        Ok(())
    }

    fn attempts(&self, worker: &WorkerId) -> Result<Vec<TestAttempt>, RepositoryError> {
        Ok(self.stored_attempts(worker))
    }

    fn insert_attempt(&self, attempt: TestAttempt) -> Result<TestAttempt, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.attempts.push(attempt.clone());
        Ok(attempt)
    }

    fn remove_forced_attempts(&self, worker: &WorkerId) -> Result<usize, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        let before = state.attempts.len();
        state
            .attempts
            .retain(|attempt| !(attempt.forced && attempt.worker_id == *worker));
        Ok(before - state.attempts.len())
    }

    fn references(&self, worker: &WorkerId) -> Result<Vec<Reference>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state
            .references
            .values()
            .filter(|reference| reference.worker_id == *worker)
            .cloned()
            .collect())
    }

    fn reference(&self, id: &SubmissionId) -> Result<Option<Reference>, RepositoryError> {
        Ok(self.stored_reference(id))
    }

    fn update_reference(&self, reference: Reference) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .references
            .insert(reference.submission_id.clone(), reference);
        Ok(())
    }

    fn documents(&self, worker: &WorkerId) -> Result<Vec<IdVerification>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state
            .documents
            .values()
            .filter(|document| document.worker_id == *worker)
            .cloned()
            .collect())
    }

    fn document(&self, id: &SubmissionId) -> Result<Option<IdVerification>, RepositoryError> {
        Ok(self.stored_document(id))
    }

    fn update_document(&self, document: IdVerification) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .documents
            .insert(document.submission_id.clone(), document);
        Ok(())
    }

    fn qualification(&self, id: &SubmissionId) -> Result<Option<Qualification>, RepositoryError> {
        Ok(self.stored_qualification(id))
    }

    fn update_qualification(&self, qualification: Qualification) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .qualifications
            .insert(qualification.submission_id.clone(), qualification);
        Ok(())
    }

    fn questions(&self, role: &RoleId) -> Result<Vec<Question>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.questions.get(role).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<WorkerNotification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<WorkerNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notification: WorkerNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) fn build_service() -> (
    VerificationService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = VerificationService::new(
        repository.clone(),
        notifier.clone(),
        VerificationConfig::default(),
    );
    (service, repository, notifier)
}

pub(super) fn build_router(
    service: VerificationService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    verification_router(Arc::new(service))
}
