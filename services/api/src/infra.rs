use finmatch::workflows::verification::{
    ApprovalStatus, DocumentStatus, IdVerification, NotificationError, NotificationPublisher,
    Qualification, Question, QuestionId, Reference, ReferenceStatus, RepositoryError, RoleId,
    SubmissionId, TestAttempt, VerificationRepository, WorkerId, WorkerNotification, WorkerProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct VerificationStore {
    workers: HashMap<WorkerId, WorkerProfile>,
    attempts: Vec<TestAttempt>,
    references: HashMap<SubmissionId, Reference>,
    documents: HashMap<SubmissionId, IdVerification>,
    qualifications: HashMap<SubmissionId, Qualification>,
    questions: HashMap<RoleId, Vec<Question>>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryVerificationRepository {
    store: Arc<Mutex<VerificationStore>>,
}

impl VerificationRepository for InMemoryVerificationRepository {
    fn worker(&self, id: &WorkerId) -> Result<Option<WorkerProfile>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.workers.get(id).cloned())
    }

    fn update_worker(&self, profile: WorkerProfile) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.workers.contains_key(&profile.worker_id) {
            guard.workers.insert(profile.worker_id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn attempts(&self, worker: &WorkerId) -> Result<Vec<TestAttempt>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .attempts
            .iter()
            .filter(|attempt| attempt.worker_id == *worker)
            .cloned()
            .collect())
    }

    fn insert_attempt(&self, attempt: TestAttempt) -> Result<TestAttempt, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard.attempts.push(attempt.clone());
        Ok(attempt)
    }

    fn remove_forced_attempts(&self, worker: &WorkerId) -> Result<usize, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        let before = guard.attempts.len();
        guard
            .attempts
            .retain(|attempt| !(attempt.forced && attempt.worker_id == *worker));
        Ok(before - guard.attempts.len())
    }

    fn references(&self, worker: &WorkerId) -> Result<Vec<Reference>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .references
            .values()
            .filter(|reference| reference.worker_id == *worker)
            .cloned()
            .collect())
    }

    fn reference(&self, id: &SubmissionId) -> Result<Option<Reference>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.references.get(id).cloned())
    }

    fn update_reference(&self, reference: Reference) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard
            .references
            .insert(reference.submission_id.clone(), reference);
        Ok(())
    }

    fn documents(&self, worker: &WorkerId) -> Result<Vec<IdVerification>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard
            .documents
            .values()
            .filter(|document| document.worker_id == *worker)
            .cloned()
            .collect())
    }

    fn document(&self, id: &SubmissionId) -> Result<Option<IdVerification>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.documents.get(id).cloned())
    }

    fn update_document(&self, document: IdVerification) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard
            .documents
            .insert(document.submission_id.clone(), document);
        Ok(())
    }

    fn qualification(&self, id: &SubmissionId) -> Result<Option<Qualification>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.qualifications.get(id).cloned())
    }

    fn update_qualification(&self, qualification: Qualification) -> Result<(), RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        guard
            .qualifications
            .insert(qualification.submission_id.clone(), qualification);
        Ok(())
    }

    fn questions(&self, role: &RoleId) -> Result<Vec<Question>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.questions.get(role).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<WorkerNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: WorkerNotification) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<WorkerNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn demo_worker_id() -> WorkerId {
    WorkerId("worker-demo".to_string())
}

/// Seed the repository with one pending worker, pending submissions, and a
/// question bank per declared role so the service answers real requests out
/// of the box.
pub(crate) fn seed_demo_records(repository: &InMemoryVerificationRepository) {
    let mut guard = repository.store.lock().expect("repository mutex poisoned");

    let worker = WorkerProfile {
        worker_id: demo_worker_id(),
        display_name: "Priya Shah".to_string(),
        pseudonym: None,
        uses_pseudonym: false,
        roles: vec![
            RoleId("bookkeeper".to_string()),
            RoleId("payroll_clerk".to_string()),
        ],
        approval_status: ApprovalStatus::Pending,
        approval_notes: None,
        approved_at: None,
        approved_by: None,
        is_suspended: false,
    };

    for role in &worker.roles {
        guard
            .questions
            .insert(role.clone(), question_bank(role, 10));
    }
    guard.workers.insert(worker.worker_id.clone(), worker);

    for (id, name, email) in [
        ("ref-1", "Dana Whitfield", "dana@example.com"),
        ("ref-2", "Marcus Bell", "marcus@example.com"),
    ] {
        let reference = Reference {
            submission_id: SubmissionId(id.to_string()),
            worker_id: demo_worker_id(),
            referee_name: name.to_string(),
            referee_email: email.to_string(),
            relationship: "former client".to_string(),
            status: ReferenceStatus::Pending,
            admin_notes: None,
        };
        guard
            .references
            .insert(reference.submission_id.clone(), reference);
    }

    let id_document = IdVerification {
        submission_id: SubmissionId("doc-identity".to_string()),
        worker_id: demo_worker_id(),
        is_insurance: false,
        status: DocumentStatus::Pending,
        rejection_reason: None,
    };
    guard
        .documents
        .insert(id_document.submission_id.clone(), id_document);

    let insurance = IdVerification {
        submission_id: SubmissionId("doc-insurance".to_string()),
        worker_id: demo_worker_id(),
        is_insurance: true,
        status: DocumentStatus::Pending,
        rejection_reason: None,
    };
    guard
        .documents
        .insert(insurance.submission_id.clone(), insurance);

    let qualification = Qualification {
        submission_id: SubmissionId("qual-1".to_string()),
        worker_id: demo_worker_id(),
        title: "AAT Level 3 Diploma in Accounting".to_string(),
        issuing_body: "AAT".to_string(),
        status: DocumentStatus::Pending,
        rejection_reason: None,
    };
    guard
        .qualifications
        .insert(qualification.submission_id.clone(), qualification);
}

fn question_bank(role: &RoleId, count: usize) -> Vec<Question> {
    (0..count)
        .map(|index| Question {
            question_id: QuestionId(format!("{}-q{index:02}", role.0)),
            prompt: format!("Scenario question {index} for {}", role.0),
            choices: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_choice: index % 4,
        })
        .collect()
}
