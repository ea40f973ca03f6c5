use crate::infra::{
    demo_worker_id, seed_demo_records, InMemoryNotificationPublisher,
    InMemoryVerificationRepository,
};
use clap::Args;
use finmatch::error::AppError;
use finmatch::workflows::verification::{
    AdminId, AnswerSubmission, ApprovalDecision, Question, ReviewDecision, RoleId, SubmissionId,
    SubmissionKind, VerificationConfig, VerificationError, VerificationRepository,
    VerificationService, VerificationView,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the pass threshold applied to graded attempts (0-100).
    #[arg(long)]
    pub(crate) pass_threshold: Option<u8>,
    /// Override the retake lockout length in days.
    #[arg(long)]
    pub(crate) lockout_days: Option<i64>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = VerificationConfig::default();
    if let Some(threshold) = args.pass_threshold {
        config.pass_threshold = threshold;
    }
    if let Some(days) = args.lockout_days {
        config.lockout_days = days;
    }

    let repository = Arc::new(InMemoryVerificationRepository::default());
    seed_demo_records(&repository);
    let notifier = Arc::new(InMemoryNotificationPublisher::default());
    let service = VerificationService::new(repository.clone(), notifier.clone(), config);

    let worker = demo_worker_id();
    let bookkeeper = RoleId("bookkeeper".to_string());

    println!("Worker verification walkthrough");
    println!("  pass threshold: {}", config.pass_threshold);
    println!("  lockout days:   {}", config.lockout_days);

    render_view("Initial state", &service.verification_view(&worker)?);

    let questions = repository
        .questions(&bookkeeper)
        .map_err(VerificationError::Repository)?;
    let outcome = service.submit_test_attempt(&worker, &bookkeeper, &answers(&questions, 6))?;
    println!(
        "\nFirst sitting for '{}': scored {} ({})",
        bookkeeper.0,
        outcome.score,
        if outcome.passed { "passed" } else { "failed" }
    );
    if let Some(until) = outcome.lockout_until {
        println!("  retake locked until {until}");
    }

    match service.submit_test_attempt(&worker, &bookkeeper, &answers(&questions, 10)) {
        Err(VerificationError::LockedOut { until }) => {
            println!("  immediate retake refused, locked until {until}");
        }
        Ok(_) => println!("  immediate retake unexpectedly accepted"),
        Err(err) => return Err(err.into()),
    }

    println!("\nAdmin review queue");
    for id in ["ref-1", "ref-2"] {
        service.review_submission(
            SubmissionKind::Reference,
            &SubmissionId(id.to_string()),
            ReviewDecision::Verified,
            None,
        )?;
        println!("  reference {id}: verified");
    }
    service.review_submission(
        SubmissionKind::IdDocument,
        &SubmissionId("doc-identity".to_string()),
        ReviewDecision::Verified,
        None,
    )?;
    println!("  identity document: verified");
    service.review_submission(
        SubmissionKind::IdDocument,
        &SubmissionId("doc-insurance".to_string()),
        ReviewDecision::Rejected,
        Some("policy document has expired".to_string()),
    )?;
    println!("  insurance document: rejected (policy document has expired)");
    service.review_submission(
        SubmissionKind::Qualification,
        &SubmissionId("qual-1".to_string()),
        ReviewDecision::Verified,
        None,
    )?;
    println!("  qualification: verified");

    let inserted = service.force_pass_all_roles(&worker)?;
    println!("\nForced passes applied for {inserted} outstanding role(s)");
    render_view("After review and forced passes", &service.verification_view(&worker)?);

    let admin = AdminId("admin-demo".to_string());
    let approval = service.decide_approval(
        &worker,
        ApprovalDecision::Active,
        Some("cleared during walkthrough".to_string()),
        &admin,
    )?;
    println!(
        "\nApproval decision: {} (by {})",
        approval.approval_status,
        approval.approved_by.as_deref().unwrap_or("unknown")
    );

    let removed = service.revoke_forced_passes(&worker)?;
    println!("\nForced passes revoked ({removed} removed)");
    render_view("After revocation", &service.verification_view(&worker)?);

    println!("\nNotifications dispatched:");
    for event in notifier.events() {
        println!("  {} -> {}", event.template, event.worker_id.0);
    }

    Ok(())
}

fn render_view(heading: &str, view: &VerificationView) {
    println!("\n{heading}");
    println!("  worker:   {} ({})", view.public_name, view.worker_id.0);
    println!("  score:    {}/100", view.score);
    println!("  approval: {}", view.approval_status);
    println!("  channels: testing={} references={} id_document={} insurance={}",
        view.channels.testing,
        view.channels.references,
        view.channels.id_document,
        view.channels.insurance,
    );
    for credit in &view.breakdown {
        let marker = if credit.earned { "x" } else { " " };
        println!("    [{marker}] {:?}: {} pts", credit.channel, credit.points);
    }
}

fn answers(questions: &[Question], correct: usize) -> Vec<AnswerSubmission> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| AnswerSubmission {
            question_id: question.question_id.clone(),
            selected_choice: if index < correct {
                question.correct_choice
            } else {
                (question.correct_choice + 1) % question.choices.len()
            },
        })
        .collect()
}
