use chrono::Duration;

use super::common::*;
use crate::workflows::verification::config::VerificationConfig;
use crate::workflows::verification::domain::AnswerSubmission;
use crate::workflows::verification::testing::{
    attempt_eligibility, attempt_outcome, grade, AttemptEligibility,
};

#[test]
fn grade_rounds_half_up() {
    let questions = question_bank(10);
    assert_eq!(grade(&questions, &answers(&questions, 7)), Some(70));
    assert_eq!(grade(&questions, &answers(&questions, 8)), Some(80));

    // 1/8 = 12.5 and 3/8 = 37.5 resolve upward
    let questions = question_bank(8);
    assert_eq!(grade(&questions, &answers(&questions, 1)), Some(13));
    assert_eq!(grade(&questions, &answers(&questions, 3)), Some(38));
}

#[test]
fn grade_with_no_questions_is_an_error_not_a_score() {
    assert_eq!(grade(&[], &[]), None);
}

#[test]
fn duplicate_answers_never_double_count() {
    let questions = question_bank(2);
    let mut submitted = answers(&questions, 1);
    submitted.push(submitted[0].clone());

    assert_eq!(grade(&questions, &submitted), Some(50));
}

#[test]
fn unknown_question_ids_count_as_incorrect() {
    let questions = question_bank(4);
    let submitted = vec![AnswerSubmission {
        question_id: crate::workflows::verification::domain::QuestionId("q-99".to_string()),
        selected_choice: 0,
    }];

    assert_eq!(grade(&questions, &submitted), Some(0));
}

#[test]
fn unanswered_questions_count_as_incorrect() {
    let questions = question_bank(4);
    let submitted = answers(&questions, 2)[..2].to_vec();

    assert_eq!(grade(&questions, &submitted), Some(50));
}

#[test]
fn passing_is_terminal_for_the_role() {
    let attempts = vec![passing_attempt("bookkeeper")];
    let much_later = fixed_now() + Duration::days(365);

    assert_eq!(
        attempt_eligibility(&attempts, &role("bookkeeper"), much_later),
        AttemptEligibility::AlreadyPassed
    );
}

#[test]
fn lockout_blocks_until_expiry_then_releases() {
    let until = fixed_now() + Duration::days(30);
    let attempts = vec![failing_attempt("bookkeeper", until)];

    assert_eq!(
        attempt_eligibility(&attempts, &role("bookkeeper"), until - Duration::seconds(1)),
        AttemptEligibility::LockedUntil(until)
    );
    assert_eq!(
        attempt_eligibility(&attempts, &role("bookkeeper"), until),
        AttemptEligibility::Eligible
    );
}

#[test]
fn lockout_applies_per_role() {
    let until = fixed_now() + Duration::days(30);
    let attempts = vec![failing_attempt("bookkeeper", until)];

    assert_eq!(
        attempt_eligibility(&attempts, &role("payroll_clerk"), fixed_now()),
        AttemptEligibility::Eligible
    );
}

#[test]
fn renewed_lockout_uses_the_latest_window() {
    let first = fixed_now() + Duration::days(30);
    let second = fixed_now() + Duration::days(45);
    let attempts = vec![
        failing_attempt("bookkeeper", first),
        failing_attempt("bookkeeper", second),
    ];

    assert_eq!(
        attempt_eligibility(&attempts, &role("bookkeeper"), first + Duration::days(1)),
        AttemptEligibility::LockedUntil(second)
    );
}

#[test]
fn outcome_applies_threshold_and_lockout_policy() {
    let config = VerificationConfig::default();

    let pass = attempt_outcome(80, &config, fixed_now());
    assert!(pass.passed);
    assert_eq!(pass.lockout_until, None);

    let fail = attempt_outcome(79, &config, fixed_now());
    assert!(!fail.passed);
    assert_eq!(fail.lockout_until, Some(fixed_now() + Duration::days(30)));
}

#[test]
fn outcome_respects_configured_policy() {
    let config = VerificationConfig {
        pass_threshold: 60,
        lockout_days: 7,
    };

    assert!(attempt_outcome(60, &config, fixed_now()).passed);
    let fail = attempt_outcome(59, &config, fixed_now());
    assert_eq!(fail.lockout_until, Some(fixed_now() + Duration::days(7)));
}
