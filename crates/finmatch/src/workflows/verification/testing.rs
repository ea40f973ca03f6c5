//! Skills-test grading and the per-(worker, role) retake state machine.
//!
//! States progress `NoAttempt -> Attempted-Pass (terminal)` or
//! `NoAttempt -> Attempted-Fail-Locked -> Retakeable -> ...`. A pass is
//! permanent for the role; a fail opens a lockout window during which
//! retakes are refused.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::config::VerificationConfig;
use super::domain::{AnswerSubmission, Question, RoleId, TestAttempt};

/// Whether a worker may sit a test for a role right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptEligibility {
    Eligible,
    AlreadyPassed,
    LockedUntil(DateTime<Utc>),
}

/// Result handed back to the caller after grading an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub score: u8,
    pub passed: bool,
    pub lockout_until: Option<DateTime<Utc>>,
}

/// Gate a new attempt against the worker's prior attempts for the role.
///
/// A passing attempt is terminal regardless of elapsed time. Otherwise the
/// most recent unexpired lockout blocks the retake.
pub fn attempt_eligibility(
    prior_attempts: &[TestAttempt],
    role: &RoleId,
    now: DateTime<Utc>,
) -> AttemptEligibility {
    let mut latest_lockout: Option<DateTime<Utc>> = None;

    for attempt in prior_attempts.iter().filter(|attempt| attempt.role == *role) {
        if attempt.passed {
            return AttemptEligibility::AlreadyPassed;
        }
        if let Some(until) = attempt.lockout_until {
            if until > now && latest_lockout.map_or(true, |current| until > current) {
                latest_lockout = Some(until);
            }
        }
    }

    match latest_lockout {
        Some(until) => AttemptEligibility::LockedUntil(until),
        None => AttemptEligibility::Eligible,
    }
}

/// Grade submitted answers against the role's question bank.
///
/// Score is `round(correct / total * 100)` with half-up rounding, computed in
/// integer arithmetic. Each question counts once: an unanswered question, an
/// unknown question id, or a wrong choice all count as incorrect, and
/// duplicate answers never double-count.
pub fn grade(questions: &[Question], answers: &[AnswerSubmission]) -> Option<u8> {
    let total = questions.len();
    if total == 0 {
        return None;
    }

    let correct = questions
        .iter()
        .filter(|question| {
            answers.iter().any(|answer| {
                answer.question_id == question.question_id
                    && answer.selected_choice == question.correct_choice
            })
        })
        .count();

    // round-half-up of correct / total * 100
    let score = (correct * 200 + total) / (total * 2);
    Some(score as u8)
}

/// Apply the pass/fail policy to a graded score.
///
/// Passing clears any lockout; failing opens a fresh lockout window from the
/// attempt time.
pub fn attempt_outcome(
    score: u8,
    config: &VerificationConfig,
    attempted_at: DateTime<Utc>,
) -> AttemptOutcome {
    let passed = score >= config.pass_threshold;
    let lockout_until = if passed {
        None
    } else {
        Some(attempted_at + Duration::days(config.lockout_days))
    };

    AttemptOutcome {
        score,
        passed,
        lockout_until,
    }
}
