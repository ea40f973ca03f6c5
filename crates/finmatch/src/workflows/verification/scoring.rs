//! Pure derivations over raw verification records: the 0-100 aggregate score
//! and the richer per-channel display statuses.
//!
//! Every function here evaluates existence, not counts: a worker who fails a
//! test twice and then passes scores the same as one who passes first time.
//! Repeated failures stay visible in the attempt history for admin review.

use serde::{Deserialize, Serialize};

use super::domain::{
    ChannelStatuses, DocumentChannelStatus, DocumentStatus, IdVerification, Reference,
    ReferenceStatus, ReferencesStatus, RoleId, TestAttempt, TestingStatus, VerificationChannel,
};

/// Points granted per satisfied channel. Four channels, 100 max.
pub const CHANNEL_POINTS: u8 = 25;

/// Verified references required before the channel reads as verified.
pub const MIN_VERIFIED_REFERENCES: usize = 2;

/// Discrete contribution to the aggregate score, kept for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelCredit {
    pub channel: VerificationChannel,
    pub points: u8,
    pub earned: bool,
    pub notes: String,
}

/// Aggregate verification score over the four channels.
///
/// Always one of {0, 25, 50, 75, 100}; idempotent and order-independent over
/// its input collections.
pub fn verification_score(
    attempts: &[TestAttempt],
    references: &[Reference],
    documents: &[IdVerification],
) -> u8 {
    score_breakdown(attempts, references, documents)
        .iter()
        .filter(|credit| credit.earned)
        .map(|credit| credit.points)
        .sum()
}

/// Per-channel credit trail behind [`verification_score`].
pub fn score_breakdown(
    attempts: &[TestAttempt],
    references: &[Reference],
    documents: &[IdVerification],
) -> Vec<ChannelCredit> {
    let any_pass = attempts.iter().any(|attempt| attempt.passed);
    let verified_references = references
        .iter()
        .filter(|reference| reference.status == ReferenceStatus::Verified)
        .count();
    let id_verified = any_verified_document(documents, false);
    let insurance_verified = any_verified_document(documents, true);

    vec![
        ChannelCredit {
            channel: VerificationChannel::Testing,
            points: CHANNEL_POINTS,
            earned: any_pass,
            notes: if any_pass {
                "at least one skills test passed".to_string()
            } else {
                "no passing skills test on record".to_string()
            },
        },
        ChannelCredit {
            channel: VerificationChannel::References,
            points: CHANNEL_POINTS,
            earned: verified_references >= 1,
            notes: format!("{verified_references} reference(s) verified"),
        },
        ChannelCredit {
            channel: VerificationChannel::IdDocument,
            points: CHANNEL_POINTS,
            earned: id_verified,
            notes: if id_verified {
                "identity document verified".to_string()
            } else {
                "no verified identity document".to_string()
            },
        },
        ChannelCredit {
            channel: VerificationChannel::Insurance,
            points: CHANNEL_POINTS,
            earned: insurance_verified,
            notes: if insurance_verified {
                "insurance document verified".to_string()
            } else {
                "no verified insurance document".to_string()
            },
        },
    ]
}

/// Per-channel display statuses for progress UI, richer than the binary score.
pub fn channel_statuses(
    declared_roles: &[RoleId],
    attempts: &[TestAttempt],
    references: &[Reference],
    documents: &[IdVerification],
) -> ChannelStatuses {
    ChannelStatuses {
        testing: testing_status(declared_roles, attempts),
        references: references_status(references),
        id_document: document_status(documents, false),
        insurance: document_status(documents, true),
    }
}

/// Testing progress across all declared roles.
///
/// A worker with zero declared roles reads as not started regardless of any
/// stray attempt rows, guarding against orphaned data.
pub fn testing_status(declared_roles: &[RoleId], attempts: &[TestAttempt]) -> TestingStatus {
    if declared_roles.is_empty() {
        return TestingStatus::NotStarted;
    }

    let passed_roles = declared_roles
        .iter()
        .filter(|role| {
            attempts
                .iter()
                .any(|attempt| attempt.passed && attempt.role == **role)
        })
        .count();

    if passed_roles == declared_roles.len() {
        TestingStatus::Passed
    } else if passed_roles > 0 {
        TestingStatus::InProgress
    } else {
        TestingStatus::NotStarted
    }
}

pub fn references_status(references: &[Reference]) -> ReferencesStatus {
    if references.is_empty() {
        return ReferencesStatus::NotStarted;
    }

    let verified = references
        .iter()
        .filter(|reference| reference.status == ReferenceStatus::Verified)
        .count();

    if verified >= MIN_VERIFIED_REFERENCES {
        ReferencesStatus::Verified
    } else {
        ReferencesStatus::Pending
    }
}

/// Status of one document kind. Rejection requires unanimous rejection: a
/// worker with one rejected and one pending document is pending, and a
/// verified document takes priority over any rejected sibling.
pub fn document_status(documents: &[IdVerification], insurance: bool) -> DocumentChannelStatus {
    let mut submitted = 0usize;
    let mut rejected = 0usize;

    for document in documents
        .iter()
        .filter(|document| document.is_insurance == insurance)
    {
        if document.status == DocumentStatus::Verified {
            return DocumentChannelStatus::Verified;
        }
        submitted += 1;
        if document.status == DocumentStatus::Rejected {
            rejected += 1;
        }
    }

    if submitted == 0 {
        DocumentChannelStatus::NotSubmitted
    } else if rejected == submitted {
        DocumentChannelStatus::Rejected
    } else {
        DocumentChannelStatus::Pending
    }
}

fn any_verified_document(documents: &[IdVerification], insurance: bool) -> bool {
    documents.iter().any(|document| {
        document.is_insurance == insurance && document.status == DocumentStatus::Verified
    })
}
