use serde::{Deserialize, Serialize};

/// Policy dials for the skills-testing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Minimum score (0-100) counted as a pass.
    pub pass_threshold: u8,
    /// Retake cooldown applied after a failed attempt.
    pub lockout_days: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 80,
            lockout_days: 30,
        }
    }
}
