//! Refined candidate domain model.
//!
//! A refined candidate is the judge's distilled, scored version of exactly one
//! feedback event. Candidates are append-only: the only mutation ever applied
//! after creation is the pending -> implemented transition performed by the
//! batch evolution engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acceptance threshold for the judge's quality score. Scores below this are
/// rejected at creation time.
pub const ACCEPTANCE_THRESHOLD: u8 = 70;

/// Fallback rejection reason when the judge rejects without giving one.
pub const DEFAULT_REJECTION_REASON: &str = "Low Quality Score";

/// Status of a refined candidate.
///
/// Transitions: `Pending -> Implemented` (batch evolution). `Rejected` is
/// terminal and only ever assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Rejected,
    Implemented,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Implemented => "implemented",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            "implemented" => Some(Self::Implemented),
            _ => None,
        }
    }

    /// Rejected and Implemented are terminal; a candidate never leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Implemented)
    }
}

/// A scored, emotion-stripped instruction derived from one feedback event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedCandidate {
    pub id: Uuid,
    pub source_feedback_id: Uuid,
    pub refined_text: String,
    /// Judge quality score in [0, 100].
    pub quality_score: u8,
    pub status: CandidateStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RefinedCandidate {
    /// Build a candidate from a judge verdict, applying the acceptance
    /// threshold. Below-threshold candidates are created terminal-rejected
    /// with a populated reason.
    pub fn from_verdict(
        source_feedback_id: Uuid,
        refined_text: String,
        quality_score: u8,
        rejection_reason: Option<String>,
    ) -> Self {
        let accepted = quality_score >= ACCEPTANCE_THRESHOLD;
        Self {
            id: Uuid::new_v4(),
            source_feedback_id,
            refined_text,
            quality_score,
            status: if accepted {
                CandidateStatus::Pending
            } else {
                CandidateStatus::Rejected
            },
            rejection_reason: if accepted {
                None
            } else {
                Some(rejection_reason.unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string()))
            },
            created_at: Utc::now(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == CandidateStatus::Pending
    }
}
