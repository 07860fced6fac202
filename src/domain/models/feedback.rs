//! Feedback domain model.
//!
//! A feedback event is the raw, immutable record of what a user said about a
//! generation. Everything downstream (refined candidates, voice rules, prompt
//! versions) is derived data; the event itself is never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentiment of a feedback event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// Raw user feedback on a generation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Optional link to the rewrite the feedback refers to.
    pub rewrite_id: Option<Uuid>,
    pub text: String,
    pub sentiment: Sentiment,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn new(user_id: Uuid, rewrite_id: Option<Uuid>, text: String, sentiment: Sentiment) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            rewrite_id,
            text,
            sentiment,
            created_at: Utc::now(),
        }
    }
}

/// Input payload for the feedback-submission boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub user_id: Uuid,
    pub rewrite_id: Option<Uuid>,
    pub text: String,
    /// Defaults to negative when omitted: unqualified feedback is treated as
    /// a complaint, matching how users actually use the feedback box.
    pub is_positive: Option<bool>,
}

impl NewFeedback {
    pub fn sentiment(&self) -> Sentiment {
        match self.is_positive {
            Some(true) => Sentiment::Positive,
            _ => Sentiment::Negative,
        }
    }
}

/// Result of the feedback-submission boundary operation.
///
/// `accepted` reflects the internal candidate status; `message` is the
/// user-visible text and stays a generic thank-you even for internal
/// rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub accepted: bool,
    pub message: String,
}

/// Which pipeline(s) a feedback event is routed through.
///
/// Negative feedback tied to a voice-linked rewrite gets the low-latency
/// per-voice path in addition to the global batch; everything else is
/// global-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRoute {
    PerVoice,
    Global,
    Both,
}

impl FeedbackRoute {
    pub fn includes_voice(&self) -> bool {
        matches!(self, Self::PerVoice | Self::Both)
    }

    pub fn includes_global(&self) -> bool {
        matches!(self, Self::Global | Self::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_round_trip() {
        assert_eq!(Sentiment::from_str("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_str("Negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_str("meh"), None);
        assert_eq!(Sentiment::Negative.as_str(), "negative");
    }

    #[test]
    fn test_new_feedback_defaults_to_negative() {
        let fb = NewFeedback {
            user_id: Uuid::new_v4(),
            rewrite_id: None,
            text: "too many emojis".to_string(),
            is_positive: None,
        };
        assert_eq!(fb.sentiment(), Sentiment::Negative);
    }

    #[test]
    fn test_route_membership() {
        assert!(FeedbackRoute::Both.includes_voice());
        assert!(FeedbackRoute::Both.includes_global());
        assert!(!FeedbackRoute::Global.includes_voice());
        assert!(!FeedbackRoute::PerVoice.includes_global());
    }
}
