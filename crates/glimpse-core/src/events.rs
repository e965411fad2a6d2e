use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Notice, TriggerId};

/// Events published by an extraction session after each state transition.
///
/// Consumers (the terminal renderer, tests) recompute their view from a fresh
/// state snapshot when an event arrives; events carry only enough data to log
/// and correlate what happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionEvent {
    /// The image reference was edited.
    ImageReferenceChanged {
        is_empty: bool,
        timestamp: DateTime<Utc>,
    },

    /// A conversion started and the OCR collaborator was invoked.
    RecognitionStarted {
        trigger_id: TriggerId,
        timestamp: DateTime<Utc>,
    },

    /// OCR text matched the pattern and fields were stored.
    FieldsExtracted {
        trigger_id: TriggerId,
        field_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// OCR text was stored but did not match the pattern.
    ExtractionMissed {
        trigger_id: TriggerId,
        text_length: usize,
        timestamp: DateTime<Utc>,
    },

    /// The OCR collaborator failed; prior results were kept.
    RecognitionFailed {
        trigger_id: TriggerId,
        timestamp: DateTime<Utc>,
    },

    /// A conversion finished after a newer one had started; its outcome was
    /// discarded.
    TriggerSuperseded {
        trigger_id: TriggerId,
        timestamp: DateTime<Utc>,
    },

    /// A user-visible notice was raised.
    NoticeRaised {
        notice: Notice,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// The trigger this event belongs to, if any.
    pub fn trigger_id(&self) -> Option<TriggerId> {
        match self {
            SessionEvent::RecognitionStarted { trigger_id, .. }
            | SessionEvent::FieldsExtracted { trigger_id, .. }
            | SessionEvent::ExtractionMissed { trigger_id, .. }
            | SessionEvent::RecognitionFailed { trigger_id, .. }
            | SessionEvent::TriggerSuperseded { trigger_id, .. } => Some(*trigger_id),
            SessionEvent::ImageReferenceChanged { .. } | SessionEvent::NoticeRaised { .. } => None,
        }
    }

    /// Whether the event ends a conversion (successfully or not).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::FieldsExtracted { .. }
                | SessionEvent::ExtractionMissed { .. }
                | SessionEvent::RecognitionFailed { .. }
                | SessionEvent::TriggerSuperseded { .. }
        )
    }
}
