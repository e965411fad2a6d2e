//! The extraction session.
//!
//! `ExtractionSession` is the explicit state object behind the page: it holds
//! the image reference, the latest recognition result, and the extracted
//! fields, and exposes the input and trigger operations as methods. Every
//! transition is followed by a published `SessionEvent`.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::broadcast;

use glimpse_core::error::GlimpseError;
use glimpse_core::events::SessionEvent;
use glimpse_core::types::{ExtractedFields, ImageReference, Notice, RecognitionResult, TriggerId};
use glimpse_extract::FieldExtractor;
use glimpse_ocr::OcrService;

use crate::notice::Notifier;
use crate::state::{PhaseMachine, SessionPhase};

/// Language requested from the OCR collaborator unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "eng";

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Snapshot of the session data a view is computed from.
///
/// Invariant: `fields` is only `Some` when `recognition` is `Some` and its
/// text matched the extraction pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub image: ImageReference,
    pub recognition: Option<RecognitionResult>,
    pub fields: Option<ExtractedFields>,
}

/// How a call to [`ExtractionSession::convert`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// The image reference was empty; nothing was called.
    InputMissing,
    /// The text matched; these fields are now stored.
    Extracted(ExtractedFields),
    /// The text was stored but did not match.
    NoMatch,
    /// The OCR collaborator failed; prior state was kept.
    Failed,
    /// A newer trigger started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    phase: PhaseMachine,
    /// Sequence number of the most recent trigger.
    latest_trigger: u64,
}

/// Single-user extraction session.
///
/// Shareable behind an `Arc`; the state lock is never held across the OCR
/// call, so a new `convert` may start while another is in flight. Only the
/// most recently started trigger is allowed to write its outcome.
pub struct ExtractionSession<O: OcrService> {
    inner: Mutex<Inner>,
    ocr: O,
    extractor: FieldExtractor,
    notifier: Arc<dyn Notifier>,
    language: String,
    events: broadcast::Sender<SessionEvent>,
}

impl<O: OcrService> std::fmt::Debug for ExtractionSession<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionSession")
            .field("inner", &self.inner)
            .field("language", &self.language)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl<O: OcrService> ExtractionSession<O> {
    /// Create a new idle session using `ocr` for recognition and `notifier`
    /// for user-visible notices.
    pub fn new(ocr: O, notifier: Arc<dyn Notifier>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(Inner::default()),
            ocr,
            extractor: FieldExtractor::new(),
            notifier,
            language: DEFAULT_LANGUAGE.to_string(),
            events,
        }
    }

    /// Use `language` for every subsequent OCR call.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Language code passed to the OCR collaborator.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Subscribe to events published after each transition.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Copy of the current session data.
    pub fn snapshot(&self) -> Result<SessionState, GlimpseError> {
        Ok(self.lock()?.state.clone())
    }

    /// Current phase of the session.
    pub fn phase(&self) -> Result<SessionPhase, GlimpseError> {
        Ok(self.lock()?.phase.current())
    }

    /// Replace the image reference.
    ///
    /// No validation happens here, and previous results are left in place
    /// until the next trigger.
    pub fn set_image_reference(
        &self,
        value: impl Into<ImageReference>,
    ) -> Result<(), GlimpseError> {
        let image = value.into();
        let is_empty = image.is_empty();
        self.lock()?.state.image = image;

        tracing::debug!(is_empty, "Image reference updated");
        self.publish(SessionEvent::ImageReferenceChanged {
            is_empty,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Recognize the current image and extract fields from its text.
    ///
    /// Suspends until the OCR collaborator resolves. There is no timeout and
    /// no retry. All user-facing failures are reported as notices and as the
    /// returned outcome; an `Err` only signals a broken session (poisoned
    /// lock or an impossible phase transition).
    pub async fn convert(&self) -> Result<ConvertOutcome, GlimpseError> {
        let trigger_id = TriggerId::new();

        let (image, sequence) = {
            let mut inner = self.lock()?;
            if inner.state.image.is_empty() {
                drop(inner);
                tracing::debug!("Convert triggered without an image reference");
                self.raise(Notice::InputMissing);
                return Ok(ConvertOutcome::InputMissing);
            }
            inner.phase.transition(SessionPhase::Loading)?;
            inner.latest_trigger += 1;
            (inner.state.image.clone(), inner.latest_trigger)
        };

        tracing::info!(trigger_id = %trigger_id, language = %self.language, "Recognition started");
        self.publish(SessionEvent::RecognitionStarted {
            trigger_id,
            timestamp: Utc::now(),
        });

        let result = self.ocr.recognize(&image, &self.language).await;

        let mut inner = self.lock()?;
        if inner.latest_trigger != sequence {
            drop(inner);
            tracing::info!(
                trigger_id = %trigger_id,
                "Recognition superseded by a newer trigger"
            );
            self.publish(SessionEvent::TriggerSuperseded {
                trigger_id,
                timestamp: Utc::now(),
            });
            return Ok(ConvertOutcome::Superseded);
        }

        let recognition = match result {
            Ok(recognition) => recognition,
            Err(e) => {
                inner.phase.transition(SessionPhase::Error)?;
                drop(inner);
                tracing::warn!(trigger_id = %trigger_id, error = %e, "OCR failed");
                self.publish(SessionEvent::RecognitionFailed {
                    trigger_id,
                    timestamp: Utc::now(),
                });
                self.raise(Notice::RecognitionFailure);
                return Ok(ConvertOutcome::Failed);
            }
        };

        let text_length = recognition.text.len();
        tracing::debug!(trigger_id = %trigger_id, text_len = text_length, "OCR text received");
        let fields = self.extractor.extract(&recognition.text);
        inner.state.recognition = Some(recognition);
        inner.state.fields = fields.clone();

        match fields {
            Some(fields) => {
                inner.phase.transition(SessionPhase::Success)?;
                drop(inner);
                tracing::info!(
                    trigger_id = %trigger_id,
                    field_count = fields.len(),
                    "Fields extracted"
                );
                self.publish(SessionEvent::FieldsExtracted {
                    trigger_id,
                    field_count: fields.len(),
                    timestamp: Utc::now(),
                });
                Ok(ConvertOutcome::Extracted(fields))
            }
            None => {
                inner.phase.transition(SessionPhase::NoMatch)?;
                drop(inner);
                tracing::info!(trigger_id = %trigger_id, text_length, "No structured data found");
                self.publish(SessionEvent::ExtractionMissed {
                    trigger_id,
                    text_length,
                    timestamp: Utc::now(),
                });
                self.raise(Notice::ExtractionMiss);
                Ok(ConvertOutcome::NoMatch)
            }
        }
    }

    fn raise(&self, notice: Notice) {
        tracing::debug!(notice = %notice, "Notice raised");
        self.notifier.notify(notice);
        self.publish(SessionEvent::NoticeRaised {
            notice,
            timestamp: Utc::now(),
        });
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine; the event is simply dropped.
        let _ = self.events.send(event);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, GlimpseError> {
        self.inner
            .lock()
            .map_err(|e| GlimpseError::Session(format!("Session mutex poisoned: {}", e)))
    }
}
