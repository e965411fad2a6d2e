//! Glimpse OCR crate - OCR collaborator trait and implementations.
//!
//! Provides the `OcrService` trait that turns an image reference into
//! recognized plain text, a `MockOcrService` for testing, and a
//! `TesseractOcrService` that fetches the image and runs the `tesseract`
//! executable on it.

pub mod tesseract;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glimpse_core::error::GlimpseError;
use glimpse_core::types::{ImageReference, RecognitionResult};

pub use tesseract::TesseractOcrService;

/// Service that recognizes text in an image.
///
/// The session treats implementations as a black box: any engine that can
/// turn `(image, language)` into text, locally or remotely, is substitutable.
pub trait OcrService: Send + Sync {
    /// Recognize the text in the referenced image.
    ///
    /// # Arguments
    /// * `image` - Opaque reference to the image (URL or path).
    /// * `language` - Engine language code, e.g. `"eng"`.
    fn recognize(
        &self,
        image: &ImageReference,
        language: &str,
    ) -> impl std::future::Future<Output = Result<RecognitionResult, GlimpseError>> + Send;
}

/// Scripted outcome for one mock recognition.
#[derive(Debug, Clone)]
enum MockOutcome {
    Text(String),
    Fail(String),
}

#[derive(Debug, Clone)]
struct MockResponse {
    outcome: MockOutcome,
    delay: Option<Duration>,
}

/// Mock OCR service for testing.
///
/// Returns deterministic output without performing real OCR. Responses can
/// be scripted per image reference, optionally with a delay, and every call
/// is counted.
#[derive(Debug, Clone)]
pub struct MockOcrService {
    default: MockResponse,
    overrides: HashMap<String, MockResponse>,
    calls: Arc<AtomicUsize>,
}

impl MockOcrService {
    /// Create a new mock OCR service with default response text.
    pub fn new() -> Self {
        Self::with_text("Mock OCR extracted text: Lorem ipsum dolor sit amet")
    }

    /// Create a mock OCR service that returns the specified text.
    pub fn with_text(text: &str) -> Self {
        Self {
            default: MockResponse {
                outcome: MockOutcome::Text(text.to_string()),
                delay: None,
            },
            overrides: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock OCR service whose every call fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            default: MockResponse {
                outcome: MockOutcome::Fail(reason.to_string()),
                delay: None,
            },
            overrides: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay every default response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default.delay = Some(delay);
        self
    }

    /// Return `text` for `image`, after `delay` if given.
    pub fn respond_to(mut self, image: &str, text: &str, delay: Option<Duration>) -> Self {
        self.overrides.insert(
            image.to_string(),
            MockResponse {
                outcome: MockOutcome::Text(text.to_string()),
                delay,
            },
        );
        self
    }

    /// Fail recognition of `image` with `reason`, after `delay` if given.
    pub fn fail_for(mut self, image: &str, reason: &str, delay: Option<Duration>) -> Self {
        self.overrides.insert(
            image.to_string(),
            MockResponse {
                outcome: MockOutcome::Fail(reason.to_string()),
                delay,
            },
        );
        self
    }

    /// Number of `recognize` calls made so far (shared across clones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockOcrService {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrService for MockOcrService {
    async fn recognize(
        &self,
        image: &ImageReference,
        language: &str,
    ) -> Result<RecognitionResult, GlimpseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response = self
            .overrides
            .get(image.as_str())
            .unwrap_or(&self.default)
            .clone();

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        match response.outcome {
            MockOutcome::Text(text) => Ok(RecognitionResult::new(text, language)),
            MockOutcome::Fail(reason) => Err(GlimpseError::Ocr(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ocr_default() {
        let service = MockOcrService::new();
        let result = service
            .recognize(&ImageReference::from("a.png"), "eng")
            .await
            .unwrap();
        assert!(result.text.contains("Mock OCR"));
        assert_eq!(result.language, "eng");
    }

    #[tokio::test]
    async fn test_mock_ocr_custom_text() {
        let service = MockOcrService::with_text("Name: Bob\nDOR: 12/31/1999");
        let result = service
            .recognize(&ImageReference::from("card.png"), "eng")
            .await
            .unwrap();
        assert_eq!(result.text, "Name: Bob\nDOR: 12/31/1999");
    }

    #[tokio::test]
    async fn test_mock_ocr_failing() {
        let service = MockOcrService::failing("engine offline");
        let err = service
            .recognize(&ImageReference::from("card.png"), "eng")
            .await
            .unwrap_err();
        assert!(matches!(err, GlimpseError::Ocr(ref msg) if msg == "engine offline"));
    }

    #[tokio::test]
    async fn test_mock_ocr_overrides() {
        let service = MockOcrService::with_text("default")
            .respond_to("good.png", "scripted", None)
            .fail_for("bad.png", "unreadable", None);

        let good = service
            .recognize(&ImageReference::from("good.png"), "eng")
            .await
            .unwrap();
        assert_eq!(good.text, "scripted");

        let bad = service
            .recognize(&ImageReference::from("bad.png"), "eng")
            .await;
        assert!(bad.is_err());

        let other = service
            .recognize(&ImageReference::from("other.png"), "eng")
            .await
            .unwrap();
        assert_eq!(other.text, "default");
    }

    #[tokio::test]
    async fn test_mock_ocr_counts_calls_across_clones() {
        let service = MockOcrService::new();
        let clone = service.clone();
        assert_eq!(service.calls(), 0);

        service
            .recognize(&ImageReference::from("a"), "eng")
            .await
            .unwrap();
        clone
            .recognize(&ImageReference::from("b"), "eng")
            .await
            .unwrap();

        assert_eq!(service.calls(), 2);
        assert_eq!(clone.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_ocr_delay() {
        let service = MockOcrService::with_text("slow").with_delay(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        let result = service
            .recognize(&ImageReference::from("a"), "eng")
            .await
            .unwrap();
        assert_eq!(result.text, "slow");
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_mock_ocr_deterministic() {
        let service = MockOcrService::with_text("deterministic");
        let t1 = service
            .recognize(&ImageReference::from("1"), "eng")
            .await
            .unwrap();
        let t2 = service
            .recognize(&ImageReference::from("2"), "eng")
            .await
            .unwrap();
        assert_eq!(t1.text, t2.text);
    }
}
