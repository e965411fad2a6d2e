use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Unique identifier for a single `convert` trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub Uuid);

impl TriggerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Newtype Wrappers - String
// =============================================================================

/// User-supplied reference to an image, usually a URL.
///
/// Opaque: it is never validated beyond the non-empty check performed when a
/// conversion is triggered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference(pub String);

impl ImageReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the reference should be fetched over HTTP rather than read
    /// from the local filesystem.
    pub fn is_remote(&self) -> bool {
        let lower = self.0.trim_start().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageReference {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// Entity Structs
// =============================================================================

/// Plain text produced by the OCR collaborator for one image.
///
/// Immutable once created; a new trigger replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String,
    /// Language code the engine was asked to recognize.
    pub language: String,
    pub recognized_at: DateTime<Utc>,
}

impl RecognitionResult {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            recognized_at: Utc::now(),
        }
    }
}

/// Named capture groups produced by a successful pattern match.
///
/// Entries keep the order in which the groups appear in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    entries: Vec<(String, String)>,
}

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing the value in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtractedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = ExtractedFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

// =============================================================================
// Notices
// =============================================================================

/// User-visible notices. The message strings are part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// `convert` was triggered with an empty image reference.
    InputMissing,
    /// OCR succeeded but the text did not match the pattern.
    ExtractionMiss,
    /// The OCR collaborator failed.
    RecognitionFailure,
    /// The demo link was written to the clipboard.
    DemoLinkCopied,
    /// Writing the demo link to the clipboard failed.
    ClipboardFailure,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::InputMissing => "Please provide an image URL",
            Notice::ExtractionMiss => "No structured data found.",
            Notice::RecognitionFailure => "Error processing image",
            Notice::DemoLinkCopied => "Demo link copied to clipboard!",
            Notice::ClipboardFailure => "Error copying link",
        }
    }

    /// Whether this notice reports a failed operation.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notice::DemoLinkCopied)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
