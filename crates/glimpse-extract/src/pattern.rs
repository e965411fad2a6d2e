//! The ID-card extraction pattern.
//!
//! The pattern runs in dot-all mode and captures:
//! - `name`: the shortest run after `Name:` and optional whitespace, up to a newline.
//! - `dob`: a `DD/DD/DDDD` date after `DOR:` and optional whitespace, anywhere
//!   after the name line.
//!
//! The label is `DOR:`, not `DOB:`. Real card scans are matched against this
//! exact label, so changing it changes which inputs extract.
//!
//! Digits are spelled `[0-9]` because `\d` is Unicode-aware in `regex` and
//! would accept non-ASCII digits. Whitespace is an explicit class for the same
//! reason: `\s` is Unicode `White_Space`, which admits U+0085 (NEL) and
//! rejects U+FEFF (BOM). The class below is the ECMAScript whitespace set
//! (line terminators plus `Zs`, tab, vertical tab, form feed and BOM).

use regex::Regex;
use tracing::debug;

use glimpse_core::types::ExtractedFields;

/// Source of the ID-card pattern.
pub const ID_CARD_PATTERN: &str = concat!(
    r"(?s)Name:",
    r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}",
    r"\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]*",
    r"(?P<name>.+?)\n.*?DOR:",
    r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}",
    r"\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]*",
    r"(?P<dob>[0-9]{2}/[0-9]{2}/[0-9]{4})",
);

/// Extracts the named groups of [`ID_CARD_PATTERN`] from OCR text.
///
/// Stateless: the same text always yields the same fields.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    regex: Regex,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    /// Compile the ID-card pattern.
    pub fn new() -> Self {
        Self {
            regex: Regex::new(ID_CARD_PATTERN).expect("Invalid ID card regex"),
        }
    }

    /// Match the pattern once against `text`.
    ///
    /// Returns `None` unless the whole structure matches; a `Name:` line
    /// without a well-formed `DOR:` date yields nothing.
    pub fn extract(&self, text: &str) -> Option<ExtractedFields> {
        let Some(caps) = self.regex.captures(text) else {
            debug!(text_len = text.len(), "No structured data in text");
            return None;
        };

        let fields: ExtractedFields = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
            .collect();

        debug!(field_count = fields.len(), "Fields extracted");
        Some(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<ExtractedFields> {
        FieldExtractor::new().extract(text)
    }

    #[test]
    fn test_simple_card() {
        let fields = extract("Name: Bob\nDOR: 12/31/1999").unwrap();
        let rows: Vec<_> = fields.iter().collect();
        assert_eq!(rows, vec![("name", "Bob"), ("dob", "12/31/1999")]);
    }

    #[test]
    fn test_content_between_name_and_date() {
        let text = "REPUBLIC OF EXAMPLE\nName: Alice Smith\nSex: F\n\
                    Nationality: XX\n\nDOR: 01/02/2003\nExpires 2030";
        let fields = extract(text).unwrap();
        assert_eq!(fields.get("name"), Some("Alice Smith"));
        assert_eq!(fields.get("dob"), Some("01/02/2003"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_name_stops_at_first_newline() {
        let fields = extract("Name: Alice\nSmith\nDOR: 01/02/2003").unwrap();
        assert_eq!(fields.get("name"), Some("Alice"));
    }

    #[test]
    fn test_whitespace_after_labels_is_optional() {
        let fields = extract("Name:Bob\nDOR:12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("Bob"));
        assert_eq!(fields.get("dob"), Some("12/31/1999"));

        let fields = extract("Name:\t  Bob\nDOR:   12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("Bob"));
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        let fields = extract("Name:\u{feff}Bob\nDOR:\u{feff}12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("Bob"));
        assert_eq!(fields.get("dob"), Some("12/31/1999"));
    }

    #[test]
    fn test_next_line_is_not_whitespace() {
        let fields = extract("Name:\u{85}Bob\nDOR: 12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("\u{85}Bob"));

        // After the date label it blocks the match entirely.
        assert!(extract("Name: Bob\nDOR:\u{85}12/31/1999").is_none());
    }

    #[test]
    fn test_unicode_spaces_after_labels() {
        let fields = extract("Name:\u{a0}\u{3000}Bob\nDOR:\u{2009}12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("Bob"));
        assert_eq!(fields.get("dob"), Some("12/31/1999"));
    }

    #[test]
    fn test_value_on_line_after_label() {
        // Leading whitespace (including the newline) is consumed before the name.
        let fields = extract("Name:\nBob\nDOR: 12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("Bob"));
    }

    #[test]
    fn test_carriage_return_stays_in_name() {
        let fields = extract("Name: Bob\r\nDOR: 12/31/1999").unwrap();
        assert_eq!(fields.get("name"), Some("Bob\r"));
    }

    #[test]
    fn test_plain_text_does_not_match() {
        assert!(extract("hello world").is_none());
        assert!(extract("").is_none());
    }

    #[test]
    fn test_missing_name_label() {
        assert!(extract("Surname: Bob\nDOR 12/31/1999").is_none());
        assert!(extract("DOR: 12/31/1999\n").is_none());
    }

    #[test]
    fn test_dob_label_is_not_accepted() {
        assert!(extract("Name: Bob\nDOB: 12/31/1999").is_none());
    }

    #[test]
    fn test_malformed_dates() {
        assert!(extract("Name: Bob\nDOR: 1/2/1999").is_none());
        assert!(extract("Name: Bob\nDOR: 12-31-1999").is_none());
        assert!(extract("Name: Bob\nDOR: 12/31/99").is_none());
        assert!(extract("Name: Bob\nDOR: ١٢/٣١/١٩٩٩").is_none());
    }

    #[test]
    fn test_date_must_follow_name_line() {
        // Name on the last line leaves no newline for the name capture.
        assert!(extract("DOR: 12/31/1999\nName: Bob").is_none());
    }

    #[test]
    fn test_long_date_digits_take_first_ten_chars() {
        let fields = extract("Name: Bob\nDOR: 12/31/19990").unwrap();
        assert_eq!(fields.get("dob"), Some("12/31/1999"));
    }

    #[test]
    fn test_first_date_after_name_wins() {
        let fields = extract("Name: Bob\nDOR: 01/01/2000\nDOR: 02/02/2002").unwrap();
        assert_eq!(fields.get("dob"), Some("01/01/2000"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = FieldExtractor::new();
        let text = "Name: Alice Smith\nID 42\nDOR: 01/02/2003";
        let first = extractor.extract(text);
        let second = extractor.extract(text);
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
