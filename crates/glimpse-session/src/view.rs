//! Presentation: a pure function from session state to what is shown.

use std::fmt;

use crate::session::SessionState;

/// The right-hand panel of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Extracted fields as `(field, value)` rows, in pattern order.
    Fields(Vec<(String, String)>),
    /// Raw recognized text; shown when nothing was extracted.
    RawText(String),
    /// Nothing to show yet.
    Empty,
}

/// Everything the front end renders for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Image to preview, present whenever the reference is non-empty.
    pub preview: Option<String>,
    pub panel: Panel,
}

impl View {
    /// Compute the view for `state`.
    ///
    /// Extracted fields take precedence over raw text.
    pub fn from_state(state: &SessionState) -> Self {
        let preview = (!state.image.is_empty()).then(|| state.image.to_string());

        let panel = if let Some(fields) = &state.fields {
            Panel::Fields(
                fields
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            )
        } else if let Some(recognition) = &state.recognition {
            Panel::RawText(recognition.text.clone())
        } else {
            Panel::Empty
        };

        Self { preview, panel }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(preview) = &self.preview {
            writeln!(f, "Image Preview: {}", preview)?;
        }

        match &self.panel {
            Panel::Fields(rows) => {
                writeln!(f, "Structured Data:")?;
                write_table(f, rows)
            }
            Panel::RawText(text) => {
                writeln!(f, "Extracted Text:")?;
                writeln!(f, "{}", text)
            }
            Panel::Empty => Ok(()),
        }
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, rows: &[(String, String)]) -> fmt::Result {
    const FIELD: &str = "Field";
    const VALUE: &str = "Value";

    let key_width = rows
        .iter()
        .map(|(k, _)| k.chars().count())
        .chain(std::iter::once(FIELD.len()))
        .max()
        .unwrap_or(FIELD.len());
    let value_width = rows
        .iter()
        .map(|(_, v)| v.chars().count())
        .chain(std::iter::once(VALUE.len()))
        .max()
        .unwrap_or(VALUE.len());

    let border = format!(
        "+{}+{}+",
        "-".repeat(key_width + 2),
        "-".repeat(value_width + 2)
    );

    writeln!(f, "{}", border)?;
    writeln!(f, "| {:<key_width$} | {:<value_width$} |", FIELD, VALUE)?;
    writeln!(f, "{}", border)?;
    for (key, value) in rows {
        writeln!(f, "| {:<key_width$} | {:<value_width$} |", key, value)?;
    }
    writeln!(f, "{}", border)
}
