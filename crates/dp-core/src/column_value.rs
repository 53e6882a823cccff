//! Tagged values stored in Canvas custom gradebook columns.
//!
//! The columns hold free text, and the tools layer two string conventions on
//! top: a tentative marker prefix for values the student proposed but nobody
//! confirmed, and a choice-list prefix for an administrator-imposed set of
//! allowed course codes. [`ColumnValue`] carries the distinction as a proper
//! variant type in-process; the marker strings appear only when encoding to
//! or decoding from the external column format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix marking a value as tentative/unconfirmed, e.g. `⚠⚠Jane Doe`.
pub const TENTATIVE_MARKER: &str = "⚠⚠";

/// Prefix marking a `|`-joined list of allowed choices, e.g. `⚄⚄|II225X|II245X`.
pub const CHOICE_MARKER: &str = "⚄⚄|";

/// A decoded custom-column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnValue {
    /// Plain content with no marker.
    Confirmed(String),
    /// Content a student proposed, awaiting confirmation.
    Tentative(String),
    /// A constrained list of allowed choices.
    ConstrainedChoice(Vec<String>),
}

impl ColumnValue {
    /// Decode an external column string. Surrounding whitespace is trimmed
    /// before the marker check; an empty string decodes to `Confirmed("")`,
    /// which callers distinguish from "no entry at all" (`None` upstream).
    pub fn decode(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(rest) = trimmed.strip_prefix(CHOICE_MARKER) {
            let choices = rest
                .split('|')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            ColumnValue::ConstrainedChoice(choices)
        } else if let Some(rest) = trimmed.strip_prefix(TENTATIVE_MARKER) {
            ColumnValue::Tentative(rest.to_string())
        } else {
            ColumnValue::Confirmed(trimmed.to_string())
        }
    }

    /// Encode to the external column string, reattaching the marker.
    pub fn encode(&self) -> String {
        match self {
            ColumnValue::Confirmed(text) => text.clone(),
            ColumnValue::Tentative(text) => format!("{}{}", TENTATIVE_MARKER, text),
            ColumnValue::ConstrainedChoice(choices) => {
                format!("{}{}", CHOICE_MARKER, choices.join("|"))
            }
        }
    }

    /// The textual payload, without markers. Choice lists render `|`-joined.
    pub fn text(&self) -> String {
        match self {
            ColumnValue::Confirmed(text) | ColumnValue::Tentative(text) => text.clone(),
            ColumnValue::ConstrainedChoice(choices) => choices.join("|"),
        }
    }

    pub fn is_tentative(&self) -> bool {
        matches!(self, ColumnValue::Tentative(_))
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tentative_roundtrips_with_marker_preserved() {
        let value = ColumnValue::decode("⚠⚠Jane Doe");
        assert_eq!(value, ColumnValue::Tentative("Jane Doe".to_string()));
        assert_eq!(value.encode(), "⚠⚠Jane Doe");
    }

    #[test]
    fn whitespace_is_trimmed_before_decoding() {
        let value = ColumnValue::decode("  ⚠⚠Jane Doe \n");
        assert_eq!(value.encode(), "⚠⚠Jane Doe");
    }

    #[test]
    fn choice_list_splits_on_pipes() {
        let value = ColumnValue::decode("⚄⚄|II225X|II245X");
        assert_eq!(
            value,
            ColumnValue::ConstrainedChoice(vec!["II225X".to_string(), "II245X".to_string()])
        );
        assert_eq!(value.encode(), "⚄⚄|II225X|II245X");
    }

    #[test]
    fn plain_text_is_confirmed() {
        assert_eq!(
            ColumnValue::decode("yes_to_diva"),
            ColumnValue::Confirmed("yes_to_diva".to_string())
        );
    }

    #[test]
    fn empty_string_is_confirmed_empty() {
        assert_eq!(ColumnValue::decode("   "), ColumnValue::Confirmed(String::new()));
    }
}
