//! Field validation for note request bodies.
//!
//! Every field is checked independently so a single response reports all
//! violations. A field reports at most one message; blankness wins over
//! length.

use std::collections::BTreeMap;

use crate::domain::{CONTENT_MAX, CONTENT_MIN, TITLE_MAX, TITLE_MIN};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Non-blank text whose length in characters lies within `min..=max`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LengthRule {
    field: FieldName,
    min: usize,
    max: usize,
}

impl LengthRule {
    pub(crate) const fn new(field: FieldName, min: usize, max: usize) -> Self {
        Self { field, min, max }
    }

    fn violation(self, value: Option<&str>) -> Option<String> {
        let name = self.field.as_str();
        let text = match value {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Some(format!("{name} must not be blank")),
        };
        let length = text.chars().count();
        if (self.min..=self.max).contains(&length) {
            None
        } else {
            Some(format!(
                "{name} must be between {} and {} characters",
                self.min, self.max
            ))
        }
    }
}

pub(crate) const TITLE_RULE: LengthRule =
    LengthRule::new(FieldName::new("title"), TITLE_MIN, TITLE_MAX);
pub(crate) const CONTENT_RULE: LengthRule =
    LengthRule::new(FieldName::new("content"), CONTENT_MIN, CONTENT_MAX);

/// Collect violations for a note's title and content.
///
/// An empty map means the input is valid.
pub(crate) fn note_violations(
    title: Option<&str>,
    content: Option<&str>,
) -> BTreeMap<String, String> {
    [(TITLE_RULE, title), (CONTENT_RULE, content)]
        .into_iter()
        .filter_map(|(rule, value)| {
            rule.violation(value)
                .map(|message| (rule.field.as_str().to_owned(), message))
        })
        .collect()
}
