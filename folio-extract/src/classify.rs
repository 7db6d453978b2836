//! Lexical classification of the muted "detail line" texts.
//!
//! Detail lines carry the date range and the place of an entry with identical
//! styling, so they are told apart by keywords alone. Text that matches
//! neither list is dropped by the caller.

/// Time-unit tokens, the open-range marker, and the range separator.
const DURATION_TOKENS: &[&str] = &["mos", "months", "yrs", "years", "present", "-"];

/// Work modes plus the place names seen in target documents.
const LOCATION_TOKENS: &[&str] = &[
    "remote",
    "hybrid",
    "on-site",
    "canada",
    "united states",
    "ontario",
    "florida",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_duration: bool,
    pub is_location: bool,
}

pub fn classify(text: &str) -> Classification {
    let lower = text.to_lowercase();
    Classification {
        is_duration: DURATION_TOKENS.iter().any(|t| lower.contains(t)),
        is_location: LOCATION_TOKENS.iter().any(|t| lower.contains(t)),
    }
}
