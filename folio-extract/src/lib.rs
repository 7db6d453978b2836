//! Turns the experience section of a profile page into structured records.
//!
//! The pipeline is: parse the markup into an owned [`dom::Element`] tree,
//! find every list entry, resolve each entry's fields ([`entry`]), fetch and
//! shrink its logo ([`transcode`]), then decode leftover HTML entities
//! ([`normalize`]).
//!
//! ```
//! use folio_extract::classify;
//!
//! let c = classify("Jan 2020 - Present · 3 yrs");
//! assert!(c.is_duration);
//! assert!(!c.is_location);
//! ```

pub mod classify;
pub mod document;
pub mod dom;
pub mod entry;
pub mod normalize;
pub mod transcode;

#[cfg(test)]
mod fixtures;

pub use classify::{Classification, classify};
pub use document::ExperienceExtractor;
pub use entry::{EntryDraft, SkipReason, extract_entry, parse_entry};
pub use normalize::{decode_entities, normalize};
pub use transcode::{ImageTranscoder, TranscodeSettings, TranscodedImage};
