//! Common types and utilities shared across Folio crates.
//!
//! This crate holds the record model handed between the extractor and the
//! binary, plus the observability helpers every entry point initialises. It is
//! intentionally lightweight so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`ExperienceRecord`]: one extracted job/role entry, JSON-ready
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use folio_common::ExperienceRecord;
//!
//! let rec = ExperienceRecord {
//!     title: "Engineer".into(),
//!     company: "Acme".into(),
//!     ..ExperienceRecord::default()
//! };
//! assert_eq!(rec.company, "Acme");
//! assert!(rec.skills.is_empty());
//! ```

pub mod observability;
pub mod record;

pub use record::ExperienceRecord;
