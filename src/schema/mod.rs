//! Schema combinators
//!
//! A minimal, statically typed combinator set for turning loosely-typed
//! configuration input into typed values:
//!
//! ```text
//! RawConfig → section present? ─ no ──→ whole-section default
//!                              └ yes ─→ per field: default → coerce → validate
//! ```
//!
//! Every failure is collected; nothing short-circuits on the first error.

pub mod field;
pub mod kind;
pub mod raw;
pub mod section;

pub use field::FieldSpec;
pub use kind::{Boolean, Enum, Kind, Measured, Number, Optional, Secret, Text};
pub use raw::{RawConfig, RawSection, RawValue};
pub use section::{ConfigSection, FieldReader, resolve_section};
