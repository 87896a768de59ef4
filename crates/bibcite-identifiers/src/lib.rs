// Allow manual modulo checks since .is_multiple_of() is not available on older toolchains
#![allow(clippy::manual_is_multiple_of)]

//! Identifier handling for bibliographic lookups and exports
//!
//! - DOI normalisation and shape validation
//! - ISBN-10 / ISBN-13 checksum validation
//! - Classification of free-form lookup input as DOI, ISBN or query
//! - Deterministic cite key generation with batch uniquification

pub mod cite_key;
pub mod classify;
pub mod validators;

pub use cite_key::*;
pub use classify::*;
pub use validators::*;
