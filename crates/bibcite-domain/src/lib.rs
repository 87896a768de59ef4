//! Canonical bibliographic types shared by every bibcite crate
//!
//! This crate provides the style-independent record the formatting engine
//! works on:
//! - Reference: a book, article, web page, thesis, etc.
//! - Author: structured (invertible) or literal (non-invertible) names with a role
//! - Locale: language-dependent terms (et al., suffix alphabet)
//! - LookupResult: transient metadata returned by DOI/ISBN/query lookups
//! - Validation of required and recommended fields

pub mod author;
pub mod locale;
pub mod lookup_result;
pub mod reference;
pub mod validation;

pub use author::*;
pub use locale::*;
pub use lookup_result::*;
pub use reference::*;
pub use validation::*;
