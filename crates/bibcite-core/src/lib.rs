//! bibcite-core: citation and bibliography formatting engine
//!
//! This library provides:
//! - Ten built-in citation styles (APA, MLA, Chicago, Harvard, Vancouver,
//!   IEEE, Nature, Science, Oxford, Turabian)
//! - Name formatting, year-suffix disambiguation, sorting and numbering
//! - Bibliography entry and in-text citation rendering (plain text or HTML)
//! - BibTeX and RIS import/export with per-entry error isolation
//! - DOI / ISBN / free-text lookup against Crossref and Open Library
//!
//! The reference model lives in `bibcite-domain`; BibTeX syntax in
//! `bibcite-bibtex`; identifier validation in `bibcite-identifiers`.

pub mod bibliography;
pub mod cache;
pub mod collation;
pub mod config;
pub mod conversions;
pub mod disambiguation;
pub mod error;
pub mod export;
pub mod http;
pub mod import;
pub mod lookup;
pub mod names;
pub mod render;
pub mod ris;
pub mod sorting;
pub mod style;

// Re-export main types for convenience
pub use bibliography::{
    Bibliography, BibliographyEntry, BibliographyRequest, CitationEngine, CiteItem, CiteRequest,
};
pub use cache::CitationCache;
pub use config::{CacheConfig, ConfigFormat, EngineConfig, LookupConfig, RenderConfig};
pub use disambiguation::{compute_suffixes, disambiguate};
pub use error::{ConfigurationError, ParseError, SerializationError, ValidationWarning};
pub use export::{export, export_bibtex, export_ris, ExportFormat, ExportOptions, ExportReport};
pub use http::{HttpError, HttpResponse, Transport};
pub use import::{detect_format, import_auto, import_bibtex, import_ris, ImportFormat, ImportReport};
pub use lookup::{Candidate, LookupError, LookupOutcome, LookupService};
pub use render::{InTextCitation, RenderedEntry, StyledText};
pub use sorting::{order_references, OrderedEntry};
pub use style::{StyleDefinition, StyleId};

pub use bibcite_domain::{Author, AuthorRole, Locale, LookupResult, Reference, ReferenceType};

#[cfg(feature = "native")]
pub use http::HttpClient;
