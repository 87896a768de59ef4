//! Bibliography and citation entry points
//!
//! [`CitationEngine`] runs the full pipeline for a scoped reference set:
//! disambiguation and ordering over the whole set, then entry rendering in
//! parallel. The style is passed with every request.

use std::collections::HashMap;
use std::sync::Arc;

use bibcite_domain::{Locale, Reference};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{content_hash, fingerprint, CitationCache, RenderKey, ScopeAssignment};
use crate::config::EngineConfig;
use crate::disambiguation::compute_suffixes;
use crate::error::{ConfigurationError, ValidationWarning};
use crate::render::{
    render_entry, render_in_text, CitationContext, CitationItem, EntryContext, InTextCitation,
    RenderedEntry, StyledText,
};
use crate::sorting::order_references;
use crate::style::{self, StyleDefinition, StyleId};

/// A request to format every reference of a scope
#[derive(Debug, Clone, Copy)]
pub struct BibliographyRequest<'a> {
    /// Project or folder the references belong to; keys the cache
    pub scope: &'a str,
    /// Style id, e.g. `apa7`
    pub style: &'a str,
    pub references: &'a [Reference],
    /// Reference ids in order of citation, when the caller tracks it
    pub citation_order: Option<&'a [String]>,
}

/// One entry of a formatted bibliography
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographyEntry {
    pub reference_id: String,
    pub number: Option<u32>,
    pub year_suffix: Option<String>,
    pub text: StyledText,
}

/// An ordered, formatted bibliography
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bibliography {
    pub style: StyleId,
    pub entries: Vec<BibliographyEntry>,
    pub warnings: Vec<ValidationWarning>,
}

impl Bibliography {
    pub fn to_plain(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.to_plain())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.to_html())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One reference cited at a citation site
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CiteItem {
    pub reference_id: String,
    pub locator: Option<String>,
}

impl CiteItem {
    pub fn new(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            locator: None,
        }
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }
}

/// A request to render one in-text citation
#[derive(Debug, Clone, Copy)]
pub struct CiteRequest<'a> {
    pub scope: &'a str,
    pub style: &'a str,
    /// The whole scoped set; suffixes and numbers depend on all of it
    pub references: &'a [Reference],
    pub citation_order: Option<&'a [String]>,
    pub items: &'a [CiteItem],
    /// Note number for footnote styles
    pub note_number: Option<u32>,
}

/// Formats bibliographies and citations
#[derive(Debug, Clone)]
pub struct CitationEngine {
    config: EngineConfig,
    cache: Option<Arc<CitationCache>>,
}

impl Default for CitationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CitationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(CitationCache::new(config.cache.max_render_entries)));
        Self { config, cache }
    }

    /// Engine sharing an existing cache
    pub fn with_cache(config: EngineConfig, cache: Arc<CitationCache>) -> Self {
        Self {
            config,
            cache: Some(cache),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<CitationCache>> {
        self.cache.as_ref()
    }

    fn default_locale(&self) -> Locale {
        self.config.render.default_locale
    }

    /// Drop cached suffixes and ordering for a scope
    pub fn invalidate_scope(&self, scope: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate_scope(scope);
        }
    }

    fn assignment(
        &self,
        scope: &str,
        style: &StyleDefinition,
        references: &[Reference],
        citation_order: Option<&[String]>,
    ) -> Arc<ScopeAssignment> {
        let locale = self.default_locale();
        let fingerprint = fingerprint(references, citation_order, locale);
        let compute = || {
            let suffixes = compute_suffixes(references, style, locale);
            let order = order_references(references, style, &suffixes, citation_order, locale);
            ScopeAssignment {
                fingerprint,
                suffixes,
                order,
            }
        };

        match &self.cache {
            Some(cache) => cache.assignment(scope, style.id, fingerprint, compute),
            None => Arc::new(compute()),
        }
    }

    /// Render one entry, going through the render cache when enabled
    pub fn render_entry(
        &self,
        reference: &Reference,
        style: &StyleDefinition,
        suffix: Option<&str>,
        number: Option<u32>,
    ) -> RenderedEntry {
        let context = EntryContext {
            suffix,
            number,
            default_locale: self.default_locale(),
        };
        let Some(cache) = &self.cache else {
            return render_entry(reference, style, &context);
        };

        let key = RenderKey {
            reference_id: reference.id.clone(),
            content: content_hash(reference),
            style: style.id,
            suffix: suffix.map(str::to_string),
            number,
            locale: context.default_locale,
        };
        if let Some(hit) = cache.get_render(&key) {
            return hit;
        }
        let rendered = render_entry(reference, style, &context);
        cache.put_render(key, rendered.clone());
        rendered
    }

    /// Format a scope's full bibliography
    pub fn format_bibliography(
        &self,
        request: &BibliographyRequest<'_>,
    ) -> Result<Bibliography, ConfigurationError> {
        let style = style::lookup(request.style)?;
        let assignment = self.assignment(
            request.scope,
            style,
            request.references,
            request.citation_order,
        );

        let rendered: Vec<(BibliographyEntry, Vec<ValidationWarning>)> = assignment
            .order
            .par_iter()
            .map(|ordered| {
                let reference = &request.references[ordered.index];
                let suffix = assignment.suffixes.get(&reference.id).map(String::as_str);
                let entry = self.render_entry(reference, style, suffix, ordered.number);
                (
                    BibliographyEntry {
                        reference_id: reference.id.clone(),
                        number: ordered.number,
                        year_suffix: suffix.map(str::to_string),
                        text: entry.text,
                    },
                    entry.warnings,
                )
            })
            .collect();

        let mut entries = Vec::with_capacity(rendered.len());
        let mut warnings = Vec::new();
        for (entry, entry_warnings) in rendered {
            entries.push(entry);
            warnings.extend(entry_warnings);
        }
        for warning in &warnings {
            warn!(reference = %warning.reference_id, field = %warning.field, "{}", warning.message);
        }

        info!(
            scope = request.scope,
            style = %style.id,
            entries = entries.len(),
            warnings = warnings.len(),
            "Formatted bibliography"
        );

        Ok(Bibliography {
            style: style.id,
            entries,
            warnings,
        })
    }

    /// Render the in-text citation for one citation site.
    ///
    /// Ids not found in the scoped set are skipped.
    pub fn cite(&self, request: &CiteRequest<'_>) -> Result<InTextCitation, ConfigurationError> {
        let style = style::lookup(request.style)?;
        let assignment = self.assignment(
            request.scope,
            style,
            request.references,
            request.citation_order,
        );

        let by_id: HashMap<&str, usize> = request
            .references
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .rev()
            .collect();
        let numbers: HashMap<usize, u32> = assignment
            .order
            .iter()
            .filter_map(|e| e.number.map(|n| (e.index, n)))
            .collect();

        let items: Vec<CitationItem<'_>> = request
            .items
            .iter()
            .filter_map(|item| {
                let Some(&index) = by_id.get(item.reference_id.as_str()) else {
                    warn!(reference = %item.reference_id, "Cited reference not in scope");
                    return None;
                };
                let reference = &request.references[index];
                Some(CitationItem {
                    reference,
                    suffix: assignment.suffixes.get(&reference.id).map(String::as_str),
                    number: numbers.get(&index).copied(),
                    locator: item.locator.as_deref(),
                })
            })
            .collect();

        debug!(style = %style.id, items = items.len(), "Rendering citation");
        Ok(render_in_text(
            &items,
            style,
            &CitationContext {
                note_number: request.note_number,
                default_locale: self.default_locale(),
            },
        ))
    }
}
