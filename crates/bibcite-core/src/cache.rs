//! Suffix/number and render caches
//!
//! Assignments (year suffixes plus bibliography order) are cached per
//! `(scope, style)` and keyed by a fingerprint of the full contents of the
//! reference set, so any change to membership, order, any field of any
//! reference or the citation order recomputes them. Each key has its own
//! lock that is held while computing, which keeps readers away from a
//! half-finished disambiguation pass.
//!
//! Rendered entries are cached by a hash of the whole reference plus style,
//! suffix, number and default locale. Two scopes holding different records
//! under the same id never share an entry, and a reloaded or re-imported
//! record is rendered afresh without anyone calling [`Reference::touch`].

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, RwLock};

use bibcite_domain::{Locale, Reference};
use tracing::debug;

use crate::disambiguation::SuffixMap;
use crate::render::RenderedEntry;
use crate::sorting::OrderedEntry;
use crate::style::StyleId;

/// Suffixes and ordering computed for one reference set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeAssignment {
    pub fingerprint: u64,
    pub suffixes: SuffixMap,
    pub order: Vec<OrderedEntry>,
}

/// Identity of a rendered entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub reference_id: String,
    /// [`content_hash`] of the reference
    pub content: u64,
    pub style: StyleId,
    pub suffix: Option<String>,
    pub number: Option<u32>,
    pub locale: Locale,
}

type AssignmentSlot = Arc<Mutex<Option<Arc<ScopeAssignment>>>>;

/// Shared cache for a [`crate::CitationEngine`]
#[derive(Debug)]
pub struct CitationCache {
    assignments: Mutex<HashMap<(String, StyleId), AssignmentSlot>>,
    renders: RwLock<HashMap<RenderKey, RenderedEntry>>,
    max_render_entries: usize,
}

impl CitationCache {
    pub fn new(max_render_entries: usize) -> Self {
        Self {
            assignments: Mutex::new(HashMap::new()),
            renders: RwLock::new(HashMap::new()),
            max_render_entries: max_render_entries.max(1),
        }
    }

    /// Cached assignment for `(scope, style)`, computing it when the
    /// fingerprint no longer matches
    pub fn assignment(
        &self,
        scope: &str,
        style: StyleId,
        fingerprint: u64,
        compute: impl FnOnce() -> ScopeAssignment,
    ) -> Arc<ScopeAssignment> {
        let slot = {
            let mut slots = self.assignments.lock().unwrap_or_else(|e| e.into_inner());
            slots
                .entry((scope.to_string(), style))
                .or_default()
                .clone()
        };

        let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = guard.as_ref() {
            if existing.fingerprint == fingerprint {
                debug!(scope, style = %style, "Assignment cache hit");
                return Arc::clone(existing);
            }
        }

        debug!(scope, style = %style, "Assignment cache miss");
        let computed = Arc::new(compute());
        *guard = Some(Arc::clone(&computed));
        computed
    }

    pub fn get_render(&self, key: &RenderKey) -> Option<RenderedEntry> {
        let renders = self.renders.read().unwrap_or_else(|e| e.into_inner());
        renders.get(key).cloned()
    }

    pub fn put_render(&self, key: RenderKey, entry: RenderedEntry) {
        let mut renders = self.renders.write().unwrap_or_else(|e| e.into_inner());
        if renders.len() >= self.max_render_entries {
            debug!(entries = renders.len(), "Render cache full, flushing");
            renders.clear();
        }
        renders.insert(key, entry);
    }

    pub fn render_len(&self) -> usize {
        self.renders.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop cached assignments for every style of a scope
    pub fn invalidate_scope(&self, scope: &str) {
        let mut slots = self.assignments.lock().unwrap_or_else(|e| e.into_inner());
        slots.retain(|(s, _), _| s != scope);
        debug!(scope, "Invalidated scope");
    }

    pub fn invalidate_all(&self) {
        self.assignments
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.renders
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        debug!("Invalidated all cached citations");
    }
}

/// Fingerprint of a reference set as seen by disambiguation and ordering
pub fn fingerprint(
    references: &[Reference],
    citation_order: Option<&[String]>,
    default_locale: Locale,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    references.hash(&mut hasher);
    citation_order.hash(&mut hasher);
    default_locale.hash(&mut hasher);
    hasher.finish()
}

/// Hash of every field of a reference, id included
pub fn content_hash(reference: &Reference) -> u64 {
    let mut hasher = DefaultHasher::new();
    reference.hash(&mut hasher);
    hasher.finish()
}
