//! Bibliography ordering and numbering
//!
//! The manual `sort_order` of a reference is a workspace concern and is
//! never consulted here.

use std::collections::HashMap;

use bibcite_domain::{Locale, Reference};

use crate::collation::{collation_key, resolve_locale};
use crate::disambiguation::SuffixMap;
use crate::style::{NumberingMode, StyleDefinition};

/// Position of a reference in the rendered bibliography
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedEntry {
    /// Index into the input reference slice
    pub index: usize,
    /// Citation number for numbered styles
    pub number: Option<u32>,
}

/// Alphabetical sort key: surname (or title), year, suffix, title, id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    primary: String,
    year: String,
    suffix: String,
    title: String,
    id: String,
}

impl SortKey {
    pub fn new(reference: &Reference, suffix: Option<&str>, default_locale: Locale) -> Self {
        let locale = resolve_locale(reference, default_locale);
        let title = collation_key(&reference.title, locale);
        let primary = reference
            .primary_surname()
            .map(|surname| collation_key(surname, locale))
            .unwrap_or_else(|| title.clone());
        let year = reference
            .year_digits()
            .map(str::to_string)
            .or_else(|| reference.year.as_deref().map(|y| y.trim().to_string()))
            .unwrap_or_default();

        Self {
            primary,
            year,
            suffix: suffix.unwrap_or_default().to_string(),
            title,
            id: reference.id.clone(),
        }
    }
}

/// Order references for a bibliography and assign numbers.
///
/// Unnumbered styles and numbered styles without a tracked citation order
/// sort alphabetically. With a citation order, cited references come first
/// in order of first appearance and the uncited rest follow alphabetically.
/// Numbers always run 1..N without gaps.
pub fn order_references(
    references: &[Reference],
    style: &StyleDefinition,
    suffixes: &SuffixMap,
    citation_order: Option<&[String]>,
    default_locale: Locale,
) -> Vec<OrderedEntry> {
    let mut alphabetical: Vec<usize> = (0..references.len()).collect();
    alphabetical.sort_by_cached_key(|&i| {
        let reference = &references[i];
        SortKey::new(
            reference,
            suffixes.get(&reference.id).map(String::as_str),
            default_locale,
        )
    });

    let order = match (style.numbering, citation_order) {
        (NumberingMode::CitationOrder, Some(cited)) => {
            cited_first(references, &alphabetical, cited)
        }
        _ => alphabetical,
    };

    let numbered = style.numbering != NumberingMode::None;
    order
        .into_iter()
        .enumerate()
        .map(|(position, index)| OrderedEntry {
            index,
            number: numbered.then_some(position as u32 + 1),
        })
        .collect()
}

fn cited_first(references: &[Reference], alphabetical: &[usize], cited: &[String]) -> Vec<usize> {
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(references.len());
    for (i, reference) in references.iter().enumerate() {
        by_id.entry(reference.id.as_str()).or_insert(i);
    }

    let mut placed = vec![false; references.len()];
    let mut order = Vec::with_capacity(references.len());
    for id in cited {
        if let Some(&i) = by_id.get(id.as_str()) {
            if !placed[i] {
                placed[i] = true;
                order.push(i);
            }
        }
    }
    order.extend(alphabetical.iter().copied().filter(|&i| !placed[i]));
    order
}
