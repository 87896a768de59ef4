//! Year-suffix disambiguation
//!
//! Author-year styles cannot tell apart two works by the same primary
//! author in the same year, so each member of such a collision group gets a
//! suffix (`2020a`, `2020b`). Suffixes depend on the whole reference set and
//! must be computed before any entry is rendered.

use std::collections::{BTreeMap, HashMap};

use bibcite_domain::{normalize_surname, Locale, Reference};
use tracing::debug;

use crate::collation::{collation_key, resolve_locale};
use crate::style::StyleDefinition;

/// Year suffix per reference id
pub type SuffixMap = HashMap<String, String>;

/// Compute year suffixes for a reference set.
///
/// Returns an empty map for numeric and footnote styles. References are
/// grouped on normalized primary surname and year; within a group of two
/// or more, suffixes follow title order with the id breaking ties. Ids are
/// expected to be unique within the set.
pub fn compute_suffixes(
    references: &[Reference],
    style: &StyleDefinition,
    default_locale: Locale,
) -> SuffixMap {
    let mut suffixes = SuffixMap::new();
    if !style.uses_year_suffixes() {
        return suffixes;
    }

    let mut groups: BTreeMap<(String, String), Vec<&Reference>> = BTreeMap::new();
    for reference in references {
        let Some(surname) = reference.primary_surname() else {
            continue;
        };
        let year = reference
            .year_digits()
            .map(str::to_string)
            .or_else(|| reference.year.as_deref().map(|y| y.trim().to_string()))
            .unwrap_or_default();
        groups
            .entry((normalize_surname(surname), year))
            .or_default()
            .push(reference);
    }

    for ((surname, year), mut members) in groups {
        if members.len() < 2 {
            continue;
        }

        let locale = group_locale(&members, default_locale);
        members.sort_by_cached_key(|r| (collation_key(&r.title, locale), r.id.clone()));

        debug!(
            surname = %surname,
            year = %year,
            size = members.len(),
            "Assigning year suffixes"
        );
        for (i, reference) in members.iter().enumerate() {
            suffixes.insert(reference.id.clone(), locale.year_suffix(i));
        }
    }

    suffixes
}

/// Shared locale of a collision group, else the default
fn group_locale(members: &[&Reference], default_locale: Locale) -> Locale {
    let mut locales = members.iter().map(|r| resolve_locale(r, default_locale));
    match locales.next() {
        Some(first) if locales.all(|l| l == first) => first,
        _ => default_locale,
    }
}

/// Write computed suffixes into `year_suffix`, clearing stale ones
pub fn disambiguate(references: &mut [Reference], style: &StyleDefinition, default_locale: Locale) {
    let suffixes = compute_suffixes(references, style, default_locale);
    for reference in references.iter_mut() {
        reference.year_suffix = suffixes.get(&reference.id).cloned();
    }
}
