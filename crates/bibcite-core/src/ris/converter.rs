//! Conversion between RIS entries and references
//!
//! `KW` lines and `DA` dates share the `keywords` and `date` extras keys
//! with BibTeX, so either format can carry them to the other. Unknown tags
//! are kept in `extras` under the tag itself.

use std::collections::{BTreeMap, HashSet};

use bibcite_bibtex::{decode_html_entities, decode_latex_accents};
use bibcite_domain::{
    contains_thai, parse_single_author, Author, AuthorRole, PersonName, Reference, ReferenceType,
};
use bibcite_identifiers::is_valid_isbn;

use super::entry::{is_ris_tag, RisEntry, RisType};
use crate::conversions::{BIBTEX_TYPE_KEY, RIS_TYPE_KEY};
use crate::error::SerializationError;

const KEYWORDS_KEY: &str = "keywords";
const DATE_KEY: &str = "date";

/// Tags whose values are used verbatim
const VERBATIM_TAGS: &[&str] = &["UR", "DO", "L1", "L2", "L4"];

/// Reference type for an RIS `TY` code
pub fn reference_type_for(ris_type: &RisType) -> ReferenceType {
    match ris_type {
        RisType::Jour | RisType::Ejour | RisType::Mgzn | RisType::News => ReferenceType::Journal,
        RisType::Book | RisType::Ebook | RisType::Edbook | RisType::Chap => ReferenceType::Book,
        RisType::Conf | RisType::Cpaper => ReferenceType::Conference,
        RisType::Thes => ReferenceType::Thesis,
        RisType::Rprt => ReferenceType::Report,
        RisType::Elec | RisType::Blog => ReferenceType::Website,
        RisType::Unpb | RisType::Gen | RisType::Other(_) => ReferenceType::Other,
    }
}

/// `TY` code written for a reference type
pub fn ris_type_for(reference_type: ReferenceType) -> RisType {
    match reference_type {
        ReferenceType::Journal => RisType::Jour,
        ReferenceType::Book => RisType::Book,
        ReferenceType::Conference => RisType::Cpaper,
        ReferenceType::Thesis => RisType::Thes,
        ReferenceType::Report => RisType::Rprt,
        ReferenceType::Website => RisType::Elec,
        ReferenceType::Other => RisType::Gen,
    }
}

// ===== RisEntry → Reference =====

fn decode_value(tag: &str, raw: &str) -> String {
    let value = decode_html_entities(raw.trim());
    if VERBATIM_TAGS.contains(&tag) {
        value
    } else {
        decode_latex_accents(&value)
    }
}

/// Whether `value` reads back unchanged once written under `tag`
fn survives_round_trip(tag: &str, value: &str) -> bool {
    let written = value.split_whitespace().collect::<Vec<_>>().join(" ");
    decode_value(tag, &written) == written
}

/// Store a value in extras, joining repeats of the same key
fn stash(extras: &mut BTreeMap<String, String>, key: &str, value: String) {
    extras
        .entry(key.to_string())
        .and_modify(|existing| {
            existing.push_str("; ");
            existing.push_str(&value);
        })
        .or_insert(value);
}

fn leading_year(date: &str) -> Option<String> {
    let digits: String = date.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    (digits.len() == 4).then_some(digits)
}

/// Convert an RIS entry to a reference.
///
/// The `ID` tag becomes the reference id; entries without one get a fresh id.
pub fn ris_entry_to_reference(entry: &RisEntry) -> Reference {
    let reference_type = reference_type_for(&entry.entry_type);
    let mut reference = match entry.id() {
        Some(id) => Reference::new(id, "", reference_type),
        None => Reference::with_generated_id("", reference_type),
    };

    if ris_type_for(reference_type) != entry.entry_type {
        reference
            .extras
            .insert(RIS_TYPE_KEY.to_string(), entry.entry_type.code().to_string());
    }

    let mut title_seen = false;
    let mut start_page = None;
    let mut end_page = None;
    let mut keywords = Vec::new();

    for tag in &entry.tags {
        let key = tag.tag.to_uppercase();
        let value = decode_value(&key, &tag.value);
        if value.is_empty() {
            continue;
        }

        let role = match key.as_str() {
            "AU" | "A1" => Some(AuthorRole::Author),
            "A2" | "ED" => Some(AuthorRole::Editor),
            "A4" => Some(AuthorRole::Translator),
            _ => None,
        };
        if let Some(role) = role {
            reference.authors.push(parse_single_author(&value).with_role(role));
            continue;
        }

        let slot = match key.as_str() {
            "ID" => continue,
            "TI" | "T1" if !title_seen => {
                title_seen = true;
                reference.title = value;
                continue;
            }
            "KW" => {
                keywords.push(value);
                continue;
            }
            "PY" | "Y1" => {
                if reference.year.is_none() {
                    reference.year = leading_year(&value);
                    if reference.year.as_deref() != Some(value.trim_end_matches('/'))
                        && entry.get_tag("DA").is_none()
                    {
                        stash(&mut reference.extras, DATE_KEY, value);
                    }
                    continue;
                }
                None
            }
            "DA" => {
                if reference.year.is_none() {
                    reference.year = leading_year(&value);
                }
                stash(&mut reference.extras, DATE_KEY, value);
                continue;
            }
            "SP" => Some(&mut start_page),
            "EP" => Some(&mut end_page),
            "JO" | "JF" | "T2" | "BT" => Some(&mut reference.journal_name),
            "PB" => Some(&mut reference.publisher),
            "VL" => Some(&mut reference.volume),
            "IS" => Some(&mut reference.issue),
            "ET" => Some(&mut reference.edition),
            "DO" => Some(&mut reference.doi),
            "SN" if is_valid_isbn(&value) => Some(&mut reference.isbn),
            "UR" => Some(&mut reference.url),
            "AB" | "N2" => Some(&mut reference.abstract_text),
            "N1" => Some(&mut reference.notes),
            "LA" => Some(&mut reference.language),
            _ => None,
        };

        match slot {
            Some(slot) if slot.is_none() => *slot = Some(value),
            _ => stash(&mut reference.extras, &key, value),
        }
    }

    reference.pages = match (start_page, end_page) {
        (Some(start), Some(end)) if start != end => Some(format!("{}–{}", start, end)),
        (Some(start), _) => Some(start),
        (None, end) => end,
    };
    if !keywords.is_empty() {
        reference.extras.insert(KEYWORDS_KEY.to_string(), keywords.join(", "));
    }

    reference
}

// ===== Reference → RisEntry =====

fn format_name(author: &Author) -> String {
    match &author.name {
        PersonName::Literal { full_name } if contains_thai(full_name) => full_name.clone(),
        PersonName::Literal { full_name } => format!("{{{}}}", full_name),
        PersonName::Structured { .. } => author.inverted_name(),
    }
}

fn split_pages(pages: &str) -> (String, Option<String>) {
    match pages.split_once(['–', '-']) {
        Some((start, end)) => {
            let end = end.trim_start_matches(['–', '-']).trim();
            (start.trim().to_string(), Some(end.to_string()).filter(|e| !e.is_empty()))
        }
        None => (pages.trim().to_string(), None),
    }
}

/// Convert a reference to an RIS entry.
///
/// Contributors and extras without an RIS tag are reported and left out.
pub fn reference_to_ris_entry(reference: &Reference) -> (RisEntry, Vec<SerializationError>) {
    let entry_type = reference
        .extras
        .get(RIS_TYPE_KEY)
        .map(|t| RisType::from_code(t))
        .filter(|t| reference_type_for(t) == reference.reference_type)
        .unwrap_or_else(|| ris_type_for(reference.reference_type));

    let mut entry = RisEntry::new(entry_type);
    let mut errors = Vec::new();
    let mut dropped = |field: &str, reason: &str| {
        errors.push(SerializationError {
            reference_id: reference.id.clone(),
            field: field.to_string(),
            reason: reason.to_string(),
        })
    };

    entry.add_tag("ID", reference.id.clone());
    if !reference.title.is_empty() {
        entry.add_tag("TI", reference.title.clone());
    }

    for author in &reference.authors {
        let tag = match author.role {
            AuthorRole::Author => "AU",
            AuthorRole::Editor => "A2",
            AuthorRole::Translator => "A4",
            AuthorRole::Contributor => {
                dropped("authors", "RIS has no tag for contributors");
                continue;
            }
        };
        entry.add_tag(tag, format_name(author));
    }

    let optional = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(year) = optional(&reference.year) {
        entry.add_tag("PY", year);
    }
    if let Some(date) = reference.extras.get(DATE_KEY) {
        entry.add_tag("DA", date.clone());
    }
    if let Some(container) = optional(&reference.journal_name) {
        entry.add_tag("T2", container);
    }
    for (tag, value) in [
        ("PB", &reference.publisher),
        ("VL", &reference.volume),
        ("IS", &reference.issue),
    ] {
        if let Some(value) = optional(value) {
            entry.add_tag(tag, value);
        }
    }
    if let Some(pages) = optional(&reference.pages) {
        let (start, end) = split_pages(&pages);
        entry.add_tag("SP", start);
        if let Some(end) = end {
            entry.add_tag("EP", end);
        }
    }
    for (tag, value) in [
        ("ET", &reference.edition),
        ("DO", &reference.doi),
        ("SN", &reference.isbn),
        ("UR", &reference.url),
        ("AB", &reference.abstract_text),
        ("N1", &reference.notes),
        ("LA", &reference.language),
    ] {
        if let Some(value) = optional(value) {
            entry.add_tag(tag, value);
        }
    }
    if let Some(keywords) = reference.extras.get(KEYWORDS_KEY) {
        keywords
            .split([',', ';'])
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .for_each(|k| entry.add_tag("KW", k));
    }

    let emitted: HashSet<String> = entry.tags.iter().map(|t| t.tag.clone()).collect();
    for (key, value) in &reference.extras {
        if [BIBTEX_TYPE_KEY, RIS_TYPE_KEY, KEYWORDS_KEY, DATE_KEY].contains(&key.as_str()) {
            continue;
        }
        if !is_ris_tag(key) || matches!(key.as_str(), "TY" | "ER") {
            dropped(key, "no RIS tag for this field");
        } else if emitted.contains(key) {
            dropped(key, "conflicts with a canonical field");
        } else {
            entry.add_tag(key.clone(), value.clone());
        }
    }

    for tag in &entry.tags {
        if !survives_round_trip(&tag.tag, &tag.value) {
            dropped(
                tag.tag.as_str(),
                "written as is, but an HTML entity or LaTeX accent in it is decoded on import",
            );
        }
    }

    (entry, errors)
}

/// Convert a batch of references
pub fn references_to_ris_entries(
    references: &[Reference],
) -> (Vec<RisEntry>, Vec<SerializationError>) {
    let mut errors = Vec::new();
    let entries = references
        .iter()
        .map(|reference| {
            let (entry, entry_errors) = reference_to_ris_entry(reference);
            errors.extend(entry_errors);
            entry
        })
        .collect();
    (entries, errors)
}
