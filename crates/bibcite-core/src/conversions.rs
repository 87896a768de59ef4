//! Conversion functions between the canonical model and BibTeX entries
//!
//! Field names map through a fixed table; anything without a canonical slot
//! is kept in `extras` under its original key. Values are decoded to plain
//! Unicode on the way in and escaped by the BibTeX formatter on the way out.

use std::collections::HashSet;

use bibcite_bibtex::{decode_html_entities, decode_latex, BibTeXEntry, BibTeXEntryType};
use bibcite_domain::{
    parse_single_author, split_authors, Author, AuthorRole, PersonName, Reference, ReferenceType,
};
use bibcite_identifiers::{generate_cite_key, make_cite_key_unique};

use crate::error::SerializationError;

/// Extras key holding a BibTeX entry type the reference type cannot express
pub const BIBTEX_TYPE_KEY: &str = "bibtex_type";

/// Extras key holding an RIS `TY` code the reference type cannot express
pub const RIS_TYPE_KEY: &str = "ris_type";

/// Fields whose values are never LaTeX-decoded
const VERBATIM_FIELDS: &[&str] = &["url", "doi", "eprint", "file"];

// ===== BibTeXEntry → Reference =====

/// Reference type for a BibTeX entry type
pub fn reference_type_for(entry_type: &BibTeXEntryType) -> ReferenceType {
    match entry_type {
        BibTeXEntryType::Article => ReferenceType::Journal,
        BibTeXEntryType::Book
        | BibTeXEntryType::InBook
        | BibTeXEntryType::Booklet
        | BibTeXEntryType::InCollection => ReferenceType::Book,
        BibTeXEntryType::InProceedings | BibTeXEntryType::Proceedings => ReferenceType::Conference,
        BibTeXEntryType::MastersThesis | BibTeXEntryType::PhdThesis | BibTeXEntryType::Thesis => {
            ReferenceType::Thesis
        }
        BibTeXEntryType::TechReport | BibTeXEntryType::Report => ReferenceType::Report,
        BibTeXEntryType::Online => ReferenceType::Website,
        BibTeXEntryType::Manual
        | BibTeXEntryType::Unpublished
        | BibTeXEntryType::Misc
        | BibTeXEntryType::Other(_) => ReferenceType::Other,
    }
}

/// BibTeX entry type written for a reference type
pub fn bibtex_type_for(reference_type: ReferenceType) -> BibTeXEntryType {
    match reference_type {
        ReferenceType::Book => BibTeXEntryType::Book,
        ReferenceType::Journal => BibTeXEntryType::Article,
        ReferenceType::Website => BibTeXEntryType::Online,
        ReferenceType::Conference => BibTeXEntryType::InProceedings,
        ReferenceType::Thesis => BibTeXEntryType::PhdThesis,
        ReferenceType::Report => BibTeXEntryType::TechReport,
        ReferenceType::Other => BibTeXEntryType::Misc,
    }
}

fn decode_value(key: &str, raw: &str) -> String {
    let unescaped = decode_html_entities(raw);
    if VERBATIM_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(key)) {
        unescaped.trim().to_string()
    } else {
        decode_latex(&unescaped)
    }
}

/// Parse a raw name list, keeping `{...}` names as literal names
fn decode_names(raw: &str, role: AuthorRole) -> Vec<Author> {
    let unescaped = decode_html_entities(raw);
    split_authors(&unescaped)
        .into_iter()
        .filter(|name| name != "others")
        .map(|name| {
            let author = match braced_inner(&name) {
                Some(inner) => Author::literal(decode_latex(inner)),
                None => parse_single_author(&decode_latex(&name)),
            };
            author.with_role(role)
        })
        .collect()
}

fn braced_inner(name: &str) -> Option<&str> {
    let inner = name.strip_prefix('{')?.strip_suffix('}')?;
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

fn set_once(slot: &mut Option<String>, value: String) -> Option<String> {
    if slot.is_some() {
        Some(value)
    } else {
        *slot = Some(value);
        None
    }
}

/// Convert a parsed BibTeX entry to a reference whose id is the cite key
pub fn bibtex_entry_to_reference(entry: &BibTeXEntry) -> Reference {
    let reference_type = reference_type_for(&entry.entry_type);
    let mut reference = Reference::new(entry.cite_key.clone(), "", reference_type);

    if bibtex_type_for(reference_type) != entry.entry_type {
        reference
            .extras
            .insert(BIBTEX_TYPE_KEY.to_string(), entry.entry_type.name().to_string());
    }

    let mut title_seen = false;
    for field in &entry.fields {
        let key = field.key.to_lowercase();

        let role = match key.as_str() {
            "author" => Some(AuthorRole::Author),
            "editor" => Some(AuthorRole::Editor),
            "translator" => Some(AuthorRole::Translator),
            _ => None,
        };
        if let Some(role) = role {
            reference.authors.extend(decode_names(&field.value, role));
            continue;
        }

        let value = decode_value(&key, &field.value);
        let leftover = match key.as_str() {
            "title" if !title_seen => {
                title_seen = true;
                reference.title = value;
                None
            }
            "year" => set_once(&mut reference.year, value),
            "journal" | "journaltitle" | "booktitle" => {
                set_once(&mut reference.journal_name, value)
            }
            "publisher" | "school" | "institution" | "organization" => {
                set_once(&mut reference.publisher, value)
            }
            "volume" => set_once(&mut reference.volume, value),
            "number" | "issue" => set_once(&mut reference.issue, value),
            "pages" => set_once(&mut reference.pages, value),
            "edition" => set_once(&mut reference.edition, value),
            "doi" => set_once(&mut reference.doi, value),
            "isbn" => set_once(&mut reference.isbn, value),
            "url" => set_once(&mut reference.url, value),
            "abstract" => set_once(&mut reference.abstract_text, value),
            "note" => set_once(&mut reference.notes, value),
            "language" | "langid" => set_once(&mut reference.language, value),
            _ => Some(value),
        };
        if let Some(value) = leftover {
            reference.extras.insert(field.key.clone(), value);
        }
    }

    if reference.year.is_none() {
        reference.year = reference
            .extras
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("date"))
            .and_then(|(_, date)| leading_year(date));
    }

    reference
}

fn leading_year(date: &str) -> Option<String> {
    let digits: String = date.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    (digits.len() == 4).then_some(digits)
}

// ===== Reference → BibTeXEntry =====

/// Whether a string can be written as a BibTeX field name
pub fn is_valid_bibtex_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+'))
}

fn format_names(authors: &[&Author]) -> String {
    authors
        .iter()
        .map(|a| match &a.name {
            PersonName::Literal { full_name } => format!("{{{}}}", full_name),
            PersonName::Structured { .. } => a.inverted_name(),
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Cite key `Surname2020a`, made unique against `taken`
pub fn cite_key_for(reference: &Reference, taken: &HashSet<String>) -> String {
    let base = generate_cite_key(
        reference.primary_surname(),
        reference.year.as_deref(),
        reference.year_suffix.as_deref(),
    );
    make_cite_key_unique(&base, taken)
}

/// Convert a reference to a BibTeX entry.
///
/// Contributors and extras that cannot be written are reported and left out.
pub fn reference_to_bibtex_entry(
    reference: &Reference,
    cite_key: impl Into<String>,
) -> (BibTeXEntry, Vec<SerializationError>) {
    let entry_type = reference
        .extras
        .get(BIBTEX_TYPE_KEY)
        .map(|t| BibTeXEntryType::from_name(t))
        .filter(|t| reference_type_for(t) == reference.reference_type)
        .unwrap_or_else(|| bibtex_type_for(reference.reference_type));

    let mut entry = BibTeXEntry::new(cite_key, entry_type);
    let mut errors = Vec::new();

    if !reference.title.is_empty() {
        entry.add_field("title", reference.title.clone());
    }

    for (role, key) in [
        (AuthorRole::Author, "author"),
        (AuthorRole::Editor, "editor"),
        (AuthorRole::Translator, "translator"),
    ] {
        let names: Vec<&Author> = reference.creators(role).collect();
        if !names.is_empty() {
            entry.add_field(key, format_names(&names));
        }
    }
    if reference.creators(AuthorRole::Contributor).next().is_some() {
        errors.push(SerializationError {
            reference_id: reference.id.clone(),
            field: "authors".to_string(),
            reason: "BibTeX has no field for contributors".to_string(),
        });
    }

    let container_key = match entry.entry_type {
        BibTeXEntryType::InProceedings
        | BibTeXEntryType::Proceedings
        | BibTeXEntryType::InCollection
        | BibTeXEntryType::InBook => "booktitle",
        _ => "journal",
    };
    let publisher_key = match reference.reference_type {
        ReferenceType::Thesis => "school",
        ReferenceType::Report => "institution",
        _ => "publisher",
    };

    for (key, value) in [
        ("year", &reference.year),
        (container_key, &reference.journal_name),
        ("volume", &reference.volume),
        ("number", &reference.issue),
        ("pages", &reference.pages),
        ("edition", &reference.edition),
        (publisher_key, &reference.publisher),
        ("doi", &reference.doi),
        ("isbn", &reference.isbn),
        ("url", &reference.url),
        ("abstract", &reference.abstract_text),
        ("note", &reference.notes),
        ("language", &reference.language),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            entry.add_field(key, value);
        }
    }

    for (key, value) in &reference.extras {
        if key == BIBTEX_TYPE_KEY || key == RIS_TYPE_KEY {
            continue;
        }
        let reason = if !is_valid_bibtex_key(key) {
            Some("not a valid BibTeX field name")
        } else if entry.has_field(key) {
            Some("conflicts with a canonical field")
        } else {
            None
        };
        match reason {
            Some(reason) => errors.push(SerializationError {
                reference_id: reference.id.clone(),
                field: key.clone(),
                reason: reason.to_string(),
            }),
            None => entry.add_field(key.clone(), value.clone()),
        }
    }

    (entry, errors)
}

/// Convert a batch, assigning unique cite keys
pub fn references_to_bibtex_entries(
    references: &[Reference],
) -> (Vec<BibTeXEntry>, Vec<SerializationError>) {
    let mut taken = HashSet::new();
    let mut entries = Vec::with_capacity(references.len());
    let mut errors = Vec::new();

    for reference in references {
        let key = cite_key_for(reference, &taken);
        taken.insert(key.clone());
        let (entry, entry_errors) = reference_to_bibtex_entry(reference, key);
        entries.push(entry);
        errors.extend(entry_errors);
    }
    (entries, errors)
}
