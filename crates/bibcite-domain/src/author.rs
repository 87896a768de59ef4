//! Author representation and name parsing

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// The role a person plays for a reference
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRole {
    #[default]
    Author,
    Editor,
    Translator,
    Contributor,
}

/// A personal or corporate name.
///
/// `Structured` names follow the Western given/family convention and may be
/// inverted ("Smith, J."). `Literal` names (Thai personal names, institutions)
/// are always rendered exactly as given.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersonName {
    Structured {
        first_name: Option<String>,
        middle_name: Option<String>,
        last_name: String,
    },
    Literal {
        full_name: String,
    },
}

/// Represents a creator of a reference
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Author {
    pub name: PersonName,
    #[serde(default)]
    pub role: AuthorRole,
}

impl Author {
    /// Create a structured author from given and family names
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let first = first_name.into();
        Self {
            name: PersonName::Structured {
                first_name: if first.trim().is_empty() {
                    None
                } else {
                    Some(first)
                },
                middle_name: None,
                last_name: last_name.into(),
            },
            role: AuthorRole::Author,
        }
    }

    /// Create a non-invertible author rendered exactly as given
    pub fn literal(full_name: impl Into<String>) -> Self {
        Self {
            name: PersonName::Literal {
                full_name: full_name.into(),
            },
            role: AuthorRole::Author,
        }
    }

    /// Builder method to add a middle name (ignored for literal names)
    pub fn with_middle_name(mut self, middle: impl Into<String>) -> Self {
        if let PersonName::Structured { middle_name, .. } = &mut self.name {
            *middle_name = Some(middle.into());
        }
        self
    }

    /// Builder method to set the role
    pub fn with_role(mut self, role: AuthorRole) -> Self {
        self.role = role;
        self
    }

    /// Whether style rules may invert this name
    pub fn is_invertible(&self) -> bool {
        matches!(self.name, PersonName::Structured { .. })
    }

    /// Family name for structured names, the full name for literal ones
    pub fn family_name(&self) -> &str {
        match &self.name {
            PersonName::Structured { last_name, .. } => last_name,
            PersonName::Literal { full_name } => full_name,
        }
    }

    /// Given names in order (first, then middle names)
    pub fn given_names(&self) -> Vec<&str> {
        match &self.name {
            PersonName::Structured {
                first_name,
                middle_name,
                ..
            } => first_name
                .iter()
                .chain(middle_name.iter())
                .flat_map(|s| s.split_whitespace())
                .collect(),
            PersonName::Literal { .. } => Vec::new(),
        }
    }

    /// Format as "Given Middle Family" for display
    pub fn display_name(&self) -> String {
        match &self.name {
            PersonName::Structured { last_name, .. } => {
                let mut parts = self.given_names();
                parts.push(last_name);
                parts.join(" ")
            }
            PersonName::Literal { full_name } => full_name.clone(),
        }
    }

    /// Format as "Family, Given Middle" as used by BibTeX and RIS
    pub fn inverted_name(&self) -> String {
        match &self.name {
            PersonName::Structured { last_name, .. } => {
                let given = self.given_names().join(" ");
                if given.is_empty() {
                    last_name.clone()
                } else {
                    format!("{}, {}", last_name, given)
                }
            }
            PersonName::Literal { full_name } => full_name.clone(),
        }
    }
}

// ===== Author parsing utilities =====

lazy_static! {
    /// Lowercase surname particles that belong to the family name
    static ref PARTICLES: HashSet<&'static str> = {
        let words = [
            "van", "von", "der", "den", "de", "del", "della", "di", "da", "du",
            "la", "le", "ter", "ten", "dos", "das", "bin", "al", "el",
        ];
        words.into_iter().collect()
    };
}

/// Whether the text contains characters from the Thai block
pub fn contains_thai(text: &str) -> bool {
    text.chars().any(|c| ('\u{0E00}'..='\u{0E7F}').contains(&c))
}

/// Split an author field into individual names.
///
/// Handles " and " separators (BibTeX style) and ";" separators, and ignores
/// separators inside braces so that `{Procter and Gamble}` stays whole.
pub fn split_authors(author_field: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let chars: Vec<char> = author_field.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }

        if depth == 0 && c == ';' {
            names.push(std::mem::take(&mut current));
            i += 1;
            continue;
        }

        if depth == 0 && c.is_whitespace() && starts_with_and(&chars[i..]) {
            names.push(std::mem::take(&mut current));
            i += 5;
            continue;
        }

        current.push(c);
        i += 1;
    }
    names.push(current);

    names
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn starts_with_and(chars: &[char]) -> bool {
    chars.len() >= 5
        && chars[0].is_whitespace()
        && chars[1].eq_ignore_ascii_case(&'a')
        && chars[2].eq_ignore_ascii_case(&'n')
        && chars[3].eq_ignore_ascii_case(&'d')
        && chars[4].is_whitespace()
}

/// Parse an author field into authors with the given role.
///
/// The BibTeX placeholder `others` is dropped.
pub fn parse_author_string(input: &str, role: AuthorRole) -> Vec<Author> {
    split_authors(input)
        .into_iter()
        .filter(|name| name != "others")
        .map(|name| parse_single_author(&name).with_role(role))
        .collect()
}

/// Parse a single name.
///
/// Accepts "Last, First Middle", "First Middle Last" (with lowercase
/// particles kept in the surname), brace-protected corporate names and
/// Thai-script names; the last two become literal names.
pub fn parse_single_author(input: &str) -> Author {
    let trimmed = input.trim();

    if is_fully_braced(trimmed) {
        return Author::literal(trimmed[1..trimmed.len() - 1].trim());
    }

    let cleaned = trimmed.replace(['{', '}'], "");
    if contains_thai(&cleaned) {
        return Author::literal(cleaned.trim());
    }

    // "Last, First" (a middle "Jr." part is folded into the surname)
    if cleaned.contains(',') {
        let parts: Vec<&str> = cleaned.split(',').map(str::trim).collect();
        let mut last = parts[0].to_string();
        let given = if parts.len() >= 3 {
            last = format!("{}, {}", last, parts[1]);
            parts[2..].join(" ")
        } else {
            parts.get(1).copied().unwrap_or_default().to_string()
        };
        return structured_from_given(&given, last);
    }

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    match tokens.len() {
        0 => Author::literal(""),
        1 => Author::new("", tokens[0]),
        n => {
            // Surname starts at the first particle after the first token,
            // otherwise it is the last token
            let surname_start = (1..n - 1)
                .find(|&i| PARTICLES.contains(tokens[i]))
                .unwrap_or(n - 1);
            let given = tokens[..surname_start].join(" ");
            let last = tokens[surname_start..].join(" ");
            structured_from_given(&given, last)
        }
    }
}

fn structured_from_given(given: &str, last: String) -> Author {
    let mut tokens = given.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let middle: Vec<&str> = tokens.collect();
    let author = Author::new(first, last);
    if middle.is_empty() {
        author
    } else {
        author.with_middle_name(middle.join(" "))
    }
}

fn is_fully_braced(s: &str) -> bool {
    if !(s.starts_with('{') && s.ends_with('}')) || s.len() < 2 {
        return false;
    }
    // The opening brace must close at the very end
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 && i != s.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Normalize a surname for grouping and comparison.
///
/// Lowercases, strips Latin diacritics and tone marks, and drops punctuation.
/// Thai letters and vowel signs are kept.
pub fn normalize_surname(name: &str) -> String {
    name.nfkd()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
