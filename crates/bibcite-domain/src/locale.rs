//! Locale-dependent citation terms

use serde::{Deserialize, Serialize};

use crate::author::contains_thai;
use crate::reference::Reference;

/// Thai consonants in dictionary order, without the obsolete ฃ and ฅ
const THAI_SUFFIX_ALPHABET: &[char] = &[
    'ก', 'ข', 'ค', 'ฆ', 'ง', 'จ', 'ฉ', 'ช', 'ซ', 'ฌ', 'ญ', 'ฎ', 'ฏ', 'ฐ', 'ฑ', 'ฒ', 'ณ', 'ด', 'ต',
    'ถ', 'ท', 'ธ', 'น', 'บ', 'ป', 'ผ', 'ฝ', 'พ', 'ฟ', 'ภ', 'ม', 'ย', 'ร', 'ล', 'ว', 'ศ', 'ษ', 'ส',
    'ห', 'ฬ', 'อ', 'ฮ',
];

/// Language used for terms, suffixes and collation
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Thai,
}

impl Locale {
    /// Parse a BCP-47-ish language tag ("th", "th-TH", "tha", "en-US")
    pub fn from_language_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match primary.as_str() {
            "th" | "tha" | "thai" => Some(Self::Thai),
            "en" | "eng" | "english" => Some(Self::English),
            _ => None,
        }
    }

    /// Resolve the locale of a reference.
    ///
    /// An explicit language tag wins; otherwise Thai script in the primary
    /// author or title selects Thai.
    pub fn for_reference(reference: &Reference) -> Self {
        if let Some(locale) = reference
            .language
            .as_deref()
            .and_then(Self::from_language_tag)
        {
            return locale;
        }
        let primary_is_thai = reference
            .primary_author()
            .map(|a| contains_thai(a.family_name()))
            .unwrap_or(false);
        if primary_is_thai || contains_thai(&reference.title) {
            Self::Thai
        } else {
            Self::English
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Thai => "th",
        }
    }

    /// Token appended to truncated author lists
    pub fn et_al(&self) -> &'static str {
        match self {
            Self::English => "et al.",
            Self::Thai => "และคณะ",
        }
    }

    /// Conjunction used between the last two names when the style asks
    /// for a word rather than a symbol
    pub fn and_word(&self) -> &'static str {
        match self {
            Self::English => "and",
            Self::Thai => "และ",
        }
    }

    /// Year-suffix for the zero-based position within a collision group.
    ///
    /// English: a, b, …, z, aa, ab, …  Thai: ก, ข, ค, …
    pub fn year_suffix(&self, index: usize) -> String {
        let alphabet: Vec<char> = match self {
            Self::English => ('a'..='z').collect(),
            Self::Thai => THAI_SUFFIX_ALPHABET.to_vec(),
        };
        bijective(index, &alphabet)
    }
}

/// Bijective base-n numbering: 0 → a, 25 → z, 26 → aa
fn bijective(index: usize, alphabet: &[char]) -> String {
    let base = alphabet.len();
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(alphabet[n % base]);
        n /= base;
    }
    out.iter().rev().collect()
}
