//! In-text citation rendering

use bibcite_domain::{Locale, Reference, ReferenceType};
use serde::{Deserialize, Serialize};

use crate::collation::resolve_locale;
use crate::names;
use crate::render::markup::escape_html;
use crate::style::{CitationKind, StyleDefinition};

/// One cited reference at a citation site
#[derive(Debug, Clone, Copy)]
pub struct CitationItem<'a> {
    pub reference: &'a Reference,
    /// Year suffix from disambiguation
    pub suffix: Option<&'a str>,
    /// Citation number from the numberer
    pub number: Option<u32>,
    /// Page or other pinpoint
    pub locator: Option<&'a str>,
}

impl<'a> CitationItem<'a> {
    pub fn new(reference: &'a Reference) -> Self {
        Self {
            reference,
            suffix: None,
            number: None,
            locator: None,
        }
    }
}

/// Inputs that belong to the citation site rather than a reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CitationContext {
    /// Note number for footnote styles, supplied by the document
    pub note_number: Option<u32>,
    pub default_locale: Locale,
}

/// A rendered in-text citation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InTextCitation {
    /// Marker placed in the running text
    pub text: String,
    /// The marker is set as superscript
    pub superscript: bool,
    /// Note text for footnote styles
    pub note: Option<String>,
}

impl InTextCitation {
    pub fn to_html(&self) -> String {
        if self.superscript {
            format!("<sup>{}</sup>", escape_html(&self.text))
        } else {
            escape_html(&self.text)
        }
    }
}

/// Render the marker for one citation site
pub fn render_in_text(
    items: &[CitationItem<'_>],
    style: &StyleDefinition,
    context: &CitationContext,
) -> InTextCitation {
    if items.is_empty() {
        return InTextCitation::default();
    }

    match style.kind {
        CitationKind::AuthorYear => InTextCitation {
            text: author_year(items, style, context.default_locale),
            superscript: false,
            note: None,
        },
        CitationKind::Numeric => InTextCitation {
            text: numeric(items, style),
            superscript: style.in_text.superscript,
            note: None,
        },
        CitationKind::Footnote => {
            let note = footnote(items, style, context.default_locale);
            match context.note_number {
                Some(n) => InTextCitation {
                    text: n.to_string(),
                    superscript: style.in_text.superscript,
                    note: Some(note),
                },
                None => InTextCitation {
                    text: note.clone(),
                    superscript: false,
                    note: Some(note),
                },
            }
        }
    }
}

/// Names for an item, or its quoted short title when it has no creators
fn item_names(item: &CitationItem<'_>, style: &StyleDefinition, default_locale: Locale) -> String {
    let locale = resolve_locale(item.reference, default_locale);
    names::in_text_names(item.reference, &style.in_text, locale).unwrap_or_else(|| {
        let (open, close) = style.quotes;
        format!("{}{}{}", open, short_title(&item.reference.title), close)
    })
}

fn item_year(item: &CitationItem<'_>, style: &StyleDefinition) -> String {
    let reference = item.reference;
    let year = reference
        .year_digits()
        .map(str::to_string)
        .or_else(|| {
            reference
                .year
                .as_deref()
                .map(str::trim)
                .filter(|y| !y.is_empty())
                .map(str::to_string)
        });
    let suffix = item.suffix.filter(|s| !s.is_empty());
    match (year, suffix) {
        (Some(year), Some(suffix)) => format!("{}{}", year, suffix),
        (Some(year), None) => year,
        (None, Some(suffix)) => format!("{}-{}", style.no_date, suffix),
        (None, None) => style.no_date.to_string(),
    }
}

fn with_locator(mut text: String, item: &CitationItem<'_>, style: &StyleDefinition) -> String {
    if let Some(locator) = item.locator.map(str::trim).filter(|l| !l.is_empty()) {
        text.push_str(style.in_text.locator_delimiter);
        text.push_str(style.in_text.locator_prefix);
        text.push_str(locator);
    }
    text
}

fn author_year(
    items: &[CitationItem<'_>],
    style: &StyleDefinition,
    default_locale: Locale,
) -> String {
    let rules = &style.in_text;
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for item in items {
        let names = item_names(item, style, default_locale);
        let detail = if rules.include_year {
            Some(with_locator(item_year(item, style), item, style))
        } else {
            item.locator
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| format!("{}{}", rules.locator_prefix, l))
        };

        match groups.last_mut() {
            Some((previous, details)) if rules.collapse_same_author && *previous == names => {
                details.extend(detail);
            }
            _ => groups.push((names, detail.into_iter().collect())),
        }
    }

    let delimiter = if rules.include_year {
        rules.author_year_delimiter
    } else {
        rules.locator_delimiter
    };
    let body = groups
        .into_iter()
        .map(|(names, details)| {
            if details.is_empty() {
                names
            } else {
                format!("{}{}{}", names, delimiter, details.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(rules.multi_delimiter);

    format!("{}{}{}", rules.open, body, rules.close)
}

fn numeric(items: &[CitationItem<'_>], style: &StyleDefinition) -> String {
    let rules = &style.in_text;
    let mut plain_numbers: Vec<u32> = Vec::new();
    let mut located: Vec<String> = Vec::new();
    let mut unnumbered = false;

    for item in items {
        match (item.number, item.locator.filter(|l| !l.trim().is_empty())) {
            (Some(n), None) => plain_numbers.push(n),
            (Some(n), Some(_)) => located.push(with_locator(n.to_string(), item, style)),
            (None, _) => unnumbered = true,
        }
    }
    plain_numbers.sort_unstable();
    plain_numbers.dedup();

    let mut parts = if rules.collapse_ranges {
        collapse_ranges(&plain_numbers)
    } else {
        plain_numbers.iter().map(u32::to_string).collect()
    };
    parts.extend(located);
    if unnumbered {
        parts.push("?".to_string());
    }

    format!("{}{}{}", rules.open, parts.join(rules.multi_delimiter), rules.close)
}

/// Runs of three or more consecutive numbers become "1–3"
pub fn collapse_ranges(numbers: &[u32]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < numbers.len() {
        let start = numbers[i];
        let mut end = i;
        while end + 1 < numbers.len() && numbers[end + 1] == numbers[end] + 1 {
            end += 1;
        }
        if end - i >= 2 {
            out.push(format!("{}\u{2013}{}", start, numbers[end]));
        } else {
            out.extend(numbers[i..=end].iter().map(u32::to_string));
        }
        i = end + 1;
    }
    out
}

fn footnote(items: &[CitationItem<'_>], style: &StyleDefinition, default_locale: Locale) -> String {
    let notes: Vec<String> = items
        .iter()
        .map(|item| {
            let locale = resolve_locale(item.reference, default_locale);
            let title = short_title(&item.reference.title);
            let title = match item.reference.reference_type {
                ReferenceType::Book | ReferenceType::Report | ReferenceType::Thesis => title,
                _ => {
                    let (open, close) = style.quotes;
                    format!("{}{}{}", open, title, close)
                }
            };
            let note = match names::in_text_names(item.reference, &style.in_text, locale) {
                Some(names) => format!("{}, {}", names, title),
                None => title,
            };
            with_locator(note, item, style)
        })
        .collect();
    format!("{}.", notes.join(style.in_text.multi_delimiter))
}

/// Title up to the first colon, or a placeholder when empty
pub fn short_title(title: &str) -> String {
    let short = title.split(':').next().unwrap_or_default().trim();
    if short.is_empty() {
        super::entry::UNTITLED.to_string()
    } else {
        short.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{APA7, CHICAGO17, HARVARD, IEEE, MLA9, NATURE, TURABIAN};
    use bibcite_domain::Author;

    fn smith(year: &str, title: &str) -> Reference {
        Reference::new(title, title, ReferenceType::Journal)
            .with_author(Author::new("J.", "Smith"))
            .with_year(year)
    }

    fn context() -> CitationContext {
        CitationContext::default()
    }

    #[test]
    fn test_apa_single() {
        let r = smith("2020", "X");
        let text = render_in_text(&[CitationItem::new(&r)], &APA7, &context()).text;
        assert_eq!(text, "(Smith, 2020)");
    }

    #[test]
    fn test_apa_suffixes_and_collapse() {
        let x = smith("2020", "X");
        let y = smith("2020", "Y");
        let items = [
            CitationItem {
                suffix: Some("a"),
                ..CitationItem::new(&x)
            },
            CitationItem {
                suffix: Some("b"),
                ..CitationItem::new(&y)
            },
        ];
        assert_eq!(render_in_text(&items, &APA7, &context()).text, "(Smith, 2020a, 2020b)");
    }

    #[test]
    fn test_apa_multiple_authors_and_locator() {
        let r = Reference::new("r", "T", ReferenceType::Book)
            .with_author(Author::new("J.", "Smith"))
            .with_author(Author::new("A.", "Doe"))
            .with_year("2019");
        let d = Reference::new("d", "U", ReferenceType::Book)
            .with_author(Author::new("B.", "Lee"))
            .with_year("2018");
        let items = [
            CitationItem {
                locator: Some("45"),
                ..CitationItem::new(&r)
            },
            CitationItem::new(&d),
        ];
        assert_eq!(
            render_in_text(&items, &APA7, &context()).text,
            "(Smith & Doe, 2019, p. 45; Lee, 2018)"
        );
    }

    #[test]
    fn test_mla_has_no_year() {
        let r = smith("2020", "X");
        let item = CitationItem {
            locator: Some("45"),
            ..CitationItem::new(&r)
        };
        assert_eq!(render_in_text(&[item], &MLA9, &context()).text, "(Smith 45)");
        assert_eq!(
            render_in_text(&[CitationItem::new(&r)], &MLA9, &context()).text,
            "(Smith)"
        );
    }

    #[test]
    fn test_chicago_and_harvard_locators() {
        let r = smith("2020", "X");
        let item = CitationItem {
            locator: Some("45"),
            ..CitationItem::new(&r)
        };
        assert_eq!(render_in_text(&[item], &CHICAGO17, &context()).text, "(Smith 2020, 45)");
        assert_eq!(
            render_in_text(&[item], &HARVARD, &context()).text,
            "(Smith, 2020, p. 45)"
        );
    }

    #[test]
    fn test_missing_author_uses_short_title() {
        let r = Reference::new("r", "Annual Report: Summary", ReferenceType::Report)
            .with_year("2021");
        assert_eq!(
            render_in_text(&[CitationItem::new(&r)], &APA7, &context()).text,
            "(\u{201C}Annual Report\u{201D}, 2021)"
        );
    }

    #[test]
    fn test_missing_year_uses_no_date() {
        let r = Reference::new("r", "T", ReferenceType::Book)
            .with_author(Author::new("J.", "Smith"));
        assert_eq!(
            render_in_text(&[CitationItem::new(&r)], &APA7, &context()).text,
            "(Smith, n.d.)"
        );
    }

    #[test]
    fn test_numeric_sorted_and_collapsed() {
        let r = smith("2020", "X");
        let items: Vec<CitationItem<'_>> = [7, 3, 1, 2]
            .into_iter()
            .map(|n| CitationItem {
                number: Some(n),
                ..CitationItem::new(&r)
            })
            .collect();
        assert_eq!(render_in_text(&items, &IEEE, &context()).text, "[1\u{2013}3, 7]");
    }

    #[test]
    fn test_numeric_pair_is_not_a_range() {
        let r = smith("2020", "X");
        let items = [3, 7].map(|n| CitationItem {
            number: Some(n),
            ..CitationItem::new(&r)
        });
        assert_eq!(render_in_text(&items, &IEEE, &context()).text, "[3, 7]");
    }

    #[test]
    fn test_nature_superscript() {
        let r = smith("2020", "X");
        let items = [1, 2].map(|n| CitationItem {
            number: Some(n),
            ..CitationItem::new(&r)
        });
        let citation = render_in_text(&items, &NATURE, &context());
        assert_eq!(citation.text, "1,2");
        assert!(citation.superscript);
        assert_eq!(citation.to_html(), "<sup>1,2</sup>");
    }

    #[test]
    fn test_numeric_with_locator_and_missing_number() {
        let r = smith("2020", "X");
        let items = [
            CitationItem {
                number: Some(4),
                locator: Some("12"),
                ..CitationItem::new(&r)
            },
            CitationItem::new(&r),
        ];
        assert_eq!(render_in_text(&items, &IEEE, &context()).text, "[4, p. 12, ?]");
    }

    #[test]
    fn test_footnote_note() {
        let r = Reference::new("r", "The Long Road: A History", ReferenceType::Book)
            .with_author(Author::new("John", "Smith"))
            .with_year("2001");
        let item = CitationItem {
            locator: Some("45"),
            ..CitationItem::new(&r)
        };
        let citation = render_in_text(
            &[item],
            &TURABIAN,
            &CitationContext {
                note_number: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(citation.text, "3");
        assert!(citation.superscript);
        assert_eq!(citation.note.as_deref(), Some("Smith, The Long Road, 45."));
    }

    #[test]
    fn test_collapse_ranges() {
        assert_eq!(collapse_ranges(&[1, 2, 3, 5, 6, 8]), vec!["1\u{2013}3", "5", "6", "8"]);
        assert!(collapse_ranges(&[]).is_empty());
    }

    #[test]
    fn test_empty_items() {
        assert_eq!(render_in_text(&[], &APA7, &context()), InTextCitation::default());
    }
}
