//! Bibliography entry rendering
//!
//! Interprets a style's layout for one reference. The suffix and number
//! come from the caller, so the same inputs always give the same output.

use bibcite_domain::{Locale, Reference};

use crate::collation::resolve_locale;
use crate::error::ValidationWarning;
use crate::names;
use crate::render::markup::StyledText;
use crate::render::title_case;
use crate::style::{Emphasis, EntryPrefix, Field, Part, StyleDefinition};

/// Placeholder for a missing title
pub const UNTITLED: &str = "[Untitled]";

/// Precomputed inputs for one entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryContext<'a> {
    /// Year suffix from disambiguation
    pub suffix: Option<&'a str>,
    /// Citation number from the numberer
    pub number: Option<u32>,
    /// Locale when the reference does not determine one
    pub default_locale: Locale,
}

/// A rendered entry and the problems met while rendering it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub text: StyledText,
    pub warnings: Vec<ValidationWarning>,
}

/// A piece of output before punctuation cleanup
type Piece = (String, bool);

struct Renderer<'a> {
    reference: &'a Reference,
    style: &'a StyleDefinition,
    context: EntryContext<'a>,
    locale: Locale,
    warnings: Vec<ValidationWarning>,
}

/// Render a bibliography entry
pub fn render_entry(
    reference: &Reference,
    style: &StyleDefinition,
    context: &EntryContext<'_>,
) -> RenderedEntry {
    let mut renderer = Renderer {
        reference,
        style,
        context: *context,
        locale: resolve_locale(reference, context.default_locale),
        warnings: Vec::new(),
    };

    let mut text = StyledText::new(style.hanging_indent);
    if let Some(number) = context.number {
        match style.entry_prefix {
            EntryPrefix::None => {}
            EntryPrefix::Bracketed => text.push_plain(&format!("[{}] ", number)),
            EntryPrefix::Dotted => text.push_plain(&format!("{}. ", number)),
        }
    }

    for part in style.layout_for(reference.reference_type) {
        if let Some(pieces) = renderer.part(part) {
            for (piece, italic) in pieces {
                text.push(&piece, italic);
            }
        }
    }
    text.finish();

    RenderedEntry {
        text,
        warnings: renderer.warnings,
    }
}

impl Renderer<'_> {
    fn part(&mut self, part: &Part) -> Option<Vec<Piece>> {
        match part {
            Part::Text {
                field,
                prefix,
                suffix,
                emphasis,
            } => {
                let value = self.field(*field)?;
                Some(self.decorate(value, prefix, suffix, *emphasis))
            }
            Part::Group {
                parts,
                delimiter,
                prefix,
                suffix,
            } => {
                let children: Vec<Vec<Piece>> = parts.iter().filter_map(|p| self.part(p)).collect();
                if children.is_empty() {
                    return None;
                }
                let mut pieces = vec![(prefix.to_string(), false)];
                for (i, child) in children.into_iter().enumerate() {
                    if i > 0 {
                        pieces.push((delimiter.to_string(), false));
                    }
                    pieces.extend(child);
                }
                pieces.push((suffix.to_string(), false));
                Some(pieces)
            }
        }
    }

    fn decorate(
        &self,
        value: String,
        prefix: &str,
        suffix: &str,
        emphasis: Emphasis,
    ) -> Vec<Piece> {
        match emphasis {
            Emphasis::Plain => vec![
                (prefix.to_string(), false),
                (value, false),
                (suffix.to_string(), false),
            ],
            Emphasis::Italic => vec![
                (prefix.to_string(), false),
                (value, true),
                (suffix.to_string(), false),
            ],
            Emphasis::Quoted => {
                let (open, close) = self.style.quotes;
                let mut suffix = suffix;
                let mut inside = String::new();
                if self.style.punctuation_in_quote && suffix.starts_with([',', '.']) {
                    let ends_terminal = value.ends_with(['.', '?', '!']);
                    if !ends_terminal {
                        inside.push_str(&suffix[..1]);
                    }
                    suffix = &suffix[1..];
                }
                vec![
                    (prefix.to_string(), false),
                    (format!("{}{}{}{}", open, value, inside, close), false),
                    (suffix.to_string(), false),
                ]
            }
        }
    }

    fn field(&mut self, field: Field) -> Option<String> {
        let r = self.reference;
        match field {
            Field::Authors => names::format_creators(r, &self.style.names, self.locale),
            Field::Year => self.year(),
            Field::Title => Some(self.title()),
            Field::Container => non_empty(r.journal_name.as_deref()),
            Field::Volume => non_empty(r.volume.as_deref()),
            Field::Issue => non_empty(r.issue.as_deref()),
            Field::Pages => non_empty(r.pages.as_deref()).map(|p| page_range(&p)),
            Field::Edition => non_empty(r.edition.as_deref()).map(|e| ordinal_edition(&e)),
            Field::Publisher => non_empty(r.publisher.as_deref()),
            Field::Doi => non_empty(r.doi.as_deref()),
            Field::Url => non_empty(r.url.as_deref()),
            Field::Link => non_empty(r.doi.as_deref())
                .map(|doi| format!("https://doi.org/{}", doi))
                .or_else(|| non_empty(r.url.as_deref())),
        }
    }

    fn year(&self) -> Option<String> {
        let year = self
            .reference
            .year_digits()
            .map(str::to_string)
            .or_else(|| non_empty(self.reference.year.as_deref()));
        // Only author-year styles that show a year carry suffixes or "n.d."
        let author_year = self.style.uses_year_suffixes();
        let suffix = self
            .context
            .suffix
            .filter(|s| author_year && !s.is_empty());

        match (year, suffix) {
            (Some(year), Some(suffix)) => Some(format!("{}{}", year, suffix)),
            (Some(year), None) => Some(year),
            (None, Some(suffix)) => Some(format!("{}-{}", self.style.no_date, suffix)),
            (None, None) if author_year => Some(self.style.no_date.to_string()),
            (None, None) => None,
        }
    }

    fn title(&mut self) -> String {
        let title = self.reference.title.trim();
        if title.is_empty() {
            self.warnings.push(ValidationWarning {
                reference_id: self.reference.id.clone(),
                field: "title".to_string(),
                message: "missing title rendered as placeholder".to_string(),
            });
            return UNTITLED.to_string();
        }
        title_case::apply(title, self.style.title_case)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// "45-67" and "45--67" become "45–67"
pub fn page_range(pages: &str) -> String {
    let mut out = String::with_capacity(pages.len());
    let mut in_dash = false;
    for c in pages.chars() {
        if c == '-' || c == '\u{2013}' {
            if !in_dash {
                out.push('\u{2013}');
            }
            in_dash = true;
        } else {
            out.push(c);
            in_dash = false;
        }
    }
    out.split('\u{2013}').map(str::trim).collect::<Vec<_>>().join("\u{2013}")
}

/// "2" → "2nd"; non-numeric editions are kept
pub fn ordinal_edition(edition: &str) -> String {
    let Ok(n) = edition.trim().parse::<u32>() else {
        return edition.trim().to_string();
    };
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
