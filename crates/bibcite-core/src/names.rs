//! Author name formatting
//!
//! Structured names are inverted, abbreviated and joined according to a
//! style's [`NameRules`]. Literal names (Thai personal names, institutions)
//! pass through unchanged under every style.

use bibcite_domain::{Author, AuthorRole, Locale, PersonName, Reference};

use crate::style::{DelimiterPrecedesLast, GivenForm, InTextRules, LastJoin, NameOrder, NameRules};

/// Format one name. `position` is the zero-based index in the list.
pub fn format_name(author: &Author, rules: &NameRules, position: usize) -> String {
    let family = match &author.name {
        PersonName::Literal { full_name } => return full_name.clone(),
        PersonName::Structured { last_name, .. } => last_name.as_str(),
    };

    let given = format_given(&author.given_names(), rules.given);
    if given.is_empty() {
        return family.to_string();
    }

    let inverted = match rules.order {
        NameOrder::InvertAll => true,
        NameOrder::InvertFirst => position == 0,
        NameOrder::GivenFirst => false,
    };

    if inverted {
        format!("{}{}{}", family, rules.sort_separator, given)
    } else {
        format!("{} {}", given, family)
    }
}

fn format_given(given: &[&str], form: GivenForm) -> String {
    match form {
        GivenForm::Full => given.join(" "),
        GivenForm::Initials { period, space } => {
            let joiner = if space { " " } else { "" };
            given
                .iter()
                .map(|name| initials_of(name, period))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(joiner)
        }
    }
}

/// "Jean-Pierre" → "J.-P.", "Mary" → "M.", "J." → "J."
fn initials_of(name: &str, period: bool) -> String {
    name.split('-')
        .filter_map(|part| part.chars().find(|c| c.is_alphabetic()))
        .map(|c| {
            let upper: String = c.to_uppercase().collect();
            if period {
                format!("{}.", upper)
            } else {
                upper
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Join already formatted names with the list's conjunction rules
fn join_names(
    names: &[String],
    delimiter: &str,
    last_join: LastJoin,
    precedes: DelimiterPrecedesLast,
    locale: Locale,
) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => {
            let word = match last_join {
                LastJoin::None => None,
                LastJoin::Ampersand => Some("&"),
                LastJoin::Word => Some(locale.and_word()),
            };
            let separator = match word {
                None => delimiter.to_string(),
                Some(word) => {
                    let precede = match precedes {
                        DelimiterPrecedesLast::Always => true,
                        DelimiterPrecedesLast::Never => false,
                        DelimiterPrecedesLast::Contextual => names.len() >= 3,
                    };
                    if precede {
                        format!("{}{} ", delimiter, word)
                    } else {
                        format!(" {} ", word)
                    }
                }
            };
            format!("{}{}{}", init.join(delimiter), separator, last)
        }
    }
}

/// Format a creator list for a bibliography entry.
///
/// Lists longer than `max_authors` show exactly the first
/// `et_al_use_first` names followed by the locale's "et al." token.
pub fn join_authors(authors: &[&Author], rules: &NameRules, locale: Locale) -> String {
    if authors.len() > rules.max_authors {
        let keep = rules.et_al_use_first.clamp(1, rules.max_authors.max(1));
        let shown: Vec<String> = authors
            .iter()
            .take(keep)
            .enumerate()
            .map(|(i, a)| format_name(a, rules, i))
            .collect();
        return format!(
            "{}{}{}",
            shown.join(rules.delimiter),
            rules.et_al_delimiter,
            locale.et_al()
        );
    }

    let names: Vec<String> = authors
        .iter()
        .enumerate()
        .map(|(i, a)| format_name(a, rules, i))
        .collect();
    join_names(
        &names,
        rules.delimiter,
        rules.last_join,
        rules.delimiter_precedes_last,
        locale,
    )
}

/// Creators shown in the author position: authors, else editors.
///
/// The flag is true when editors stand in for authors.
pub fn listed_creators(reference: &Reference) -> (Vec<&Author>, bool) {
    let authors: Vec<&Author> = reference.creators(AuthorRole::Author).collect();
    if !authors.is_empty() {
        return (authors, false);
    }
    let editors: Vec<&Author> = reference.creators(AuthorRole::Editor).collect();
    let is_editors = !editors.is_empty();
    (editors, is_editors)
}

/// Author position of a bibliography entry, with editor label if needed
pub fn format_creators(reference: &Reference, rules: &NameRules, locale: Locale) -> Option<String> {
    let (creators, is_editors) = listed_creators(reference);
    if creators.is_empty() {
        return None;
    }
    let mut text = join_authors(&creators, rules, locale);
    if is_editors {
        let (singular, plural) = rules.editor_label;
        text.push_str(if creators.len() == 1 { singular } else { plural });
    }
    Some(text)
}

/// Surnames for an in-text citation ("Smith & Doe", "Smith et al.")
pub fn in_text_names(reference: &Reference, rules: &InTextRules, locale: Locale) -> Option<String> {
    let (creators, _) = listed_creators(reference);
    if creators.is_empty() {
        return None;
    }

    if creators.len() > rules.max_authors {
        let keep = rules.et_al_use_first.max(1);
        let shown: Vec<&str> = creators.iter().take(keep).map(|a| a.family_name()).collect();
        return Some(format!("{} {}", shown.join(", "), locale.et_al()));
    }

    let names: Vec<String> = creators.iter().map(|a| a.family_name().to_string()).collect();
    Some(join_names(
        &names,
        ", ",
        rules.last_join,
        rules.delimiter_precedes_last,
        locale,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{StyleId, APA7, IEEE, MLA9, SCIENCE, TURABIAN, VANCOUVER};
    use bibcite_domain::ReferenceType;

    fn smith() -> Author {
        Author::new("John", "Smith").with_middle_name("Michael")
    }

    #[test]
    fn test_apa_initials() {
        assert_eq!(format_name(&smith(), &APA7.names, 0), "Smith, J. M.");
    }

    #[test]
    fn test_vancouver_compact_initials() {
        assert_eq!(format_name(&smith(), &VANCOUVER.names, 0), "Smith JM");
    }

    #[test]
    fn test_harvard_initials_without_space() {
        let rules = StyleId::Harvard.definition().names;
        assert_eq!(format_name(&smith(), &rules, 0), "Smith, J.M.");
    }

    #[test]
    fn test_hyphenated_given_name() {
        let author = Author::new("Jean-Pierre", "Dupont");
        assert_eq!(format_name(&author, &APA7.names, 0), "Dupont, J.-P.");
    }

    #[test]
    fn test_given_first_order() {
        assert_eq!(format_name(&smith(), &SCIENCE.names, 0), "J. M. Smith");
    }

    #[test]
    fn test_invert_first_only() {
        assert_eq!(format_name(&smith(), &TURABIAN.names, 0), "Smith, John Michael");
        assert_eq!(format_name(&smith(), &TURABIAN.names, 1), "John Michael Smith");
    }

    #[test]
    fn test_literal_names_are_untouched() {
        let thai = Author::literal("สมชาย ใจดี");
        let org = Author::literal("World Health Organization");
        for id in StyleId::all() {
            let rules = id.definition().names;
            assert_eq!(format_name(&thai, &rules, 0), "สมชาย ใจดี");
            assert_eq!(format_name(&org, &rules, 1), "World Health Organization");
        }
    }

    #[test]
    fn test_apa_join_with_ampersand() {
        let a = Author::new("John", "Smith");
        let b = Author::new("Jane", "Doe");
        assert_eq!(
            join_authors(&[&a, &b], &APA7.names, Locale::English),
            "Smith, J., & Doe, J."
        );
    }

    #[test]
    fn test_ieee_serial_comma_is_contextual() {
        let a = Author::new("John", "Smith");
        let b = Author::new("Jane", "Doe");
        let c = Author::new("Richard", "Roe");
        assert_eq!(
            join_authors(&[&a, &b], &IEEE.names, Locale::English),
            "Smith, J. and Doe, J."
        );
        assert_eq!(
            join_authors(&[&a, &b, &c], &IEEE.names, Locale::English),
            "Smith, J., Doe, J., and Roe, R."
        );
    }

    #[test]
    fn test_vancouver_has_no_conjunction() {
        let a = Author::new("John", "Smith");
        let b = Author::new("Jane", "Doe");
        assert_eq!(
            join_authors(&[&a, &b], &VANCOUVER.names, Locale::English),
            "Smith J, Doe J"
        );
    }

    #[test]
    fn test_truncation_shows_exactly_first_names() {
        let authors: Vec<Author> = (0..8)
            .map(|i| Author::new("Ann", format!("Author{}", i)))
            .collect();
        let refs: Vec<&Author> = authors.iter().collect();
        let text = join_authors(&refs, &VANCOUVER.names, Locale::English);
        assert!(text.starts_with("Author0 A, Author1 A"));
        assert!(text.contains("Author5 A, et al."));
        assert!(!text.contains("Author6"));
    }

    #[test]
    fn test_mla_two_authors_and_et_al() {
        let a = Author::new("John", "Smith");
        let b = Author::new("Jane", "Doe");
        let c = Author::new("Richard", "Roe");
        assert_eq!(
            join_authors(&[&a, &b], &MLA9.names, Locale::English),
            "Smith, John, and Doe, Jane"
        );
        assert_eq!(
            join_authors(&[&a, &b, &c], &MLA9.names, Locale::English),
            "Smith, John, et al."
        );
    }

    #[test]
    fn test_thai_et_al_and_conjunction() {
        let a = Author::literal("สมชาย ใจดี");
        let b = Author::literal("สมหญิง รักไทย");
        let c = Author::literal("มานะ อดทน");
        assert_eq!(
            join_authors(&[&a, &b, &c], &MLA9.names, Locale::Thai),
            "สมชาย ใจดี, และคณะ"
        );
        assert_eq!(
            join_authors(&[&a, &b], &MLA9.names, Locale::Thai),
            "สมชาย ใจดี, และ สมหญิง รักไทย"
        );
    }

    #[test]
    fn test_editors_stand_in_with_label() {
        let reference = Reference::new("r1", "Handbook", ReferenceType::Book)
            .with_author(Author::new("Jane", "Doe").with_role(AuthorRole::Editor));
        assert_eq!(
            format_creators(&reference, &APA7.names, Locale::English).as_deref(),
            Some("Doe, J. (Ed.)")
        );
    }

    #[test]
    fn test_in_text_names() {
        let one = Reference::new("r1", "T", ReferenceType::Book)
            .with_author(Author::new("John", "Smith"));
        let two = one.clone().with_author(Author::new("Jane", "Doe"));
        let three = two.clone().with_author(Author::new("Richard", "Roe"));

        let rules = &APA7.in_text;
        assert_eq!(in_text_names(&one, rules, Locale::English).as_deref(), Some("Smith"));
        assert_eq!(
            in_text_names(&two, rules, Locale::English).as_deref(),
            Some("Smith & Doe")
        );
        assert_eq!(
            in_text_names(&three, rules, Locale::English).as_deref(),
            Some("Smith et al.")
        );
    }
}
