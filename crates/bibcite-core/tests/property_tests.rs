//! Property-based tests for ordering, numbering, suffixes, truncation and round trips

use std::collections::HashSet;

use bibcite_core::sorting::order_references;
use bibcite_core::style::{APA7, IEEE, VANCOUVER};
use bibcite_core::{
    compute_suffixes, export, import_bibtex, import_ris, Author, BibliographyRequest,
    CitationEngine, ExportFormat, ExportOptions, Locale, Reference, ReferenceType,
};
use proptest::prelude::*;

const SURNAMES: &[&str] = &["Smith", "Doe", "Müller", "Nguyen", "O'Brien", "de Vries"];

fn reference_strategy() -> impl Strategy<Value = (usize, u16, String)> {
    (0..SURNAMES.len(), 2015u16..2022, "[A-Z][a-z]{2,10}( [a-z]{2,8}){0,3}")
}

fn build(specs: &[(usize, u16, String)]) -> Vec<Reference> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (surname, year, title))| {
            Reference::new(format!("ref{}", i), title.clone(), ReferenceType::Journal)
                .with_author(Author::new("A.", SURNAMES[*surname]))
                .with_year(year.to_string())
        })
        .collect()
}

/// Single-spaced text mixing TeX specials, accents and entity-like runs
fn markup_title() -> impl Strategy<Value = String> {
    prop::collection::vec(r#"[A-Za-z0-9éü%&$#_{}~^;\\"'.-]{1,8}"#, 1..6)
        .prop_map(|words| words.join(" "))
}

fn render(references: &[Reference], style: &str) -> Vec<(String, String)> {
    CitationEngine::default()
        .format_bibliography(&BibliographyRequest {
            scope: "prop",
            style,
            references,
            citation_order: None,
        })
        .unwrap()
        .entries
        .into_iter()
        .map(|e| (e.reference_id, e.text.to_plain()))
        .collect()
}

proptest! {
    #[test]
    fn prop_rendering_is_deterministic(
        specs in prop::collection::vec(reference_strategy(), 0..12),
    ) {
        let refs = build(&specs);
        for style in ["apa7", "mla9", "ieee", "nature"] {
            prop_assert_eq!(render(&refs, style), render(&refs, style));
        }
    }

    #[test]
    fn prop_output_ignores_input_order(
        specs in prop::collection::vec(reference_strategy(), 1..10),
        seed in any::<u64>(),
    ) {
        let refs = build(&specs);
        let mut shuffled = refs.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        if seed % 2 == 0 {
            shuffled.reverse();
        }
        prop_assert_eq!(render(&refs, "apa7"), render(&shuffled, "apa7"));
        prop_assert_eq!(render(&refs, "vancouver"), render(&shuffled, "vancouver"));
    }

    #[test]
    fn prop_suffixes_are_distinct_within_a_group(
        titles in prop::collection::vec("[a-z]{1,12}", 2..20),
    ) {
        let refs: Vec<Reference> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                Reference::new(format!("r{}", i), title.clone(), ReferenceType::Book)
                    .with_author(Author::new("J.", "Smith"))
                    .with_year("2020")
            })
            .collect();

        let suffixes = compute_suffixes(&refs, &APA7, Locale::English);
        prop_assert_eq!(suffixes.len(), refs.len());

        let distinct: HashSet<&String> = suffixes.values().collect();
        prop_assert_eq!(distinct.len(), refs.len());
        let expected: HashSet<String> = (0..refs.len())
            .map(|i| char::from(b'a' + i as u8).to_string())
            .collect();
        let actual: HashSet<String> = suffixes.values().cloned().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_numeric_styles_have_no_suffixes(
        specs in prop::collection::vec(reference_strategy(), 0..12),
    ) {
        let refs = build(&specs);
        prop_assert!(compute_suffixes(&refs, &IEEE, Locale::English).is_empty());
        prop_assert!(compute_suffixes(&refs, &VANCOUVER, Locale::English).is_empty());
    }

    #[test]
    fn prop_numbers_are_contiguous(
        specs in prop::collection::vec(reference_strategy(), 0..15),
        cited in prop::collection::vec(0usize..15, 0..10),
    ) {
        let refs = build(&specs);
        let order: Vec<String> = cited.iter().map(|i| format!("ref{}", i)).collect();
        let ordered =
            order_references(&refs, &IEEE, &Default::default(), Some(&order), Locale::English);

        let numbers: Vec<u32> = ordered.iter().filter_map(|e| e.number).collect();
        prop_assert_eq!(numbers, (1..=refs.len() as u32).collect::<Vec<_>>());

        let indices: HashSet<usize> = ordered.iter().map(|e| e.index).collect();
        prop_assert_eq!(indices.len(), refs.len());
    }

    #[test]
    fn prop_long_author_lists_are_truncated(count in 1usize..40) {
        let mut reference =
            Reference::new("many", "Many Hands", ReferenceType::Journal).with_year("2021");
        for i in 0..count {
            reference = reference.with_author(Author::new("B.", format!("Person{:02}", i)));
        }
        let text = render(std::slice::from_ref(&reference), "apa7")[0].1.clone();

        let shown = text.matches(", B.").count();
        if count > 20 {
            prop_assert_eq!(shown, 20);
            prop_assert!(text.contains("et al."));
        } else {
            prop_assert_eq!(shown, count);
            prop_assert!(!text.contains("et al."));
        }
    }

    #[test]
    fn prop_bibtex_export_reads_back(titles in prop::collection::vec(markup_title(), 1..6)) {
        let refs: Vec<Reference> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                Reference::new(format!("ref{}", i), title.clone(), ReferenceType::Book)
            })
            .collect();

        let report = export(&refs, ExportFormat::BibTeX, &ExportOptions::default());
        prop_assert!(report.errors.is_empty(), "{:?}", report.errors);
        let imported = import_bibtex(&report.text);
        prop_assert!(imported.errors.is_empty(), "{:?}", imported.errors);
        let back: Vec<&str> = imported.references.iter().map(|r| r.title.as_str()).collect();
        prop_assert_eq!(back, titles.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn prop_ris_export_reads_back_or_reports(title in markup_title()) {
        let reference = Reference::new("ref0", title.clone(), ReferenceType::Journal);

        let options = ExportOptions::default();
        let report = export(std::slice::from_ref(&reference), ExportFormat::Ris, &options);
        let imported = import_ris(&report.text);
        prop_assert_eq!(imported.references.len(), 1);
        let survived = imported.references[0].title == title;
        let reported = report.errors.iter().any(|e| e.field == "TI");
        prop_assert!(
            survived != reported,
            "title {:?} survived={} reported={}",
            title,
            survived,
            reported
        );
    }
}
