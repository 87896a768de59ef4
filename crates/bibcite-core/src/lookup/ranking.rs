//! Ranking of free-text search candidates
//!
//! The provider's own relevance order is blended with string similarity
//! between the query and each candidate's title and author surnames, so a
//! query like "lecun deep learning 2015" favours the record it describes.

use serde::Serialize;
use strsim::sorensen_dice;
use unicode_normalization::UnicodeNormalization;

use bibcite_domain::LookupResult;

const PROVIDER_WEIGHT: f64 = 0.4;
const TITLE_WEIGHT: f64 = 0.45;
const AUTHOR_WEIGHT: f64 = 0.15;

/// A search result with its relevance score in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub result: LookupResult,
    pub score: f64,
}

fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_similarity(query: &str, title: &str) -> f64 {
    let title = fold(title);
    if title.is_empty() {
        return 0.0;
    }
    if query.contains(&title) {
        return 1.0;
    }
    sorensen_dice(query, &title)
}

fn author_match(query_words: &[&str], result: &LookupResult) -> f64 {
    let matched = result
        .authors
        .iter()
        .map(|a| fold(a.family_name()))
        .any(|family| !family.is_empty() && query_words.contains(&family.as_str()));
    if matched {
        1.0
    } else {
        0.0
    }
}

/// Score candidates and return the best `max` in descending order.
///
/// Ties keep the provider's order.
pub fn rank_candidates(query: &str, results: Vec<LookupResult>, max: usize) -> Vec<Candidate> {
    let query = fold(query);
    let words: Vec<&str> = query.split_whitespace().collect();
    let total = results.len().max(1) as f64;

    let mut candidates: Vec<Candidate> = results
        .into_iter()
        .enumerate()
        .map(|(position, result)| {
            let provider = 1.0 - position as f64 / total;
            let score = PROVIDER_WEIGHT * provider
                + TITLE_WEIGHT * title_similarity(&query, &result.title)
                + AUTHOR_WEIGHT * author_match(&words, &result);
            Candidate { result, score }
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(max);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibcite_domain::Author;

    fn result(title: &str, surname: &str) -> LookupResult {
        LookupResult {
            title: title.to_string(),
            authors: vec![Author::new("A.", surname)],
            ..Default::default()
        }
    }

    #[test]
    fn test_better_match_overtakes_provider_order() {
        let results = vec![
            result("Learning deep architectures for AI", "Bengio"),
            result("Deep learning", "LeCun"),
        ];
        let ranked = rank_candidates("LeCun, Deep Learning (2015)", results, 10);
        assert_eq!(ranked[0].result.title, "Deep learning");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_truncates_to_max() {
        let results = (0..5).map(|i| result(&format!("Title {}", i), "X")).collect();
        let ranked = rank_candidates("unrelated", results, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].result.title, "Title 0");
    }

    #[test]
    fn test_scores_are_bounded() {
        let results = vec![result("Deep learning", "LeCun")];
        let ranked = rank_candidates("Deep learning lecun", results, 10);
        assert!(ranked[0].score <= 1.0 + f64::EPSILON);
        assert!(ranked[0].score > 0.9);
    }

    #[test]
    fn test_diacritics_are_folded() {
        assert_eq!(fold("Müller, Ünïcode  Tëst"), "muller unicode test");
    }
}
