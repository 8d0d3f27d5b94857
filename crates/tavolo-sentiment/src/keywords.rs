// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frequency-ranked keyword extraction over review texts.
//!
//! Purely lexical, no model calls: lowercase, split on non-alphanumeric
//! characters, drop short and stopword tokens, rank by count.

use std::collections::HashMap;

/// Words too common to be informative.
const STOPWORDS: [&str; 9] = ["the", "and", "is", "in", "to", "a", "of", "for", "with"];

/// How many keywords a ranking returns at most.
const MAX_KEYWORDS: usize = 10;

/// Extract the most frequent meaningful words across the given texts.
///
/// Tokens shorter than three characters and stopwords are discarded.
/// Results are ordered by descending frequency; ties keep the order in
/// which the words first appeared, which makes the ranking deterministic
/// for a given input sequence.
pub fn extract_keywords(texts: &[&str]) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next_rank = 0usize;

    for text in texts {
        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().count() > 2 && !STOPWORDS.contains(word))
        {
            let entry = counts.entry(word.to_string()).or_insert_with(|| {
                let rank = next_rank;
                next_rank += 1;
                (rank, 0)
            });
            entry.1 += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (first_a, count_a)), (_, (first_b, count_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ranks_by_descending_frequency() {
        let texts = [
            "the pasta was amazing, truly amazing pasta",
            "pasta again, still amazing",
            "service was slow",
        ];
        let keywords = extract_keywords(&texts);
        assert_eq!(keywords[0], "pasta");
        assert_eq!(keywords[1], "amazing");
        assert!(keywords.contains(&"service".to_string()));
    }

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let keywords = extract_keywords(&["the food is ok and we sat in a booth for an hour"]);
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"and".to_string()));
        assert!(!keywords.contains(&"is".to_string()));
        assert!(!keywords.contains(&"ok".to_string()));
        assert!(!keywords.contains(&"we".to_string()));
        assert!(keywords.contains(&"food".to_string()));
        assert!(keywords.contains(&"booth".to_string()));
    }

    #[test]
    fn lowercases_before_counting() {
        let keywords = extract_keywords(&["Pizza was great", "great pizza, PIZZA forever"]);
        assert_eq!(keywords[0], "pizza");
        assert!(!keywords.iter().any(|word| word.chars().any(char::is_uppercase)));
    }

    #[test]
    fn caps_the_ranking_at_ten() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let keywords = extract_keywords(&[text]);
        assert_eq!(keywords.len(), 10);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let keywords = extract_keywords(&["zebra apple", "zebra apple"]);
        // Equal counts: zebra appeared first.
        assert_eq!(keywords, vec!["zebra".to_string(), "apple".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_keywords() {
        assert!(extract_keywords(&[]).is_empty());
        assert!(extract_keywords(&["", "a an to"]).is_empty());
    }

    proptest! {
        #[test]
        fn output_is_bounded_lowercase_and_deterministic(
            texts in prop::collection::vec("[ a-zA-Z0-9]{0,60}", 0..20)
        ) {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let first = extract_keywords(&refs);
            let second = extract_keywords(&refs);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.len() <= 10);
            for word in &first {
                prop_assert!(word.chars().count() > 2);
                prop_assert!(!STOPWORDS.contains(&word.as_str()));
                prop_assert!(!word.chars().any(char::is_uppercase));
            }
        }
    }
}
