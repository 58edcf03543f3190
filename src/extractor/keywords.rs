use std::collections::HashMap;

use crate::config::AnalysisConfig;
use crate::extractor::model::KeywordStat;

const MIN_KEYWORD_CHARS: usize = 3;

/// Rank the most frequent content words in `text`.
///
/// Tokens are maximal runs of alphabetic characters, lower-cased. Only
/// tokens of at least three characters are counted; stop words are counted
/// towards the density denominator but never ranked. Equal counts keep the
/// order in which the words first appeared.
pub fn extract_keywords(text: &str, config: &AnalysisConfig) -> Vec<KeywordStat> {
    let lowered = text.to_lowercase();
    let mut total_tokens = 0usize;
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| t.chars().count() >= MIN_KEYWORD_CHARS)
    {
        total_tokens += 1;
        if config.is_stop_word(token) {
            continue;
        }
        match index.get(token) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(token.to_string(), order.len());
                order.push((token.to_string(), 1));
            }
        }
    }

    // sort_by is stable, so ties keep first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));

    order
        .into_iter()
        .take(config.keyword_limit)
        .map(|(word, count)| KeywordStat {
            density: density(count, total_tokens),
            word,
            count,
        })
        .collect()
}

/// The first `limit` keywords as `(word, count)` pairs.
pub fn top_pairs(keywords: &[KeywordStat], limit: usize) -> Vec<(String, usize)> {
    keywords
        .iter()
        .take(limit)
        .map(|k| (k.word.clone(), k.count))
        .collect()
}

fn density(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = count as f64 * 100.0 / total as f64;
    (percent * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn ranks_by_count_with_stable_ties() {
        let text = "zebra apple zebra mango apple zebra kiwi";
        let keywords = extract_keywords(text, &config());
        let words: Vec<_> = keywords.iter().map(|k| (k.word.as_str(), k.count)).collect();
        assert_eq!(
            words,
            vec![("zebra", 3), ("apple", 2), ("mango", 1), ("kiwi", 1)]
        );
    }

    #[test]
    fn drops_stop_words_and_short_tokens() {
        let text = "The cat and the dog were at an ox farm with about six hens";
        let keywords = extract_keywords(text, &config());
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["cat", "dog", "farm", "six", "hens"]);
    }

    #[test]
    fn splits_on_non_alphabetic_characters() {
        let keywords = extract_keywords("rust2024 rust_lang RUST-lang", &config());
        assert_eq!(keywords[0].word, "rust");
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[1].word, "lang");
        assert_eq!(keywords[1].count, 2);
    }

    #[test]
    fn density_counts_stop_words_in_denominator() {
        // five counted tokens: "the" x2 (stop), "rust" x2, "crab" x1
        let keywords = extract_keywords("the rust the rust crab", &config());
        assert_eq!(keywords[0].word, "rust");
        assert_eq!(keywords[0].density, 40.0);
        assert_eq!(keywords[1].density, 20.0);
    }

    #[test]
    fn density_rounds_to_two_decimals() {
        let keywords = extract_keywords("alpha beta gamma", &config());
        assert_eq!(keywords[0].density, 33.33);
        let sum: f64 = keywords.iter().map(|k| k.density).sum();
        assert!(sum <= 100.0);
    }

    #[test]
    fn limits_list_lengths() {
        // 52 distinct four-letter words
        let many: String = ('a'..='z')
            .flat_map(|c| ('a'..='b').map(move |d| format!("xx{c}{d} ")))
            .collect();
        let keywords = extract_keywords(&many, &config());
        assert_eq!(keywords.len(), 20);
        assert_eq!(top_pairs(&keywords, 10).len(), 10);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_keywords("", &config()).is_empty());
        assert!(extract_keywords("a an of 12 34", &config()).is_empty());
    }
}
