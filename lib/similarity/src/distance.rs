//! String similarity measures
//!
//! All functions return a similarity score in range [0.0, 1.0] where 1.0 means identical.
//! Comparisons are case-insensitive. An empty value on either side scores 0.0:
//! a missing value is no evidence for a match.

use crate::measure::Measure;
use ahash::{AHashMap, AHashSet};

/// Compare two string values with a string measure.
///
/// Returns `None` when `measure` is not a string measure.
pub fn string_similarity(a: &str, b: &str, measure: Measure) -> Option<f64> {
    let score = match measure {
        Measure::Cosine => cosine(a, b),
        Measure::Jaccard => jaccard(a, b),
        Measure::Jaro => jaro(a, b),
        Measure::QGrams => qgrams(a, b),
        Measure::Trigrams => trigrams(a, b),
        Measure::ExactMatch => exact_match(a, b),
        Measure::Levenshtein => levenshtein(a, b),
        _ => return None,
    };
    Some(score)
}

/// Lowercased alphanumeric tokens
fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cosine similarity of token frequency vectors
pub fn cosine(a: &str, b: &str) -> f64 {
    let counts = |s: &str| {
        let mut counts: AHashMap<String, f64> = AHashMap::new();
        for token in tokenize(s) {
            *counts.entry(token).or_insert(0.0) += 1.0;
        }
        counts
    };
    let counts_a = counts(a);
    let counts_b = counts(b);
    if counts_a.is_empty() || counts_b.is_empty() {
        return 0.0;
    }

    let dot: f64 = counts_a
        .iter()
        .filter_map(|(token, x)| counts_b.get(token).map(|y| x * y))
        .sum();
    let norm_a = counts_a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = counts_b.values().map(|x| x * x).sum::<f64>().sqrt();

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Jaccard index of token sets
pub fn jaccard(a: &str, b: &str) -> f64 {
    let tokens_a: AHashSet<String> = tokenize(a).into_iter().collect();
    let tokens_b: AHashSet<String> = tokenize(b).into_iter().collect();
    set_jaccard(&tokens_a, &tokens_b)
}

fn set_jaccard(a: &AHashSet<String>, b: &AHashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Jaro similarity over characters
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        for j in start..end {
            if !b_matched[j] && b[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let half_transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count();

    let m = matches as f64;
    let t = half_transpositions as f64 / 2.0;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

/// Jaccard index of padded character bigrams
pub fn qgrams(a: &str, b: &str) -> f64 {
    set_jaccard(&padded_ngrams(a, 2), &padded_ngrams(b, 2))
}

/// Dice coefficient of padded character trigrams
pub fn trigrams(a: &str, b: &str) -> f64 {
    let trigrams_a = padded_ngrams(a, 3);
    let trigrams_b = padded_ngrams(b, 3);
    if trigrams_a.is_empty() || trigrams_b.is_empty() {
        return 0.0;
    }
    let intersection = trigrams_a.intersection(&trigrams_b).count();
    2.0 * intersection as f64 / (trigrams_a.len() + trigrams_b.len()) as f64
}

pub fn exact_match(a: &str, b: &str) -> f64 {
    let a = a.trim();
    let b = b.trim();
    if !a.is_empty() && a.to_lowercase() == b.to_lowercase() {
        1.0
    } else {
        0.0
    }
}

/// Edit distance normalized by the longer string: `1 - d / max(|a|, |b|)`
pub fn levenshtein(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let distance = previous[b.len()] as f64;
    1.0 - distance / a.len().max(b.len()) as f64
}

/// Character n-grams of the lowercased string padded with `n - 1` spaces on each side
fn padded_ngrams(s: &str, n: usize) -> AHashSet<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return AHashSet::new();
    }
    let pad = " ".repeat(n - 1);
    let padded = format!("{}{}{}", pad, trimmed.to_lowercase(), pad);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(n).map(|w| w.iter().collect::<String>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine() {
        assert!((cosine("Leipzig University", "university leipzig") - 1.0).abs() < 1e-9);
        assert_eq!(cosine("alpha", "beta"), 0.0);
        let partial = cosine("new york city", "new york");
        assert!(partial > 0.8 && partial < 0.9, "got {}", partial);
    }

    #[test]
    fn test_jaccard() {
        assert!((jaccard("new york city", "New York") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard("", "new york"), 0.0);
    }

    #[test]
    fn test_jaro() {
        assert!((jaro("MARTHA", "MARHTA") - 0.9444).abs() < 0.001);
        assert_eq!(jaro("abc", "abc"), 1.0);
        assert_eq!(jaro("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_ngram_measures() {
        assert_eq!(trigrams("hello", "hello"), 1.0);
        assert_eq!(qgrams("hello", "HELLO"), 1.0);
        assert!(trigrams("prosciutto cotto", "prosciutto crudo") > 0.5);
        assert!(trigrams("apple", "banana") < 0.3);
        assert!(qgrams("night", "nacht") < qgrams("night", "nights"));
    }

    #[test]
    fn test_exact_and_levenshtein() {
        assert_eq!(exact_match("Berlin ", "berlin"), 1.0);
        assert_eq!(exact_match("", ""), 0.0);
        assert!((levenshtein("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
        assert_eq!(levenshtein("same", "same"), 1.0);
    }

    #[test]
    fn test_non_string_measure() {
        assert_eq!(string_similarity("a", "a", Measure::DateSim), None);
        assert_eq!(string_similarity("a", "a", Measure::Jaccard), Some(1.0));
    }

    #[test]
    fn test_padded_ngrams() {
        let grams = padded_ngrams("hello", 3);
        assert!(grams.contains("  h"));
        assert!(grams.contains("hel"));
        assert!(grams.contains("lo "));
    }
}
