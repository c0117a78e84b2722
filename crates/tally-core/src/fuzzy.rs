//! Fuzzy string similarity scored 0-100
//!
//! - [`ratio`]: character-level insert/delete similarity
//! - [`token_set_ratio`]: word-overlap similarity that ignores word order,
//!   repeated words and punctuation
//! - [`merchant_score`]: token-set similarity that also accepts names split
//!   differently by punctuation ("WAL-MART" vs "Walmart")

use std::collections::BTreeSet;

/// Insert/delete similarity of two strings (0-100, rounded)
///
/// Scores `2 * lcs / (len_a + len_b)`, where `lcs` is the longest common
/// subsequence of characters. Substitutions cost a delete plus an insert, so
/// a dropped suffix weighs less than under Levenshtein: "eggs" vs "egg"
/// scores 86. An empty input on either side scores 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let total = a.len() + b.len();
    (200.0 * lcs_len(&a, &b) as f64 / total as f64).round()
}

/// Length of the longest common subsequence, one DP row at a time
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Lower-case, replace anything that is not alphanumeric with a space, trim
pub fn full_process(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    replaced.trim().to_string()
}

/// Order-insensitive token overlap similarity (0-100)
///
/// Both inputs are processed with [`full_process`] and split into word sets.
/// The shared words are compared against each side's full word list, and the
/// best of the three pairings wins, so "mart wal" and "Wal-Mart" score 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let p1 = full_process(a);
    let p2 = full_process(b);
    if p1.is_empty() || p2.is_empty() {
        return 0.0;
    }

    let tokens1: BTreeSet<&str> = p1.split_whitespace().collect();
    let tokens2: BTreeSet<&str> = p2.split_whitespace().collect();

    let intersection: Vec<&str> = tokens1.intersection(&tokens2).copied().collect();
    let diff1to2: Vec<&str> = tokens1.difference(&tokens2).copied().collect();
    let diff2to1: Vec<&str> = tokens2.difference(&tokens1).copied().collect();

    let sorted_sect = intersection.join(" ");
    let combined_1to2 = format!("{} {}", sorted_sect, diff1to2.join(" "))
        .trim()
        .to_string();
    let combined_2to1 = format!("{} {}", sorted_sect, diff2to1.join(" "))
        .trim()
        .to_string();

    [
        ratio(&sorted_sect, &combined_1to2),
        ratio(&sorted_sect, &combined_2to1),
        ratio(&combined_1to2, &combined_2to1),
    ]
    .into_iter()
    .fold(0.0, f64::max)
}

/// Similarity of two merchant names (0-100)
///
/// Best of [`token_set_ratio`] and a plain [`ratio`] of both names with all
/// separators removed. Word splitting alone scores "walmart" against
/// "wal mart" poorly even though they name the same store.
pub fn merchant_score(a: &str, b: &str) -> f64 {
    let compact = |s: &str| full_process(s).split_whitespace().collect::<String>();
    token_set_ratio(a, b).max(ratio(&compact(a), &compact(b)))
}

/// Lower-case, trim, and collapse runs of whitespace (including newlines) to one space
pub fn normalize_item_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical() {
        assert_eq!(ratio("milk", "milk"), 100.0);
    }

    #[test]
    fn test_ratio_empty() {
        assert_eq!(ratio("", "milk"), 0.0);
        assert_eq!(ratio("", ""), 0.0);
    }

    #[test]
    fn test_ratio_plural_drift() {
        assert_eq!(ratio("eggs", "egg"), 86.0);
        assert_eq!(ratio("apples", "apple"), 91.0);
        assert_eq!(ratio("egg", "eggs"), ratio("eggs", "egg"));
    }

    #[test]
    fn test_lcs_len() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(lcs_len(&chars("walmart"), &chars("mart wal")), 4);
        assert_eq!(lcs_len(&chars("abc"), &chars("xyz")), 0);
        assert_eq!(lcs_len(&chars("café"), &chars("cafe")), 3);
    }

    #[test]
    fn test_ratio_small_typo_stays_high() {
        assert!(ratio("whole milk 2l", "whole milk 2 l") >= 85.0);
        assert!(ratio("bread", "butter") < 85.0);
    }

    #[test]
    fn test_full_process() {
        assert_eq!(full_process("WAL-MART #123"), "wal mart  123");
        assert_eq!(full_process("  Café  "), "café");
    }

    #[test]
    fn test_token_set_ratio_order_insensitive() {
        assert_eq!(token_set_ratio("whole foods market", "market whole foods"), 100.0);
    }

    #[test]
    fn test_token_set_ratio_subset_scores_full() {
        assert_eq!(token_set_ratio("starbucks", "starbucks coffee"), 100.0);
    }

    #[test]
    fn test_token_set_ratio_split_word_is_weak() {
        assert!(token_set_ratio("walmart", "wal-mart") < 85.0);
    }

    #[test]
    fn test_merchant_score_punctuation_variant() {
        assert_eq!(merchant_score("walmart", "WAL-MART"), 100.0);
        assert_eq!(merchant_score("7-Eleven", "7 eleven"), 100.0);
    }

    #[test]
    fn test_merchant_score_keeps_token_set_behaviour() {
        assert_eq!(merchant_score("starbucks", "starbucks coffee"), 100.0);
        assert!(merchant_score("walmart", "target") < 85.0);
    }

    #[test]
    fn test_token_set_ratio_unrelated() {
        assert!(token_set_ratio("walmart", "target") < 85.0);
        assert_eq!(token_set_ratio("", "target"), 0.0);
        assert_eq!(token_set_ratio("---", "target"), 0.0);
    }

    #[test]
    fn test_normalize_item_name() {
        assert_eq!(normalize_item_name("  Whole\nMILK\t 2L "), "whole milk 2l");
        assert_eq!(normalize_item_name(""), "");
    }
}
