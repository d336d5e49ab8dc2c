//! Weighted string similarity (0-100) for classifying link text
//!
//! Indel ratios come from `rapidfuzz`; this module layers the substring,
//! token-sorted and token-set variants on top and combines them into one
//! weighted score.

use rapidfuzz::fuzz;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const FAR_PARTIAL_SCALE: f64 = 0.6;

/// Non-alphanumerics to spaces, lower-cased and trimmed, then the same
/// again over what is left once non-ASCII is dropped
pub fn full_process(s: &str) -> String {
    let unicode = words_only(s.chars(), char::is_alphanumeric);
    words_only(unicode.chars().filter(char::is_ascii), |c| {
        c.is_ascii_alphanumeric()
    })
}

fn words_only(chars: impl Iterator<Item = char>, keep: impl Fn(char) -> bool) -> String {
    chars
        .map(|c| if keep(c) || c == '_' { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Indel similarity of two strings
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    intr(fuzz::ratio(a.chars(), b.chars()))
}

/// Best ratio of the shorter string against any same-length window of the longer
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut best: f64 = 0.0;
    for window in longer.windows(shorter.len()) {
        let r = fuzz::ratio(shorter.iter().copied(), window.iter().copied());
        if r > 99.5 {
            return 100;
        }
        best = best.max(r);
    }
    intr(best)
}

pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, ratio)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, partial_ratio)
}

/// Weighted combination of the scorers above. Both inputs are processed
/// with [`full_process`]; an input that processes to nothing scores 0.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = full_process(a);
    let p2 = full_process(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = f64::from(ratio(&p1, &p2));
    let (long, short) = (p1.len().max(p2.len()), p1.len().min(p2.len()));
    let len_ratio = long as f64 / short as f64;

    if len_ratio < 1.5 {
        let tsor = f64::from(token_sort_ratio(&p1, &p2)) * UNBASE_SCALE;
        let tser = f64::from(token_set_ratio(&p1, &p2)) * UNBASE_SCALE;
        return intr(base.max(tsor).max(tser));
    }

    let partial_scale = if len_ratio > 8.0 {
        FAR_PARTIAL_SCALE
    } else {
        PARTIAL_SCALE
    };
    let partial = f64::from(partial_ratio(&p1, &p2)) * partial_scale;
    let ptsor = f64::from(partial_token_sort_ratio(&p1, &p2)) * UNBASE_SCALE * partial_scale;
    let ptser = f64::from(partial_token_set_ratio(&p1, &p2)) * UNBASE_SCALE * partial_scale;
    intr(base.max(partial).max(ptsor).max(ptser))
}

fn token_set(a: &str, b: &str, score: fn(&str, &str) -> u8) -> u8 {
    if a == b {
        return 100;
    }

    let tokens_a: std::collections::BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: std::collections::BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let sect = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{} {}", sect, only_a).trim().to_string();
    let combined_b = format!("{} {}", sect, only_b).trim().to_string();

    score(&sect, &combined_a)
        .max(score(&sect, &combined_b))
        .max(score(&combined_a, &combined_b))
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<&str>>().join(" ")
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Round half to even, then clamp into a score
fn intr(x: f64) -> u8 {
    x.round_ties_even().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_process() {
        assert_eq!(full_process("  Site-Plan (Draft) "), "site plan  draft");
        assert_eq!(full_process("Caf\u{e9}"), "caf");
        assert_eq!(full_process("[pdf]"), "pdf");
        assert_eq!(full_process("!!!"), "");
    }

    #[test]
    fn test_full_process_unicode_separators() {
        assert_eq!(full_process("Local\u{a0}Plan"), "local plan");
        assert_eq!(full_process("Plan\u{2013}Part 1"), "plan part 1");
        assert_eq!(full_process("\u{c9}tude"), "tude");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("local plan", "local plan"), 100);
        assert_eq!(ratio("abcd", "abce"), 75);
        assert_eq!(ratio("", "abc"), 0);
        assert_eq!(ratio("abc", "xyz"), 0);
    }

    #[test]
    fn test_partial_ratio() {
        assert_eq!(partial_ratio("site plan", "site plan document"), 100);
        assert_eq!(partial_ratio("plan", "local plan"), 100);
        assert!(partial_ratio("xyz", "local plan") < 50);
    }

    #[test]
    fn test_token_sort_ratio() {
        assert_eq!(token_sort_ratio("plan local", "local plan"), 100);
    }

    #[test]
    fn test_token_set_ratio() {
        assert_eq!(token_set_ratio("local plan", "local plan local plan"), 100);
        assert_eq!(token_set_ratio("core strategy", "core strategy review"), 100);
    }

    #[test]
    fn test_weighted_ratio_prefers_related_text() {
        let good = weighted_ratio("Site Plan", "Site Plan Document");
        let bad = weighted_ratio("Site Plan", "Minerals and Waste Local Plan");
        assert!(good > bad, "good={} bad={}", good, bad);
        assert_eq!(good, 90);
    }

    #[test]
    fn test_weighted_ratio_case_and_punctuation_insensitive() {
        assert_eq!(weighted_ratio("LOCAL PLAN!", "local plan"), 100);
        assert_eq!(weighted_ratio("Local\u{a0}Plan", "local plan"), 100);
    }

    #[test]
    fn test_weighted_ratio_empty() {
        assert_eq!(weighted_ratio("", "Local Plan"), 0);
        assert_eq!(weighted_ratio("***", "Local Plan"), 0);
    }

    #[test]
    fn test_intr_rounds_half_even() {
        assert_eq!(intr(84.5), 84);
        assert_eq!(intr(85.5), 86);
        assert_eq!(intr(85.4), 85);
    }
}
