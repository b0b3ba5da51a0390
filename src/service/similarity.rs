use std::collections::HashSet;

/// Edit-distance based similarity in [0, 1]; two empty strings count as identical.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());

    match longest {
        0 => 1.0,
        _ if a.is_empty() || b.is_empty() => 0.0,
        _ => 1.0 - levenshtein_distance(a, b) as f64 / longest as f64,
    }
}

/// Share of distinct words two strings have in common, relative to the wordier side.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let a_words: HashSet<&str> = a.split_whitespace().collect();
    let b_words: HashSet<&str> = b.split_whitespace().collect();

    let denominator = a_words.len().max(b_words.len());
    if denominator == 0 {
        return 0.0;
    }

    let common = a_words.intersection(&b_words).count();
    common as f64 / denominator as f64
}

/// Levenshtein distance over chars, two-row variant.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}
