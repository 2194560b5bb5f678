use std::collections::HashMap;

/// Best-effort single-token spelling correction.
///
/// `None` means "no confident correction"; callers keep the original token.
pub trait Corrector: Send + Sync {
    fn correct(&self, token: &str) -> Option<String>;
}

/// Leaves every token as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrection;

impl Corrector for NoCorrection {
    fn correct(&self, _token: &str) -> Option<String> { None }
}

/// Dictionary corrector: picks the closest known word by edit distance, then by frequency.
#[derive(Debug, Clone)]
pub struct FrequencyCorrector {
    words: HashMap<String, u32>,
    max_distance: usize,
}

impl FrequencyCorrector {
    pub fn new(max_distance: usize) -> Self {
        Self { words: HashMap::new(), max_distance }
    }

    /// Count every alphabetic whitespace-delimited word of `text`.
    pub fn add_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if is_correctable(word) {
                *self.words.entry(word.to_lowercase()).or_insert(0) += 1;
            }
        }
    }

    /// Register words as known without giving them corpus weight.
    pub fn add_known<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref();
            if is_correctable(word) {
                self.words.entry(word.to_lowercase()).or_insert(0);
            }
        }
    }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn is_known(&self, word: &str) -> bool { self.words.contains_key(word) }
}

impl Corrector for FrequencyCorrector {
    /// Corrects the alphabetic core of `token`; leading and trailing punctuation is kept.
    fn correct(&self, token: &str) -> Option<String> {
        let core = token.trim_matches(|c: char| !c.is_ascii_alphabetic());
        if !is_correctable(core) {
            return None;
        }
        let start = token.len() - token.trim_start_matches(|c: char| !c.is_ascii_alphabetic()).len();
        let (prefix, rest) = token.split_at(start);
        let suffix = &rest[core.len()..];
        let word = self.correct_word(&core.to_lowercase())?;
        Some(format!("{prefix}{word}{suffix}"))
    }
}

impl FrequencyCorrector {
    fn correct_word(&self, token: &str) -> Option<String> {
        if self.is_known(token) {
            return Some(token.to_string());
        }
        let budget = edit_budget(token.len(), self.max_distance);
        if budget == 0 {
            return None;
        }

        let mut best: Option<(usize, u32, &str)> = None;
        for (word, &freq) in &self.words {
            let Some(dist) = osa_distance_within(token, word, budget) else { continue };
            let better = match best {
                None => true,
                Some((bd, bf, bw)) => (dist, std::cmp::Reverse(freq), word.as_str()) < (bd, std::cmp::Reverse(bf), bw),
            };
            if better {
                best = Some((dist, freq, word.as_str()));
            }
        }
        best.map(|(_, _, w)| w.to_string())
    }
}

/// Edits allowed for a token of `len` letters: none up to two, one up to four.
fn edit_budget(len: usize, max: usize) -> usize {
    match len {
        0..=2 => 0,
        3..=4 => max.min(1),
        _ => max,
    }
}

fn is_correctable(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Optimal string alignment distance (adjacent transpositions count as one edit),
/// or `None` once it provably exceeds `max`.
pub fn osa_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut prev_prev: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur: Vec<usize> = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        cur[0] = i;
        let mut row_min = cur[0];
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut d = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d = d.min(prev_prev[j - 2] + 1);
            }
            cur[j] = d;
            row_min = row_min.min(d);
        }
        // A later transposition can only reach back one row, so two rows over budget means done.
        if row_min > max && prev.iter().min().copied().unwrap_or(0) > max {
            return None;
        }
        std::mem::swap(&mut prev_prev, &mut prev);
        std::mem::swap(&mut prev, &mut cur);
    }
    let dist = prev[b.len()];
    (dist <= max).then_some(dist)
}
