//! Word-level diff between two text snapshots.
//!
//! The algorithm is a greedy walk with a bounded lookahead window rather
//! than a longest-common-subsequence search. It does not produce a minimal
//! edit script; it only guarantees that the non-deleted tokens spell out the
//! new text and the non-inserted tokens spell out the old text.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffTag {
    Unchanged,
    Inserted,
    Deleted,
}

impl DiffTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Inserted => "inserted",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for DiffTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffToken {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffToken {
    fn new(tag: DiffTag, text: &str) -> Self {
        Self {
            tag,
            text: text.to_string(),
        }
    }
}

/// Tuning knobs for [`diff_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// How many tokens past the cursor to search for a re-synchronising match.
    pub window: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub tokens: Vec<DiffToken>,
}

impl DiffResult {
    pub fn is_unchanged(&self) -> bool {
        self.tokens.iter().all(|token| token.tag == DiffTag::Unchanged)
    }

    pub fn count(&self, tag: DiffTag) -> usize {
        self.tokens.iter().filter(|token| token.tag == tag).count()
    }
}

pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

pub fn diff(old_text: &str, new_text: &str) -> DiffResult {
    diff_with(old_text, new_text, DiffOptions::default())
}

pub fn diff_with(old_text: &str, new_text: &str, options: DiffOptions) -> DiffResult {
    let old = tokenize(old_text);
    let new = tokenize(new_text);
    let mut tokens = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);

    while i < old.len() || j < new.len() {
        let old_word = old.get(i).copied();
        let new_word = new.get(j).copied();

        if old_word.is_some() && old_word == new_word {
            tokens.push(DiffToken::new(DiffTag::Unchanged, old[i]));
            i += 1;
            j += 1;
            continue;
        }

        if let Some(skip) = old_word.and_then(|word| lookahead(&new, j, word, options.window)) {
            tokens.extend(
                new[j..j + skip]
                    .iter()
                    .map(|word| DiffToken::new(DiffTag::Inserted, word)),
            );
            j += skip;
            continue;
        }

        if let Some(skip) = new_word.and_then(|word| lookahead(&old, i, word, options.window)) {
            tokens.extend(
                old[i..i + skip]
                    .iter()
                    .map(|word| DiffToken::new(DiffTag::Deleted, word)),
            );
            i += skip;
            continue;
        }

        if let Some(word) = old_word {
            tokens.push(DiffToken::new(DiffTag::Deleted, word));
            i += 1;
        }
        if let Some(word) = new_word {
            tokens.push(DiffToken::new(DiffTag::Inserted, word));
            j += 1;
        }
    }

    DiffResult { tokens }
}

/// Offset `k` in `1..=window` such that `words[from + k] == target`. Never
/// scans past the end of `words`, whatever the window.
fn lookahead(words: &[&str], from: usize, target: &str, window: usize) -> Option<usize> {
    words
        .get(from + 1..)
        .into_iter()
        .flatten()
        .take(window)
        .position(|word| *word == target)
        .map(|offset| offset + 1)
}
