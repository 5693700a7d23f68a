//! Fuzzy answer matching for quiz grading.
//!
//! Grading never demands exact string identity: submissions are normalized
//! (case, punctuation, and spacing removed) and then compared with a
//! longest-matching-blocks similarity ratio, so minor typos still count
//! for language learners.

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Similarity cutoff above which a non-exact answer is accepted.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;

/// Result of comparing a submitted answer against the expected one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub is_correct: bool,
    pub similarity: f64,
    pub feedback: String,
}

/// Strip a submission down to the characters that matter for grading:
/// lower-cased letters and digits. Punctuation, symbols, and all whitespace
/// are dropped, so "Apple!", " apple " and "ap ple" normalize identically.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Similarity ratio in `[0.0, 1.0]` between two strings.
///
/// Classic longest-matching-blocks measure: find the longest common
/// contiguous block, apply the same search to the left and right remainders,
/// and return `2 * matched / (len(a) + len(b))`. Two empty strings are
/// identical by definition (ratio 1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let combined = a.len() + b.len();
    if combined == 0 {
        return 1.0;
    }

    // Orientation is fixed here so the ratio comes out identical whichever
    // way the caller orders the arguments.
    let (first, second) = if a <= b { (&a, &b) } else { (&b, &a) };
    let matched = matched_len(first, second);

    (2 * matched) as f64 / combined as f64
}

/// A common contiguous run of characters, located in both inputs.
struct Block {
    a_start: usize,
    b_start: usize,
    len: usize,
}

fn longest_common_block(a: &[char], b: &[char]) -> Block {
    let mut best = Block {
        a_start: 0,
        b_start: 0,
        len: 0,
    };

    // run[j + 1] = length of the common run ending at a[i] / b[j].
    let mut prev = vec![0usize; b.len() + 1];
    let mut run = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            run[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            if run[j + 1] > best.len {
                best = Block {
                    a_start: i + 1 - run[j + 1],
                    b_start: j + 1 - run[j + 1],
                    len: run[j + 1],
                };
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    best
}

/// Characters matched by the longest block plus whatever the left and right
/// remainders match recursively.
fn matched_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let block = longest_common_block(a, b);
    if block.len == 0 {
        return 0;
    }

    block.len
        + matched_len(&a[..block.a_start], &b[..block.b_start])
        + matched_len(&a[block.a_start + block.len..], &b[block.b_start + block.len..])
}

/// Grades submitted answers against expected ones.
///
/// The threshold is the one tunable of the grader; the default accepts
/// answers whose normalized similarity reaches 0.85, strict enough to
/// reject a different word of similar length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluator {
    threshold: f64,
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl AnswerEvaluator {
    /// Evaluator with the default 0.85 threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator with a custom similarity threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare a submitted answer against the expected one.
    ///
    /// An exact match after normalization short-circuits; otherwise the
    /// similarity ratio of the normalized strings decides. Never fails,
    /// any input including empty produces a result.
    pub fn check(&self, submitted: &str, expected: &str) -> MatchResult {
        let submitted_norm = normalize(submitted);
        let expected_norm = normalize(expected);

        // Exact match
        if submitted_norm == expected_norm {
            return MatchResult {
                is_correct: true,
                similarity: 1.0,
                feedback: "Perfect! ✓".to_string(),
            };
        }

        let similarity = similarity_ratio(&submitted_norm, &expected_norm);

        let (is_correct, feedback) = if similarity >= self.threshold {
            (
                true,
                format!("Close enough! ✓ ({}% match)", (similarity * 100.0) as i32),
            )
        } else if similarity >= 0.5 {
            let distance = levenshtein(&submitted_norm, &expected_norm);
            (
                false,
                format!(
                    "Almost! {} characters off. Expected: '{}'",
                    distance, expected
                ),
            )
        } else {
            (false, format!("Incorrect. Expected: '{}'", expected))
        };

        MatchResult {
            is_correct,
            similarity,
            feedback,
        }
    }

    /// Convenience wrapper over [`check`](Self::check).
    pub fn is_correct(&self, submitted: &str, expected: &str) -> bool {
        self.check(submitted, expected).is_correct
    }
}
