//! In-session attempt history and aggregate statistics.
//!
//! Grades hold only the latest outcome per question; the attempt log keeps
//! every submission, so a host can show accuracy over time and which items
//! keep tripping the learner up. The log lives and dies with the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::VocabularyItem;
use crate::session::{QuizMode, QuizSession};

/// One graded submission, as it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub index: usize,
    pub mode: QuizMode,
    pub is_correct: bool,
    pub submitted_meaning: String,
    /// Only dictation submissions carry a spelling.
    pub submitted_spelling: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

/// Aggregate statistics over the attempt log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttemptStats {
    pub total_attempts: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub accuracy_percent: f64,
}

impl QuizSession {
    /// Every submission made in this session, oldest first.
    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    /// Counts and accuracy over the whole attempt log.
    pub fn attempt_stats(&self) -> AttemptStats {
        let total = self.attempts.len();
        let correct = self.attempts.iter().filter(|a| a.is_correct).count();
        let accuracy = if total > 0 {
            (correct as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        AttemptStats {
            total_attempts: total,
            correct_count: correct,
            incorrect_count: total - correct,
            accuracy_percent: accuracy,
        }
    }

    /// Items ranked by how often they were answered incorrectly, worst
    /// first, ties in question order. Items never missed are left out.
    pub fn most_missed(&self, limit: usize) -> Vec<(&VocabularyItem, usize)> {
        let mut misses = vec![0usize; self.items.len()];
        for attempt in &self.attempts {
            if !attempt.is_correct {
                if let Some(slot) = misses.get_mut(attempt.index) {
                    *slot += 1;
                }
            }
        }

        let mut ranked: Vec<(usize, usize)> = misses
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect();
        // Stable sort keeps question order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);

        ranked
            .into_iter()
            .filter_map(|(index, count)| self.items.get(index).map(|item| (item, count)))
            .collect()
    }
}
