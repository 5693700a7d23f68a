//! Quiz session state: position, per-question grades, score, and grading.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{VocabularyDataset, VocabularyItem};
use crate::fuzzy::{AnswerEvaluator, MatchResult};
use crate::progress::AttemptRecord;

/// Grading rule for the active quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// The learner sees the term and answers with its meaning.
    #[default]
    Reading,
    /// The learner hears the term and answers with spelling and meaning.
    Dictation,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Reading => write!(f, "reading"),
            QuizMode::Dictation => write!(f, "dictation"),
        }
    }
}

/// Latest grading outcome of one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

/// A learner's submission, shaped by the quiz mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Reading { meaning: String },
    Dictation { spelling: String, meaning: String },
}

impl Answer {
    pub fn reading(meaning: impl Into<String>) -> Self {
        Self::Reading {
            meaning: meaning.into(),
        }
    }

    pub fn dictation(spelling: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self::Dictation {
            spelling: spelling.into(),
            meaning: meaning.into(),
        }
    }
}

/// One graded answer field, with the canonical expected value for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOutcome {
    pub expected: String,
    pub is_correct: bool,
    pub similarity: f64,
    pub feedback: String,
}

impl FieldOutcome {
    fn graded(expected: &str, result: MatchResult) -> Self {
        Self {
            expected: expected.to_string(),
            is_correct: result.is_correct,
            similarity: result.similarity,
            feedback: result.feedback,
        }
    }
}

/// Outcome of grading one submission.
///
/// `is_correct` is the overall verdict; in dictation mode it requires both
/// fields, and a half-right submission still reports each field on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResult {
    pub is_correct: bool,
    pub meaning: FieldOutcome,
    /// Present only for dictation submissions.
    pub spelling: Option<FieldOutcome>,
}

/// Running score over the whole quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
}

/// Errors raised by session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question index {index} out of range for {total} question(s)")]
    OutOfRange { index: usize, total: usize },
    #[error("answer shape does not match the active {mode} mode")]
    AnswerMismatch { mode: QuizMode },
}

/// Interactive quiz over one loaded dataset.
///
/// The session owns all mutable quiz state; the dataset itself is shared and
/// read-only. Queries are side-effect-free and safe to repeat on every
/// re-render of a host UI; the mutating operations each apply their whole
/// update before returning.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub(crate) items: Arc<VocabularyDataset>,
    pub(crate) mode: QuizMode,
    pub(crate) evaluator: AnswerEvaluator,
    pub(crate) current_index: usize,
    pub(crate) score: usize,
    pub(crate) grades: Vec<Grade>,
    pub(crate) input_epoch: u64,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) attempts: Vec<AttemptRecord>,
}

impl QuizSession {
    /// Fresh session: question 0, reading mode, score 0, nothing answered.
    ///
    /// An empty dataset is allowed; such a session has no current item and
    /// reports itself complete on the first advance.
    pub fn new(items: Arc<VocabularyDataset>) -> Self {
        let grades = vec![Grade::Unanswered; items.len()];
        Self {
            items,
            mode: QuizMode::default(),
            evaluator: AnswerEvaluator::default(),
            current_index: 0,
            score: 0,
            grades,
            input_epoch: 0,
            started_at: Utc::now(),
            attempts: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: QuizMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_evaluator(mut self, evaluator: AnswerEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Grade a submission for the question at `index`.
    ///
    /// The question's grade is overwritten and the score adjusted so that it
    /// always equals the number of questions currently graded correct.
    /// Re-submitting is allowed; only transitions into or out of correct
    /// move the score. Every call appends to the attempt log, including
    /// re-submissions.
    pub fn submit(&mut self, index: usize, answer: &Answer) -> Result<GradeResult, QuizError> {
        let total = self.items.len();
        let item = self
            .items
            .get(index)
            .ok_or(QuizError::OutOfRange { index, total })?;

        let result = match (self.mode, answer) {
            (QuizMode::Reading, Answer::Reading { meaning }) => {
                let outcome =
                    FieldOutcome::graded(&item.meaning, self.evaluator.check(meaning, &item.meaning));
                GradeResult {
                    is_correct: outcome.is_correct,
                    meaning: outcome,
                    spelling: None,
                }
            }
            (QuizMode::Dictation, Answer::Dictation { spelling, meaning }) => {
                let spelling_outcome =
                    FieldOutcome::graded(&item.term, self.evaluator.check(spelling, &item.term));
                let meaning_outcome =
                    FieldOutcome::graded(&item.meaning, self.evaluator.check(meaning, &item.meaning));
                GradeResult {
                    is_correct: spelling_outcome.is_correct && meaning_outcome.is_correct,
                    meaning: meaning_outcome,
                    spelling: Some(spelling_outcome),
                }
            }
            _ => return Err(QuizError::AnswerMismatch { mode: self.mode }),
        };

        let was_correct = self.grades[index] == Grade::Correct;
        if result.is_correct && !was_correct {
            self.score += 1;
        } else if was_correct && !result.is_correct {
            self.score = self.score.saturating_sub(1);
        }
        self.grades[index] = if result.is_correct {
            Grade::Correct
        } else {
            Grade::Incorrect
        };

        let (submitted_spelling, submitted_meaning) = match answer {
            Answer::Reading { meaning } => (None, meaning.clone()),
            Answer::Dictation { spelling, meaning } => (Some(spelling.clone()), meaning.clone()),
        };
        self.attempts.push(AttemptRecord {
            index,
            mode: self.mode,
            is_correct: result.is_correct,
            submitted_meaning,
            submitted_spelling,
            attempted_at: Utc::now(),
        });

        tracing::debug!(
            index,
            mode = %self.mode,
            correct = result.is_correct,
            score = self.score,
            "graded submission"
        );

        Ok(result)
    }

    /// Switch the grading rule for subsequent submissions.
    ///
    /// Grades, score, and position are kept as they are; switching changes
    /// only how later submissions are graded.
    pub fn set_mode(&mut self, mode: QuizMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn evaluator(&self) -> &AnswerEvaluator {
        &self.evaluator
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question the learner is looking at, `None` for an empty dataset.
    pub fn current_item(&self) -> Option<&VocabularyItem> {
        self.items.get(self.current_index)
    }

    pub fn items(&self) -> &VocabularyDataset {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Grade of the question at `index`, `None` out of range.
    pub fn grade_of(&self, index: usize) -> Option<Grade> {
        self.grades.get(index).copied()
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn score_summary(&self) -> ScoreSummary {
        ScoreSummary {
            score: self.score,
            total: self.items.len(),
        }
    }

    /// Monotonic counter a host UI keys its input widgets on; bumping it
    /// tells the UI to present a cleared input field.
    pub fn input_epoch(&self) -> u64 {
        self.input_epoch
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::DEFAULT_MATCH_THRESHOLD;

    fn dataset() -> Arc<VocabularyDataset> {
        Arc::new(VocabularyDataset::new(vec![
            VocabularyItem::new("apple", "사과"),
            VocabularyItem::new("book", "책"),
            VocabularyItem::new("water", "물"),
        ]))
    }

    fn correct_count(session: &QuizSession) -> usize {
        session
            .grades()
            .iter()
            .filter(|g| **g == Grade::Correct)
            .count()
    }

    #[test]
    fn new_session_starts_blank() {
        let session = QuizSession::new(dataset());

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.mode(), QuizMode::Reading);
        assert_eq!(session.input_epoch(), 0);
        assert!(session.grades().iter().all(|g| *g == Grade::Unanswered));
        assert_eq!(session.current_item().unwrap().term, "apple");
        assert_eq!(session.evaluator().threshold(), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(session.items().len(), 3);
        assert!(session.started_at() <= Utc::now());
    }

    #[test]
    fn reading_submission_grades_against_the_meaning() {
        let mut session = QuizSession::new(dataset());

        let result = session.submit(0, &Answer::reading("사과")).unwrap();
        assert!(result.is_correct);
        assert!(result.spelling.is_none());
        assert_eq!(result.meaning.expected, "사과");
        assert_eq!(session.grade_of(0), Some(Grade::Correct));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn near_miss_is_rejected_and_graded_incorrect() {
        let mut session = QuizSession::new(dataset());

        let result = session.submit(0, &Answer::reading("사과즉")).unwrap();
        assert!(!result.is_correct);
        assert!((result.meaning.similarity - 0.8).abs() < 1e-9);
        assert_eq!(session.grade_of(0), Some(Grade::Incorrect));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn score_follows_grade_transitions_exactly() {
        let mut session = QuizSession::new(dataset());

        session.submit(0, &Answer::reading("사과")).unwrap();
        assert_eq!(session.score(), 1);

        // Same outcome again, no movement.
        session.submit(0, &Answer::reading("사과")).unwrap();
        assert_eq!(session.score(), 1);

        // Correct to incorrect decrements once.
        session.submit(0, &Answer::reading("오렌지")).unwrap();
        assert_eq!(session.score(), 0);

        // Incorrect to incorrect stays put.
        session.submit(0, &Answer::reading("포도")).unwrap();
        assert_eq!(session.score(), 0);

        // Back to correct increments again.
        session.submit(0, &Answer::reading("사 과")).unwrap();
        assert_eq!(session.score(), 1);

        assert_eq!(session.score(), correct_count(&session));
    }

    #[test]
    fn score_equals_correct_grades_across_questions() {
        let mut session = QuizSession::new(dataset());

        session.submit(0, &Answer::reading("사과")).unwrap();
        session.submit(1, &Answer::reading("그림")).unwrap();
        session.submit(2, &Answer::reading("물")).unwrap();

        assert_eq!(session.score(), 2);
        assert_eq!(session.score(), correct_count(&session));
        assert_eq!(
            session.score_summary(),
            ScoreSummary { score: 2, total: 3 }
        );
    }

    #[test]
    fn dictation_grades_spelling_and_meaning_together() {
        let mut session = QuizSession::new(dataset()).with_mode(QuizMode::Dictation);

        // Misspelled term within tolerance plus exact meaning passes.
        let result = session.submit(0, &Answer::dictation("aple", "사과")).unwrap();
        assert!(result.is_correct);
        let spelling = result.spelling.unwrap();
        assert!(spelling.is_correct);
        assert!((spelling.similarity - 8.0 / 9.0).abs() < 1e-9);
        assert_eq!(spelling.expected, "apple");
    }

    #[test]
    fn dictation_with_one_wrong_field_is_incorrect_overall() {
        let mut session = QuizSession::new(dataset()).with_mode(QuizMode::Dictation);

        let result = session.submit(0, &Answer::dictation("apple", "바나나")).unwrap();
        assert!(!result.is_correct);
        assert!(result.spelling.unwrap().is_correct);
        assert!(!result.meaning.is_correct);
        assert_eq!(session.grade_of(0), Some(Grade::Incorrect));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn answer_shape_must_match_the_active_mode() {
        let mut session = QuizSession::new(dataset());

        let err = session
            .submit(0, &Answer::dictation("apple", "사과"))
            .unwrap_err();
        assert_eq!(
            err,
            QuizError::AnswerMismatch {
                mode: QuizMode::Reading
            }
        );
        // A rejected submission leaves no trace.
        assert_eq!(session.grade_of(0), Some(Grade::Unanswered));
        assert_eq!(session.score(), 0);
        assert!(session.attempts().is_empty());
    }

    #[test]
    fn out_of_range_submission_is_rejected() {
        let mut session = QuizSession::new(dataset());

        let err = session.submit(3, &Answer::reading("사과")).unwrap_err();
        assert_eq!(err, QuizError::OutOfRange { index: 3, total: 3 });
    }

    #[test]
    fn switching_mode_keeps_grades_score_and_position() {
        let mut session = QuizSession::new(dataset());
        session.submit(0, &Answer::reading("사과")).unwrap();
        let epoch = session.input_epoch();

        session.set_mode(QuizMode::Dictation);

        assert_eq!(session.mode(), QuizMode::Dictation);
        assert_eq!(session.score(), 1);
        assert_eq!(session.grade_of(0), Some(Grade::Correct));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.input_epoch(), epoch);
    }

    #[test]
    fn empty_dataset_session_is_inert() {
        let mut session = QuizSession::new(Arc::new(VocabularyDataset::new(Vec::new())));

        assert!(session.current_item().is_none());
        assert_eq!(session.total(), 0);
        let err = session.submit(0, &Answer::reading("사과")).unwrap_err();
        assert_eq!(err, QuizError::OutOfRange { index: 0, total: 0 });
    }

    #[test]
    fn grade_lookup_out_of_range_is_none() {
        let session = QuizSession::new(dataset());
        assert_eq!(session.grade_of(3), None);
    }

    #[test]
    fn mode_names_render_for_attempt_records() {
        assert_eq!(QuizMode::Reading.to_string(), "reading");
        assert_eq!(QuizMode::Dictation.to_string(), "dictation");
    }
}
