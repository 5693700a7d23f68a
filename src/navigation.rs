//! Navigation between quiz questions.

use crate::session::{Grade, QuizError, QuizSession};

/// Outcome of a forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Advanced,
    /// Already on the last question (or the dataset is empty); nothing moved.
    Completed,
}

impl QuizSession {
    /// Jump directly to the question at `index`.
    ///
    /// Bumps the input epoch even when re-selecting the current question, so
    /// a host UI clears its input field on every navigation.
    pub fn go_to(&mut self, index: usize) -> Result<(), QuizError> {
        let total = self.items.len();
        if index >= total {
            return Err(QuizError::OutOfRange { index, total });
        }
        self.current_index = index;
        self.input_epoch += 1;
        Ok(())
    }

    /// Step to the next question, reporting completion from the last one.
    ///
    /// `Completed` mutates nothing, so a host may keep calling this at the
    /// end of the quiz and keep getting the same answer.
    pub fn advance(&mut self) -> Advance {
        if self.current_index + 1 < self.items.len() {
            self.current_index += 1;
            self.input_epoch += 1;
            Advance::Advanced
        } else {
            Advance::Completed
        }
    }

    /// Start the quiz over on the same dataset.
    ///
    /// Position, score, and grades return to their initial values and the
    /// input epoch bumps. The attempt log is history and survives; only
    /// replacing the session discards it.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.grades.fill(Grade::Unanswered);
        self.input_epoch += 1;
        tracing::debug!(total = self.items.len(), "quiz restarted");
    }
}
