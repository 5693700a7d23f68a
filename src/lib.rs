//! Vocadrill Core - quiz session engine for vocabulary drills
//!
//! Provides vocabulary file loading (Excel and CSV), fuzzy answer grading,
//! quiz session state with navigation and scoring, in-session attempt
//! statistics, and seams for definition and speech collaborators.

mod dataset;
mod fuzzy;
mod navigation;
mod progress;
mod providers;
mod session;

pub use dataset::{LoadError, VocabularyDataset, VocabularyItem};
pub use fuzzy::{
    normalize, similarity_ratio, AnswerEvaluator, MatchResult, DEFAULT_MATCH_THRESHOLD,
};
pub use navigation::Advance;
pub use progress::{AttemptRecord, AttemptStats};
pub use providers::{
    definition_or_fallback, synthesize_or_skip, AudioClip, DefinitionProvider, ProviderError,
    SpeechSynthesizer, StaticDictionary, NO_DEFINITION_FALLBACK,
};
pub use session::{
    Answer, FieldOutcome, Grade, GradeResult, QuizError, QuizMode, QuizSession, ScoreSummary,
};
