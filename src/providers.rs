//! Seams for external collaborators: definition lookup and speech audio.
//!
//! The engine performs no network or audio I/O of its own. Hosts plug their
//! implementations in behind these traits; the helpers here pin down the
//! recovery policy: hints and audio are best-effort extras whose failures
//! never surface as quiz errors.

use std::collections::HashMap;

use thiserror::Error;

/// Fallback hint text shown when no definition can be produced.
pub const NO_DEFINITION_FALLBACK: &str = "No definition found.";

/// Failure shapes shared by the external collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("no entry found")]
    NotFound,
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Looks up a short definition for a term, used as a quiz hint.
pub trait DefinitionProvider {
    fn define(&self, term: &str) -> Result<String, ProviderError>;
}

/// Fetch a hint, degrading every failure to the fixed fallback text.
pub fn definition_or_fallback(provider: &dyn DefinitionProvider, term: &str) -> String {
    match provider.define(term) {
        Ok(definition) => definition,
        Err(err) => {
            tracing::debug!(term, error = %err, "definition lookup failed, using fallback");
            NO_DEFINITION_FALLBACK.to_string()
        }
    }
}

/// Synthesized pronunciation audio for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Turns text into pronunciation audio for dictation prompts.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str) -> Result<AudioClip, ProviderError>;
}

/// Synthesize audio, treating any failure as "no audio for this question".
pub fn synthesize_or_skip(synthesizer: &dyn SpeechSynthesizer, text: &str) -> Option<AudioClip> {
    match synthesizer.synthesize(text) {
        Ok(clip) => Some(clip),
        Err(err) => {
            tracing::debug!(text, error = %err, "speech synthesis failed, skipping audio");
            None
        }
    }
}

/// In-memory definition source for bundled glossaries and tests.
///
/// Lookup is case-insensitive, matching how terms are graded.
#[derive(Debug, Clone, Default)]
pub struct StaticDictionary {
    entries: HashMap<String, String>,
}

impl StaticDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, definition: impl Into<String>) {
        self.entries
            .insert(term.into().to_lowercase(), definition.into());
    }
}

impl DefinitionProvider for StaticDictionary {
    fn define(&self, term: &str) -> Result<String, ProviderError> {
        self.entries
            .get(&term.to_lowercase())
            .cloned()
            .ok_or(ProviderError::NotFound)
    }
}
