//! Question catalog — the immutable questionnaire loaded once at startup.
//!
//! The catalog document is JSON with three lists:
//!
//! ```json
//! {
//!   "personal_details": [{"text": "What is your age?", "kind": "age"}, "..."],
//!   "symptoms": [{"text": "Do you have a fever?", "days_required": 3}],
//!   "history": ["Any previous falls?"]
//! }
//! ```
//!
//! Personal-details and history entries may also be bare strings, and symptom
//! entries may spell `text` as `question`. A bare personal-details string takes
//! its validation kind from its position (1 = age, 3 = weight), matching the
//! older documents that carried no kind tags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::answer::AnswerKind;
use crate::error::ConfigError;

/// A plain question with a validation kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptSpec {
    pub text: String,
    pub kind: AnswerKind,
}

/// A yes/no symptom question with the day threshold used for recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomPromptSpec {
    #[serde(alias = "question")]
    pub text: String,
    pub days_required: u32,
}

/// The full questionnaire. Every list is non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionCatalog {
    personal_details: Vec<PromptSpec>,
    symptoms: Vec<SymptomPromptSpec>,
    history: Vec<PromptSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrompt {
    Text(String),
    Spec {
        #[serde(alias = "question")]
        text: String,
        #[serde(default)]
        kind: Option<AnswerKind>,
    },
}

#[derive(Deserialize)]
struct RawCatalog {
    personal_details: Vec<RawPrompt>,
    symptoms: Vec<SymptomPromptSpec>,
    history: Vec<RawPrompt>,
}

/// Validation kind for an untagged personal-details entry.
fn positional_kind(index: usize) -> AnswerKind {
    match index {
        1 => AnswerKind::Age,
        3 => AnswerKind::Weight,
        _ => AnswerKind::Freeform,
    }
}

impl RawPrompt {
    fn resolve(self, default_kind: AnswerKind) -> PromptSpec {
        match self {
            Self::Text(text) => PromptSpec {
                text,
                kind: default_kind,
            },
            Self::Spec { text, kind } => PromptSpec {
                text,
                kind: kind.unwrap_or(default_kind),
            },
        }
    }
}

impl QuestionCatalog {
    /// Build a catalog from already-typed lists, enforcing the catalog invariants.
    pub fn new(
        personal_details: Vec<PromptSpec>,
        symptoms: Vec<SymptomPromptSpec>,
        history: Vec<PromptSpec>,
    ) -> Result<Self, ConfigError> {
        let catalog = Self {
            personal_details,
            symptoms,
            history,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawCatalog = serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(format!("question catalog: {e}")))?;

        let personal_details = raw
            .personal_details
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.resolve(positional_kind(i)))
            .collect();
        let history = raw
            .history
            .into_iter()
            .map(|p| p.resolve(AnswerKind::Freeform))
            .collect();

        Self::new(personal_details, raw.symptoms, history)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            personal_details = catalog.personal_details.len(),
            symptoms = catalog.symptoms.len(),
            history = catalog.history.len(),
            "Question catalog loaded"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_section("personal_details", self.personal_details.iter().map(|p| p.text.as_str()))?;
        check_section("symptoms", self.symptoms.iter().map(|s| s.text.as_str()))?;
        check_section("history", self.history.iter().map(|p| p.text.as_str()))?;
        // History answers are recorded verbatim.
        if let Some(i) = self.history.iter().position(|p| p.kind != AnswerKind::Freeform) {
            return Err(ConfigError::InvalidValue {
                key: format!("history[{i}]"),
                message: format!("history questions are freeform, got kind '{}'", self.history[i].kind),
            });
        }
        Ok(())
    }

    pub fn personal_details(&self) -> &[PromptSpec] {
        &self.personal_details
    }

    pub fn symptoms(&self) -> &[SymptomPromptSpec] {
        &self.symptoms
    }

    pub fn history(&self) -> &[PromptSpec] {
        &self.history
    }
}

fn check_section<'a>(
    key: &str,
    texts: impl ExactSizeIterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    if texts.len() == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must contain at least one question".to_string(),
        });
    }
    for (i, text) in texts.enumerate() {
        if text.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: format!("{key}[{i}]"),
                message: "question text is empty".to_string(),
            });
        }
    }
    Ok(())
}
