//! The intake questionnaire.
//!
//! The conversation walks personal details, symptoms (with a day-count
//! follow-up for every "yes") and history, then applies the recommendation
//! rule to the recorded symptom answers.

pub mod answer;
pub mod catalog;
pub mod engine;
pub mod prompts;
pub mod recommendation;
pub mod state;

pub use answer::AnswerKind;
pub use catalog::{PromptSpec, QuestionCatalog, SymptomPromptSpec};
pub use engine::{DialogEngine, Prompt};
pub use recommendation::{SymptomResponse, needs_further_test};
pub use state::{SessionState, Stage, Step};
