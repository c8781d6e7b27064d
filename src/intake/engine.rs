//! DialogEngine — drives one intake conversation, one message at a time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::answer::{YesNo, parse_count, parse_yes_no};
use super::catalog::QuestionCatalog;
use super::prompts;
use super::recommendation::{SymptomResponse, needs_further_test};
use super::state::{SessionState, Step};

/// What the engine says back: the next question and any fixed choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub question: String,
    pub options: Vec<String>,
}

impl Prompt {
    pub fn text(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options<I, S>(question: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// The intake state machine for a single session.
///
/// Bad answers are never errors: they come back as a re-prompt and leave the
/// state untouched.
pub struct DialogEngine {
    session_id: Uuid,
    catalog: Arc<QuestionCatalog>,
    state: SessionState,
}

impl DialogEngine {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            catalog,
            state: SessionState::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Consume one user message and produce the next prompt.
    pub fn handle_message(&mut self, raw: &str) -> Prompt {
        let before = self.state.stage();

        let prompt = match self.state.step() {
            Step::Greeting => self.greet(),
            Step::PersonalDetails { index } => self.answer_personal_detail(index, raw),
            Step::Symptoms {
                index,
                awaiting_day_count: false,
            } => self.answer_symptom(index, raw),
            Step::Symptoms {
                index,
                awaiting_day_count: true,
            } => self.answer_day_count(index, raw),
            Step::History { index } => self.answer_history(index, raw),
            Step::Complete { frt_recommended } => {
                debug!(session_id = %self.session_id, "Message received after intake completed");
                terminal_prompt(frt_recommended)
            }
        };

        let after = self.state.stage();
        if before != after {
            info!(
                session_id = %self.session_id,
                from = %before,
                to = %after,
                "Intake stage changed"
            );
        }
        prompt
    }

    fn greet(&mut self) -> Prompt {
        self.state.move_to(Step::PersonalDetails { index: 0 });
        Prompt::text(prompts::welcome(&self.catalog.personal_details()[0].text))
    }

    fn answer_personal_detail(&mut self, index: usize, raw: &str) -> Prompt {
        let spec = &self.catalog.personal_details()[index];
        if let Err(reprompt) = spec.kind.validate(raw) {
            debug!(
                session_id = %self.session_id,
                question_index = index,
                kind = %spec.kind,
                "Personal detail rejected"
            );
            return Prompt::text(reprompt);
        }

        self.state.record_personal_detail(raw);
        let next = index + 1;
        if next < self.catalog.personal_details().len() {
            self.state.move_to(Step::PersonalDetails { index: next });
            Prompt::text(&self.catalog.personal_details()[next].text)
        } else {
            self.enter_symptom(0)
        }
    }

    fn answer_symptom(&mut self, index: usize, raw: &str) -> Prompt {
        let days_required = self.catalog.symptoms()[index].days_required;
        match parse_yes_no(raw) {
            Some(YesNo::No) => {
                self.state.record_symptom(SymptomResponse::no(days_required));
                self.finish_symptom(index)
            }
            Some(YesNo::Yes) => {
                self.state.record_symptom(SymptomResponse::yes(days_required));
                self.state.move_to(Step::Symptoms {
                    index,
                    awaiting_day_count: true,
                });
                Prompt::text(prompts::DAY_COUNT)
            }
            None => {
                debug!(session_id = %self.session_id, question_index = index, "Expected yes or no");
                Prompt::text(prompts::YES_NO_ERROR)
            }
        }
    }

    fn answer_day_count(&mut self, index: usize, raw: &str) -> Prompt {
        match parse_count(raw) {
            Some(days) => {
                self.state.record_day_count(days);
                self.finish_symptom(index)
            }
            None => {
                debug!(session_id = %self.session_id, question_index = index, "Day count rejected");
                Prompt::text(prompts::DAY_COUNT_ERROR)
            }
        }
    }

    fn finish_symptom(&mut self, index: usize) -> Prompt {
        let next = index + 1;
        if next < self.catalog.symptoms().len() {
            self.enter_symptom(next)
        } else {
            self.state.move_to(Step::History { index: 0 });
            Prompt::text(&self.catalog.history()[0].text)
        }
    }

    fn enter_symptom(&mut self, index: usize) -> Prompt {
        self.state.move_to(Step::Symptoms {
            index,
            awaiting_day_count: false,
        });
        Prompt::text(&self.catalog.symptoms()[index].text)
    }

    fn answer_history(&mut self, index: usize, raw: &str) -> Prompt {
        self.state.record_history(raw);
        let next = index + 1;
        if next < self.catalog.history().len() {
            self.state.move_to(Step::History { index: next });
            return Prompt::text(&self.catalog.history()[next].text);
        }

        let frt_recommended = needs_further_test(self.state.symptom_responses());
        self.state.move_to(Step::Complete { frt_recommended });
        info!(
            session_id = %self.session_id,
            frt_recommended,
            symptoms_reported = self
                .state
                .symptom_responses()
                .iter()
                .filter(|r| r.answered_yes)
                .count(),
            "Intake complete"
        );
        terminal_prompt(frt_recommended)
    }
}

/// The prompt shown on completion, and re-shown for any later message.
fn terminal_prompt(frt_recommended: bool) -> Prompt {
    if frt_recommended {
        Prompt::with_options(prompts::FRT_RECOMMENDED, prompts::FRT_OPTIONS)
    } else {
        Prompt::text(prompts::FRT_NOT_NEEDED)
    }
}

impl std::fmt::Debug for DialogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogEngine")
            .field("session_id", &self.session_id)
            .field("stage", &self.state.stage())
            .field("question_index", &self.state.question_index())
            .finish()
    }
}
