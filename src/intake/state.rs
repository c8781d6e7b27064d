//! Which stage an intake conversation is in, and what has been answered so far.

use serde::{Deserialize, Serialize};

use super::recommendation::SymptomResponse;

/// The stages of the intake conversation.
///
/// Progresses linearly: Greeting → PersonalDetails → Symptoms → History →
/// Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Greeting,
    PersonalDetails,
    Symptoms,
    History,
    Complete,
}

impl Stage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            (Greeting, PersonalDetails)
                | (PersonalDetails, Symptoms)
                | (Symptoms, History)
                | (History, Complete)
        )
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Get the next stage in the linear progression, if any.
    pub fn next(&self) -> Option<Stage> {
        use Stage::*;
        match self {
            Greeting => Some(PersonalDetails),
            PersonalDetails => Some(Symptoms),
            Symptoms => Some(History),
            History => Some(Complete),
            Complete => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::PersonalDetails => "personal_details",
            Self::Symptoms => "symptoms",
            Self::History => "history",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Position within the conversation, with the data that only exists in a
/// particular stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Step {
    #[default]
    Greeting,
    PersonalDetails { index: usize },
    Symptoms { index: usize, awaiting_day_count: bool },
    History { index: usize },
    Complete { frt_recommended: bool },
}

impl Step {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Greeting => Stage::Greeting,
            Self::PersonalDetails { .. } => Stage::PersonalDetails,
            Self::Symptoms { .. } => Stage::Symptoms,
            Self::History { .. } => Stage::History,
            Self::Complete { .. } => Stage::Complete,
        }
    }

    /// Index of the current question within its stage (0 outside question stages).
    pub fn question_index(&self) -> usize {
        match *self {
            Self::PersonalDetails { index }
            | Self::Symptoms { index, .. }
            | Self::History { index } => index,
            Self::Greeting | Self::Complete { .. } => 0,
        }
    }
}

/// Everything one conversation has accumulated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    step: Step,
    personal_details: Vec<String>,
    symptom_responses: Vec<SymptomResponse>,
    history: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn stage(&self) -> Stage {
        self.step.stage()
    }

    pub fn question_index(&self) -> usize {
        self.step.question_index()
    }

    pub fn awaiting_day_count(&self) -> bool {
        matches!(
            self.step,
            Step::Symptoms {
                awaiting_day_count: true,
                ..
            }
        )
    }

    /// The recommendation, once the conversation is complete.
    pub fn frt_recommended(&self) -> Option<bool> {
        match self.step {
            Step::Complete { frt_recommended } => Some(frt_recommended),
            _ => None,
        }
    }

    pub fn personal_details(&self) -> &[String] {
        &self.personal_details
    }

    pub fn symptom_responses(&self) -> &[SymptomResponse] {
        &self.symptom_responses
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Move to `next`, which must be in the same stage or the following one.
    pub(super) fn move_to(&mut self, next: Step) {
        let (from, to) = (self.stage(), next.stage());
        debug_assert!(
            from == to || from.can_transition_to(to),
            "illegal transition {from} -> {to}"
        );
        self.step = next;
    }

    pub(super) fn record_personal_detail(&mut self, answer: &str) {
        self.personal_details.push(answer.to_string());
    }

    pub(super) fn record_symptom(&mut self, response: SymptomResponse) {
        self.symptom_responses.push(response);
    }

    /// Fill in the day count of the most recent symptom response.
    pub(super) fn record_day_count(&mut self, days: u32) {
        if let Some(last) = self.symptom_responses.last_mut() {
            last.days = Some(days);
        }
    }

    pub(super) fn record_history(&mut self, answer: &str) {
        self.history.push(answer.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use Stage::*;
        let transitions = [
            (Greeting, PersonalDetails),
            (PersonalDetails, Symptoms),
            (Symptoms, History),
            (History, Complete),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use Stage::*;
        // Skip stages
        assert!(!Greeting.can_transition_to(Symptoms));
        assert!(!PersonalDetails.can_transition_to(Complete));
        // Go backward
        assert!(!History.can_transition_to(Symptoms));
        // Terminal
        assert!(!Complete.can_transition_to(Greeting));
        // Self-transition
        assert!(!Symptoms.can_transition_to(Symptoms));
    }

    #[test]
    fn next_walks_all_stages() {
        use Stage::*;
        let mut current = Greeting;
        for expected in [PersonalDetails, Symptoms, History, Complete] {
            let next = current.next().unwrap();
            assert_eq!(next, expected);
            current = next;
        }
        assert!(current.is_terminal());
        assert!(current.next().is_none());
    }

    #[test]
    fn display_matches_serde() {
        use Stage::*;
        for stage in [Greeting, PersonalDetails, Symptoms, History, Complete] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(format!("\"{stage}\""), json, "Display and serde should match for {stage:?}");
        }
    }

    #[test]
    fn day_count_flag_only_exists_in_symptoms() {
        let mut state = SessionState::new();
        assert!(!state.awaiting_day_count());
        state.move_to(Step::PersonalDetails { index: 0 });
        assert!(!state.awaiting_day_count());
        state.move_to(Step::Symptoms {
            index: 0,
            awaiting_day_count: true,
        });
        assert!(state.awaiting_day_count());
        assert_eq!(state.question_index(), 0);
    }

    #[test]
    fn record_day_count_fills_latest_response() {
        let mut state = SessionState::new();
        state.record_symptom(SymptomResponse::no(1));
        state.record_symptom(SymptomResponse::yes(3));
        state.record_day_count(4);
        assert_eq!(state.symptom_responses()[0].days, Some(0));
        assert_eq!(state.symptom_responses()[1].days, Some(4));
    }

    #[test]
    fn step_serializes_with_stage_tag() {
        let json = serde_json::to_value(Step::Symptoms {
            index: 2,
            awaiting_day_count: true,
        })
        .unwrap();
        assert_eq!(json["stage"], "symptoms");
        assert_eq!(json["index"], 2);
        assert_eq!(json["awaiting_day_count"], true);
    }
}
