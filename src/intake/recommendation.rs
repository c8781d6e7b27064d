//! Decides whether a Functional Reach Test is warranted.

use serde::{Deserialize, Serialize};

/// A recorded answer to one symptom question.
///
/// `days_required` is captured from the catalog when the answer is recorded,
/// so the rule never needs to consult the catalog again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomResponse {
    pub answered_yes: bool,
    /// `None` while the follow-up day count is still outstanding.
    pub days: Option<u32>,
    pub days_required: u32,
}

impl SymptomResponse {
    /// A "yes" answer awaiting its day count.
    pub fn yes(days_required: u32) -> Self {
        Self {
            answered_yes: true,
            days: None,
            days_required,
        }
    }

    /// A "no" answer; counts as zero days.
    pub fn no(days_required: u32) -> Self {
        Self {
            answered_yes: false,
            days: Some(0),
            days_required,
        }
    }

    /// Whether this response on its own meets its threshold (inclusive).
    pub fn meets_threshold(&self) -> bool {
        self.answered_yes && self.days.is_some_and(|d| d >= self.days_required)
    }
}

/// True iff any response is a "yes" whose day count reached its own threshold.
pub fn needs_further_test(responses: &[SymptomResponse]) -> bool {
    responses.iter().any(SymptomResponse::meets_threshold)
}
