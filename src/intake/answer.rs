//! Answer validation for each question kind.

use serde::{Deserialize, Serialize};

use super::prompts;

/// Validation rule attached to a personal-details question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Any non-blank text.
    #[default]
    Freeform,
    /// Non-negative whole number of years.
    Age,
    /// Positive, finite weight in kg.
    Weight,
}

impl AnswerKind {
    /// Check a raw answer against this kind.
    ///
    /// On rejection returns the re-prompt to show the user.
    pub fn validate(self, raw: &str) -> Result<(), &'static str> {
        let accepted = match self {
            Self::Freeform => !raw.trim().is_empty(),
            Self::Age => parse_count(raw).is_some(),
            Self::Weight => parse_weight(raw).is_some(),
        };
        if accepted {
            Ok(())
        } else {
            Err(self.error_prompt())
        }
    }

    /// The fixed re-prompt for a rejected answer of this kind.
    pub fn error_prompt(self) -> &'static str {
        match self {
            Self::Freeform => prompts::FREEFORM_ERROR,
            Self::Age => prompts::AGE_ERROR,
            Self::Weight => prompts::WEIGHT_ERROR,
        }
    }
}

impl std::fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Freeform => write!(f, "freeform"),
            Self::Age => write!(f, "age"),
            Self::Weight => write!(f, "weight"),
        }
    }
}

/// A yes/no answer to a symptom question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

/// Parse a case-insensitive "yes" / "no".
pub fn parse_yes_no(raw: &str) -> Option<YesNo> {
    let answer = raw.trim();
    if answer.eq_ignore_ascii_case("yes") {
        Some(YesNo::Yes)
    } else if answer.eq_ignore_ascii_case("no") {
        Some(YesNo::No)
    } else {
        None
    }
}

/// Parse a non-negative whole number (ages, day counts).
///
/// Only ASCII digits are accepted, so "-3", "+3" and "3.0" are all rejected.
pub fn parse_count(raw: &str) -> Option<u32> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse a positive, finite decimal.
pub fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_accepts_whole_numbers_only() {
        assert!(AnswerKind::Age.validate("30").is_ok());
        assert!(AnswerKind::Age.validate("0").is_ok());
        assert!(AnswerKind::Age.validate(" 42 ").is_ok());
        assert_eq!(AnswerKind::Age.validate("thirty"), Err(prompts::AGE_ERROR));
        assert_eq!(AnswerKind::Age.validate("-1"), Err(prompts::AGE_ERROR));
        assert_eq!(AnswerKind::Age.validate("30.5"), Err(prompts::AGE_ERROR));
        assert_eq!(AnswerKind::Age.validate(""), Err(prompts::AGE_ERROR));
    }

    #[test]
    fn weight_must_be_positive_and_finite() {
        assert!(AnswerKind::Weight.validate("70.5").is_ok());
        assert!(AnswerKind::Weight.validate("70").is_ok());
        assert_eq!(AnswerKind::Weight.validate("0"), Err(prompts::WEIGHT_ERROR));
        assert_eq!(AnswerKind::Weight.validate("-5"), Err(prompts::WEIGHT_ERROR));
        assert_eq!(AnswerKind::Weight.validate("heavy"), Err(prompts::WEIGHT_ERROR));
        assert_eq!(AnswerKind::Weight.validate("inf"), Err(prompts::WEIGHT_ERROR));
        assert_eq!(AnswerKind::Weight.validate("NaN"), Err(prompts::WEIGHT_ERROR));
    }

    #[test]
    fn freeform_rejects_blank() {
        assert!(AnswerKind::Freeform.validate("Alice").is_ok());
        assert_eq!(AnswerKind::Freeform.validate("   "), Err(prompts::FREEFORM_ERROR));
    }

    #[test]
    fn yes_no_is_case_insensitive() {
        assert_eq!(parse_yes_no("YES"), Some(YesNo::Yes));
        assert_eq!(parse_yes_no(" no "), Some(YesNo::No));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no("y"), None);
    }

    #[test]
    fn count_rejects_signs_and_fractions() {
        assert_eq!(parse_count("5"), Some(5));
        assert_eq!(parse_count("+5"), None);
        assert_eq!(parse_count("-5"), None);
        assert_eq!(parse_count("5.0"), None);
        assert_eq!(parse_count("99999999999"), None);
    }

    #[test]
    fn kind_serde_matches_display() {
        for kind in [AnswerKind::Freeform, AnswerKind::Age, AnswerKind::Weight] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
