//! Fixed prompt texts used by the dialog engine.

/// Opening line; the first personal-details question follows it.
pub const WELCOME: &str = "Welcome! Let's start with some questions.";

pub const AGE_ERROR: &str = "Invalid age. Please enter a valid age (e.g., 18):";
pub const WEIGHT_ERROR: &str = "Invalid weight. Please enter a valid weight in kg (e.g., 70.5):";
pub const FREEFORM_ERROR: &str = "Please enter a response to continue:";

pub const YES_NO_ERROR: &str = "Invalid input. Please answer with 'yes' or 'no':";
pub const DAY_COUNT: &str = "How many days have you been experiencing this symptom?";
pub const DAY_COUNT_ERROR: &str = "Invalid input. Please enter the number of days (e.g., 3):";

pub const FRT_RECOMMENDED: &str = "Based on your responses, a Functional Reach Test (FRT) is recommended. \
Do you prefer to upload a video file or use a live camera for the FRT?";
pub const FRT_NOT_NEEDED: &str = "No Functional Reach Test (FRT) is needed based on your responses.";

/// Choices offered with [`FRT_RECOMMENDED`].
pub const FRT_OPTIONS: [&str; 2] = ["upload", "live"];

/// Build the welcome prompt around the first personal-details question.
pub fn welcome(first_question: &str) -> String {
    format!("{WELCOME} {first_question}")
}
