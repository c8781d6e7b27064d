//! Functional Reach Test assessment — the hand-off after a recommending intake.
//!
//! The intake only decides *whether* a test is needed. Once the user picks a
//! channel (upload a recording or use a live camera), a [`PoseAssessor`] runs
//! the test and returns a free-text summary.

pub mod frames;
pub mod posture;

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

pub use frames::{FrameAssessor, FrameSource, FrameStream};
pub use posture::{BodyLandmarks, Point, PoseFrame, PostureGate, PostureStatus};

/// Summary returned once an assessment has run.
pub const COMPLETED_SUMMARY: &str = "FRT processing completed. Please review the results.";

/// How the user wants to take the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrtChannel {
    Upload,
    Live,
}

impl FrtChannel {
    /// Parse the user's choice ("upload" / "live", any case).
    pub fn parse(raw: &str) -> Option<Self> {
        let choice = raw.trim();
        if choice.eq_ignore_ascii_case("upload") {
            Some(Self::Upload)
        } else if choice.eq_ignore_ascii_case("live") {
            Some(Self::Live)
        } else {
            None
        }
    }
}

impl std::fmt::Display for FrtChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// Outcome of one assessment run.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub channel: FrtChannel,
    pub summary: String,
    /// `None` when the assessor defers posture review to a clinician.
    pub posture_confirmed: Option<bool>,
    pub frames_observed: usize,
    /// Distinct posture problems seen while waiting for the start position.
    pub issues: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Runs a Functional Reach Test.
#[async_trait]
pub trait PoseAssessor: Send + Sync {
    /// Assess a stored recording.
    async fn assess_recording(&self, path: &Path) -> Result<AssessmentReport, AssessmentError>;

    /// Assess from a live camera.
    async fn assess_live(&self) -> Result<AssessmentReport, AssessmentError>;
}

/// Accepts the recording for clinician review without analysing it.
///
/// Used when no pose estimator is wired in: recordings are checked to exist
/// and the user gets the standard completion summary.
#[derive(Debug, Default)]
pub struct DeferredReviewAssessor;

impl DeferredReviewAssessor {
    fn report(channel: FrtChannel) -> AssessmentReport {
        AssessmentReport {
            channel,
            summary: COMPLETED_SUMMARY.to_string(),
            posture_confirmed: None,
            frames_observed: 0,
            issues: Vec::new(),
            completed_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PoseAssessor for DeferredReviewAssessor {
    async fn assess_recording(&self, path: &Path) -> Result<AssessmentReport, AssessmentError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(AssessmentError::RecordingNotFound(path.to_path_buf()));
        }
        tracing::info!(path = %path.display(), "Recording queued for review");
        Ok(Self::report(FrtChannel::Upload))
    }

    async fn assess_live(&self) -> Result<AssessmentReport, AssessmentError> {
        tracing::info!("Live assessment deferred to review");
        Ok(Self::report(FrtChannel::Live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_choice_is_case_insensitive() {
        assert_eq!(FrtChannel::parse("Upload"), Some(FrtChannel::Upload));
        assert_eq!(FrtChannel::parse(" LIVE "), Some(FrtChannel::Live));
        assert_eq!(FrtChannel::parse("camera"), None);
    }

    #[test]
    fn channel_display_matches_serde() {
        for channel in [FrtChannel::Upload, FrtChannel::Live] {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{channel}\""));
        }
    }

    #[tokio::test]
    async fn deferred_review_requires_existing_recording() {
        let dir = tempfile::TempDir::new().unwrap();
        let assessor = DeferredReviewAssessor;

        let missing = dir.path().join("missing.mp4");
        let err = assessor.assess_recording(&missing).await.unwrap_err();
        assert!(matches!(err, AssessmentError::RecordingNotFound(p) if p == missing));

        let present = dir.path().join("reach.mp4");
        std::fs::write(&present, b"video").unwrap();
        let report = assessor.assess_recording(&present).await.unwrap();
        assert_eq!(report.summary, COMPLETED_SUMMARY);
        assert_eq!(report.channel, FrtChannel::Upload);
        assert!(report.posture_confirmed.is_none());
    }

    #[tokio::test]
    async fn deferred_live_returns_summary() {
        let report = DeferredReviewAssessor.assess_live().await.unwrap();
        assert_eq!(report.channel, FrtChannel::Live);
        assert_eq!(report.summary, COMPLETED_SUMMARY);
    }
}
