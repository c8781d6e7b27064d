//! Frame-driven assessor: runs landmark frames through the posture gate.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::Utc;
use futures::{Stream, StreamExt};
use tracing::{debug, info};

use super::posture::{PoseFrame, PostureGate, PostureStatus};
use super::{AssessmentReport, COMPLETED_SUMMARY, FrtChannel, PoseAssessor};
use crate::error::AssessmentError;

/// Stream of landmark frames, in timestamp order.
pub type FrameStream = Pin<Box<dyn Stream<Item = PoseFrame> + Send>>;

/// Produces landmark frames from a recording or a camera.
///
/// Implementations wrap a pose estimator; decoding and landmark detection
/// happen behind this trait.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn open_recording(&self, path: &Path) -> Result<FrameStream, AssessmentError>;

    async fn open_live(&self) -> Result<FrameStream, AssessmentError>;
}

/// A [`PoseAssessor`] that checks the start posture over a frame stream.
pub struct FrameAssessor<S> {
    source: S,
}

impl<S: FrameSource> FrameAssessor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    async fn run(&self, channel: FrtChannel, mut frames: FrameStream) -> AssessmentReport {
        let mut gate = PostureGate::new();
        let mut frames_observed = 0;
        let mut issues: Vec<String> = Vec::new();

        while let Some(frame) = frames.next().await {
            frames_observed += 1;
            let already_confirmed = gate.is_confirmed();
            match gate.observe(&frame) {
                PostureStatus::Incorrect(found) => {
                    for issue in found {
                        if !issues.iter().any(|i| i == issue) {
                            issues.push(issue.to_string());
                        }
                    }
                }
                PostureStatus::Confirmed if !already_confirmed => {
                    debug!(timestamp_ms = frame.timestamp.as_millis() as u64, "Start posture held");
                }
                _ => {}
            }
        }

        let posture_confirmed = gate.is_confirmed();
        info!(%channel, frames_observed, posture_confirmed, "Frame assessment finished");

        let summary = if posture_confirmed {
            COMPLETED_SUMMARY.to_string()
        } else if issues.is_empty() {
            "FRT could not start: the starting posture was not held long enough.".to_string()
        } else {
            format!(
                "FRT could not start: the starting posture was not held. {}",
                issues.join(" ")
            )
        };

        AssessmentReport {
            channel,
            summary,
            posture_confirmed: Some(posture_confirmed),
            frames_observed,
            issues,
            completed_at: Utc::now(),
        }
    }
}

#[async_trait]
impl<S: FrameSource> PoseAssessor for FrameAssessor<S> {
    async fn assess_recording(&self, path: &Path) -> Result<AssessmentReport, AssessmentError> {
        let frames = self.source.open_recording(path).await?;
        Ok(self.run(FrtChannel::Upload, frames).await)
    }

    async fn assess_live(&self) -> Result<AssessmentReport, AssessmentError> {
        let frames = self.source.open_live().await?;
        Ok(self.run(FrtChannel::Live, frames).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::posture::tests::{frame, upright};
    use crate::assessment::posture::{FEET_NOT_ALIGNED, SHOULDERS_NOT_ALIGNED};

    /// Replays fixed frames; live capture is unavailable.
    struct Replay(Vec<PoseFrame>);

    #[async_trait]
    impl FrameSource for Replay {
        async fn open_recording(&self, _path: &Path) -> Result<FrameStream, AssessmentError> {
            Ok(Box::pin(futures::stream::iter(self.0.clone())))
        }

        async fn open_live(&self) -> Result<FrameStream, AssessmentError> {
            Err(AssessmentError::Unavailable("no camera".to_string()))
        }
    }

    #[tokio::test]
    async fn held_posture_completes() {
        let frames = (0..=20).map(|i| frame(i * 100, Some(upright()))).collect();
        let assessor = FrameAssessor::new(Replay(frames));
        let report = assessor.assess_recording(Path::new("reach.mp4")).await.unwrap();
        assert_eq!(report.posture_confirmed, Some(true));
        assert_eq!(report.frames_observed, 21);
        assert_eq!(report.summary, COMPLETED_SUMMARY);
        assert!(report.issues.is_empty());
    }

    #[tokio::test]
    async fn unheld_posture_reports_distinct_issues() {
        let mut lifted = upright();
        lifted.left_ankle.y = 0.7;
        let mut leaning = lifted;
        leaning.left_shoulder.x = 0.8;

        let frames = vec![
            frame(0, Some(lifted)),
            frame(100, Some(leaning)),
            frame(200, Some(lifted)),
            frame(300, None),
        ];
        let report = FrameAssessor::new(Replay(frames))
            .assess_recording(Path::new("reach.mp4"))
            .await
            .unwrap();
        assert_eq!(report.posture_confirmed, Some(false));
        assert_eq!(report.issues, vec![FEET_NOT_ALIGNED, SHOULDERS_NOT_ALIGNED]);
        assert!(report.summary.contains(FEET_NOT_ALIGNED));
    }

    #[tokio::test]
    async fn source_errors_propagate() {
        let err = FrameAssessor::new(Replay(Vec::new())).assess_live().await.unwrap_err();
        assert!(matches!(err, AssessmentError::Unavailable(_)));
    }
}
