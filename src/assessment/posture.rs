//! Posture checks over pose landmarks.
//!
//! Coordinates are normalized to the frame (0.0–1.0, y grows downward), as
//! produced by common pose estimators. Only the six joints the start-position
//! check needs are carried.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Vertical tolerance between the two ankles.
const ANKLE_LEVEL_TOLERANCE: f64 = 0.05;

/// Horizontal tolerance between shoulder and hip midpoints.
const TRUNK_ALIGNMENT_TOLERANCE: f64 = 0.05;

/// How long the start posture must be held before it counts.
pub const HOLD_DURATION: Duration = Duration::from_millis(1500);

pub const FEET_NOT_ALIGNED: &str = "Feet should be flat on the floor and aligned.";
pub const SHOULDERS_NOT_ALIGNED: &str = "Shoulders should be aligned with the hips.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyLandmarks {
    pub left_shoulder: Point,
    pub right_shoulder: Point,
    pub left_hip: Point,
    pub right_hip: Point,
    pub left_ankle: Point,
    pub right_ankle: Point,
}

/// Landmarks detected in one video frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Offset from the start of the recording or stream.
    #[serde(with = "millis")]
    pub timestamp: Duration,
    /// `None` when no person was detected.
    pub landmarks: Option<BodyLandmarks>,
}

/// List the problems with the subject's starting posture. Empty means correct.
pub fn posture_issues(body: &BodyLandmarks) -> Vec<&'static str> {
    let mut issues = Vec::new();

    if (body.left_ankle.y - body.right_ankle.y).abs() > ANKLE_LEVEL_TOLERANCE {
        issues.push(FEET_NOT_ALIGNED);
    }

    let shoulders = body.left_shoulder.midpoint(body.right_shoulder);
    let hips = body.left_hip.midpoint(body.right_hip);
    if (shoulders.x - hips.x).abs() > TRUNK_ALIGNMENT_TOLERANCE {
        issues.push(SHOULDERS_NOT_ALIGNED);
    }

    issues
}

/// Result of feeding one frame to a [`PostureGate`].
#[derive(Debug, Clone, PartialEq)]
pub enum PostureStatus {
    /// No person in frame; the hold timer is left as is.
    NoSubject,
    Incorrect(Vec<&'static str>),
    /// Correct, but not yet held for [`HOLD_DURATION`].
    Holding { held: Duration },
    Confirmed,
}

/// Confirms the start posture once it has been held without interruption.
///
/// Any frame with posture issues restarts the hold. Once confirmed the gate
/// stays confirmed.
#[derive(Debug, Default)]
pub struct PostureGate {
    hold_started: Option<Duration>,
    confirmed: bool,
}

impl PostureGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn observe(&mut self, frame: &PoseFrame) -> PostureStatus {
        if self.confirmed {
            return PostureStatus::Confirmed;
        }
        let Some(body) = frame.landmarks.as_ref() else {
            return PostureStatus::NoSubject;
        };

        let issues = posture_issues(body);
        if !issues.is_empty() {
            self.hold_started = None;
            return PostureStatus::Incorrect(issues);
        }

        let started = *self.hold_started.get_or_insert(frame.timestamp);
        let held = frame.timestamp.saturating_sub(started);
        if held >= HOLD_DURATION {
            self.confirmed = true;
            PostureStatus::Confirmed
        } else {
            PostureStatus::Holding { held }
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A subject standing square to the camera.
    pub(crate) fn upright() -> BodyLandmarks {
        BodyLandmarks {
            left_shoulder: Point { x: 0.45, y: 0.30 },
            right_shoulder: Point { x: 0.55, y: 0.30 },
            left_hip: Point { x: 0.46, y: 0.55 },
            right_hip: Point { x: 0.54, y: 0.55 },
            left_ankle: Point { x: 0.46, y: 0.95 },
            right_ankle: Point { x: 0.54, y: 0.95 },
        }
    }

    pub(crate) fn frame(ms: u64, landmarks: Option<BodyLandmarks>) -> PoseFrame {
        PoseFrame {
            timestamp: Duration::from_millis(ms),
            landmarks,
        }
    }

    #[test]
    fn upright_subject_has_no_issues() {
        assert!(posture_issues(&upright()).is_empty());
    }

    #[test]
    fn raised_foot_is_flagged() {
        let mut body = upright();
        body.left_ankle.y = 0.85;
        assert_eq!(posture_issues(&body), vec![FEET_NOT_ALIGNED]);
    }

    #[test]
    fn leaning_trunk_is_flagged() {
        let mut body = upright();
        body.left_shoulder.x += 0.15;
        body.right_shoulder.x += 0.15;
        body.left_ankle.y = 0.80;
        assert_eq!(posture_issues(&body), vec![FEET_NOT_ALIGNED, SHOULDERS_NOT_ALIGNED]);
    }

    #[test]
    fn gate_confirms_after_hold() {
        let mut gate = PostureGate::new();
        assert_eq!(gate.observe(&frame(0, Some(upright()))), PostureStatus::Holding { held: Duration::ZERO });
        assert_eq!(
            gate.observe(&frame(1000, Some(upright()))),
            PostureStatus::Holding { held: Duration::from_millis(1000) }
        );
        assert_eq!(gate.observe(&frame(1500, Some(upright()))), PostureStatus::Confirmed);
        assert!(gate.is_confirmed());

        let mut leaning = upright();
        leaning.left_shoulder.x = 0.9;
        assert_eq!(gate.observe(&frame(1600, Some(leaning))), PostureStatus::Confirmed);
    }

    #[test]
    fn bad_frame_restarts_hold() {
        let mut gate = PostureGate::new();
        gate.observe(&frame(0, Some(upright())));

        let mut lifted = upright();
        lifted.right_ankle.y = 0.7;
        assert_eq!(
            gate.observe(&frame(1000, Some(lifted))),
            PostureStatus::Incorrect(vec![FEET_NOT_ALIGNED])
        );

        assert!(matches!(gate.observe(&frame(1200, Some(upright()))), PostureStatus::Holding { .. }));
        assert!(matches!(gate.observe(&frame(2500, Some(upright()))), PostureStatus::Holding { .. }));
        assert_eq!(gate.observe(&frame(2700, Some(upright()))), PostureStatus::Confirmed);
    }

    #[test]
    fn missing_subject_does_not_reset_hold() {
        let mut gate = PostureGate::new();
        gate.observe(&frame(0, Some(upright())));
        assert_eq!(gate.observe(&frame(800, None)), PostureStatus::NoSubject);
        assert_eq!(gate.observe(&frame(1500, Some(upright()))), PostureStatus::Confirmed);
    }

    #[test]
    fn frame_timestamp_serializes_as_millis() {
        let json = serde_json::to_value(frame(1250, None)).unwrap();
        assert_eq!(json["timestamp"], 1250);
        let parsed: PoseFrame = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.timestamp, Duration::from_millis(1250));
    }
}
