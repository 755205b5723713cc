//! Pose record: the 17 keypoints of one image plus its scoring and triage state.

use std::fmt;

use crate::constants::{SCORE_MAX, SCORE_MIN, UNSCORED};
use crate::model::keypoint::{KEYPOINT_COUNT, Keypoint, KeypointState};
use crate::zoom_math::BoundingBox;

/// The three per-image scores that gate forward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreKind {
    Novelty,
    EnvironmentInteraction,
    PersonFit,
}

impl ScoreKind {
    /// All score kinds in display order.
    pub fn all() -> &'static [ScoreKind] {
        &[
            ScoreKind::Novelty,
            ScoreKind::EnvironmentInteraction,
            ScoreKind::PersonFit,
        ]
    }

    /// Key used in annotation files.
    pub fn json_key(&self) -> &'static str {
        match self {
            ScoreKind::Novelty => "novelty",
            ScoreKind::EnvironmentInteraction => "environment_interaction",
            ScoreKind::PersonFit => "person_fit",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreKind::Novelty => "pose novelty",
            ScoreKind::EnvironmentInteraction => "environment interaction",
            ScoreKind::PersonFit => "person fit",
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A score outside `-1..=5` was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} score {value} is outside 0..=5 (use -1 to clear)")]
pub struct InvalidScore {
    pub kind: ScoreKind,
    pub value: i32,
}

/// Check whether a raw score value is legal (`-1` or `0..=5`).
pub fn is_valid_score(value: i32) -> bool {
    value == UNSCORED || (SCORE_MIN..=SCORE_MAX).contains(&value)
}

/// Full annotation for one image.
///
/// The keypoint sequence is a fixed-size array, so its length and order can
/// never drift from the 17-landmark schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    keypoints: [Keypoint; KEYPOINT_COUNT],
    /// Detector instance id (provenance, never edited)
    pub(crate) raw_id: i64,
    /// Detector confidences (provenance, never edited)
    pub(crate) raw_scores: Vec<f64>,
    novelty: i32,
    environment_interaction: i32,
    person_fit: i32,
    /// Empty means active; anything else marks the image as triaged
    pub skip_reason: String,
    /// Deprecated single score, carried through unchanged
    pub(crate) legacy_score: i32,
}

impl PoseRecord {
    /// A fresh record: all keypoints at the origin, occluded, unscored.
    pub fn new() -> Self {
        Self {
            keypoints: std::array::from_fn(Keypoint::at_slot),
            raw_id: 0,
            raw_scores: Vec::new(),
            novelty: UNSCORED,
            environment_interaction: UNSCORED,
            person_fit: UNSCORED,
            skip_reason: String::new(),
            legacy_score: UNSCORED,
        }
    }

    pub fn keypoints(&self) -> &[Keypoint; KEYPOINT_COUNT] {
        &self.keypoints
    }

    pub fn keypoint(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    /// Overwrite the editable state of one keypoint, returning the previous state.
    pub fn set_keypoint_state(&mut self, index: usize, state: KeypointState) -> Option<KeypointState> {
        let kp = self.keypoints.get_mut(index)?;
        let previous = kp.state();
        kp.apply(state);
        Some(previous)
    }

    pub fn raw_id(&self) -> i64 {
        self.raw_id
    }

    pub fn raw_scores(&self) -> &[f64] {
        &self.raw_scores
    }

    pub fn legacy_score(&self) -> i32 {
        self.legacy_score
    }

    pub fn score(&self, kind: ScoreKind) -> i32 {
        match kind {
            ScoreKind::Novelty => self.novelty,
            ScoreKind::EnvironmentInteraction => self.environment_interaction,
            ScoreKind::PersonFit => self.person_fit,
        }
    }

    /// Set a score; `-1` clears it.
    pub fn set_score(&mut self, kind: ScoreKind, value: i32) -> Result<(), InvalidScore> {
        if !is_valid_score(value) {
            return Err(InvalidScore { kind, value });
        }
        *self.score_mut(kind) = value;
        Ok(())
    }

    fn score_mut(&mut self, kind: ScoreKind) -> &mut i32 {
        match kind {
            ScoreKind::Novelty => &mut self.novelty,
            ScoreKind::EnvironmentInteraction => &mut self.environment_interaction,
            ScoreKind::PersonFit => &mut self.person_fit,
        }
    }

    /// Scores that are still unset, in display order.
    pub fn missing_scores(&self) -> Vec<ScoreKind> {
        ScoreKind::all()
            .iter()
            .copied()
            .filter(|&kind| self.score(kind) < 0)
            .collect()
    }

    pub fn is_fully_scored(&self) -> bool {
        self.missing_scores().is_empty()
    }

    pub fn is_triaged(&self) -> bool {
        !self.skip_reason.is_empty()
    }

    /// Active and not fully scored yet.
    pub fn needs_work(&self) -> bool {
        !self.is_triaged() && !self.is_fully_scored()
    }

    /// Whether any keypoint carries real (non-placeholder) coordinates.
    pub fn has_real_data(&self) -> bool {
        self.keypoints.iter().any(Keypoint::has_real_data)
    }

    /// Bounding box of the keypoints with real coordinates.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut real = self.keypoints.iter().filter(|kp| kp.has_real_data());
        let first = real.next()?;
        let init = BoundingBox::new(first.x, first.y, first.x, first.y);

        Some(real.fold(init, |b, kp| {
            BoundingBox::new(
                b.min_x.min(kp.x),
                b.min_y.min(kp.y),
                b.max_x.max(kp.x),
                b.max_y.max(kp.y),
            )
        }))
    }
}

impl Default for PoseRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::keypoint::{KEYPOINT_NAMES, Visibility};

    #[test]
    fn test_new_record_defaults() {
        let pose = PoseRecord::new();
        assert_eq!(pose.keypoints().len(), KEYPOINT_COUNT);
        for (kp, name) in pose.keypoints().iter().zip(KEYPOINT_NAMES) {
            assert_eq!(kp.name(), name);
            assert_eq!(kp.state(), KeypointState::default());
        }
        assert_eq!(pose.missing_scores(), ScoreKind::all());
        assert!(pose.needs_work());
        assert!(!pose.has_real_data());
        assert_eq!(pose.bounding_box(), None);
    }

    #[test]
    fn test_set_score_range() {
        let mut pose = PoseRecord::new();
        assert!(pose.set_score(ScoreKind::Novelty, 5).is_ok());
        assert!(pose.set_score(ScoreKind::PersonFit, -1).is_ok());

        let err = pose.set_score(ScoreKind::PersonFit, 6).unwrap_err();
        assert_eq!(err.kind, ScoreKind::PersonFit);
        assert_eq!(pose.score(ScoreKind::PersonFit), -1);
        assert!(pose.set_score(ScoreKind::Novelty, -2).is_err());
        assert_eq!(pose.score(ScoreKind::Novelty), 5);
    }

    #[test]
    fn test_missing_scores_and_needs_work() {
        let mut pose = PoseRecord::new();
        pose.set_score(ScoreKind::Novelty, 0).unwrap();
        pose.set_score(ScoreKind::PersonFit, 2).unwrap();
        assert_eq!(pose.missing_scores(), vec![ScoreKind::EnvironmentInteraction]);
        assert!(pose.needs_work());

        pose.skip_reason = "blur".to_string();
        assert!(!pose.needs_work());
        assert!(pose.is_triaged());
    }

    #[test]
    fn test_bounding_box_ignores_placeholders() {
        let mut pose = PoseRecord::new();
        pose.set_keypoint_state(0, KeypointState::new(50.0, 80.0, Visibility::Visible));
        pose.set_keypoint_state(5, KeypointState::new(20.0, 140.0, Visibility::Occluded));
        pose.set_keypoint_state(9, KeypointState::new(0.5, 300.0, Visibility::Visible));

        let bbox = pose.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox::new(20.0, 80.0, 50.0, 140.0));
        assert!(pose.has_real_data());
    }

    #[test]
    fn test_set_keypoint_state_out_of_range() {
        let mut pose = PoseRecord::new();
        assert!(pose.set_keypoint_state(KEYPOINT_COUNT, KeypointState::default()).is_none());
    }
}
