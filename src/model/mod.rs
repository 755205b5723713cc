//! Data models for pose annotation.

mod keypoint;
mod pose;

pub use keypoint::{KEYPOINT_COUNT, KEYPOINT_NAMES, Keypoint, KeypointState, SKELETON, Visibility};
pub use pose::{InvalidScore, PoseRecord, ScoreKind, is_valid_score};
