//! Keypoint data model for the fixed 17-landmark body skeleton.

use crate::constants::REAL_DATA_THRESHOLD;

/// Number of keypoints in every pose record.
pub const KEYPOINT_COUNT: usize = 17;

/// Landmark names in their fixed, order-significant positions.
pub const KEYPOINT_NAMES: [&str; KEYPOINT_COUNT] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// Limb connections between keypoint indices, for skeleton rendering.
pub const SKELETON: [(usize, usize); 16] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 4),
    (5, 6),
    (5, 7),
    (7, 9),
    (6, 8),
    (8, 10),
    (5, 11),
    (6, 12),
    (11, 12),
    (11, 13),
    (13, 15),
    (12, 14),
    (14, 16),
];

/// Two-way visibility of a keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Occluded,
    Visible,
}

impl Visibility {
    /// Decode a stored visibility value. Only `1` means visible; `0` and the
    /// legacy "partially occluded" `2` both collapse to occluded.
    pub fn from_raw(value: i64) -> Self {
        if value == 1 {
            Visibility::Visible
        } else {
            Visibility::Occluded
        }
    }

    /// The value written to annotation files.
    pub fn as_raw(self) -> u8 {
        match self {
            Visibility::Occluded => 0,
            Visibility::Visible => 1,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Visibility::Occluded => Visibility::Visible,
            Visibility::Visible => Visibility::Occluded,
        }
    }
}

/// The editable part of a keypoint, used as an undo snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeypointState {
    pub x: f64,
    pub y: f64,
    pub visibility: Visibility,
}

impl KeypointState {
    pub fn new(x: f64, y: f64, visibility: Visibility) -> Self {
        Self { x, y, visibility }
    }
}

/// A named 2D landmark. The name is fixed by position and never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    name: &'static str,
    pub x: f64,
    pub y: f64,
    pub visibility: Visibility,
}

impl Keypoint {
    /// Create the default (origin, occluded) keypoint for a slot.
    pub(crate) fn at_slot(index: usize) -> Self {
        Self {
            name: KEYPOINT_NAMES[index],
            x: 0.0,
            y: 0.0,
            visibility: Visibility::Occluded,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> KeypointState {
        KeypointState::new(self.x, self.y, self.visibility)
    }

    pub fn apply(&mut self, state: KeypointState) {
        self.x = state.x;
        self.y = state.y;
        self.visibility = state.visibility;
    }

    /// Whether both coordinates are above the "never annotated" threshold.
    pub fn has_real_data(&self) -> bool {
        self.x > REAL_DATA_THRESHOLD && self.y > REAL_DATA_THRESHOLD
    }
}
