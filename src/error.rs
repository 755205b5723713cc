//! Errors surfaced by workspace operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{InvalidScore, ScoreKind};
use crate::project::ProjectError;

/// Errors reported to the UI layer.
///
/// Every variant leaves the workspace state as it was before the call,
/// except [`WorkspaceError::TriageMoveFailed`], where the recorded reason
/// has already been written.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Forward navigation refused until the listed scores are set
    #[error("Cannot continue: missing {}", missing_list(.missing))]
    ValidationBlocked { missing: Vec<ScoreKind> },

    /// The operation needs a current image
    #[error("No image loaded")]
    NoImageLoaded,

    /// Already at the last image
    #[error("Already at the last image")]
    AtLastImage,

    /// Already at the first image
    #[error("Already at the first image")]
    AtFirstImage,

    /// No active, incompletely scored image after the current one
    #[error("No remaining images need work")]
    NothingLeft,

    /// Keypoint coordinates must be finite numbers
    #[error("Keypoint coordinates ({x}, {y}) are not finite")]
    NonFiniteCoordinate { x: f64, y: f64 },

    /// Keypoint index outside the fixed schema
    #[error("Keypoint index {0} is out of range")]
    KeypointOutOfRange(usize),

    /// Score value outside `-1..=5`
    #[error(transparent)]
    InvalidScore(#[from] InvalidScore),

    /// Category is empty or not a single path component
    #[error("Invalid ignore category {0:?}")]
    InvalidCategory(String),

    /// Writing the annotation before a triage failed; nothing was moved
    #[error("Could not record triage for {image:?}: {source}")]
    TriageWriteFailed {
        image: PathBuf,
        #[source]
        source: ProjectError,
    },

    /// The reason was recorded but the image could not be moved
    #[error("Recorded triage for {image:?} but could not move it: {source}")]
    TriageMoveFailed {
        image: PathBuf,
        #[source]
        source: ProjectError,
    },

    /// Project filesystem or metadata error
    #[error(transparent)]
    Project(#[from] ProjectError),
}

fn missing_list(missing: &[ScoreKind]) -> String {
    missing
        .iter()
        .map(ScoreKind::label)
        .collect::<Vec<_>>()
        .join(", ")
}
