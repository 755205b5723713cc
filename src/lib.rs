//! poseedit - Pose Keypoint Annotation Workspace
//!
//! The engine behind a keypoint correction and triage tool. It maps between
//! image and view coordinates, resolves pointer input to keypoint edits with
//! undo/redo, gates navigation on per-image scores, and keeps a project
//! directory of images, annotations and ignore buckets in order.
//!
//! A UI layer drives a [`Workspace`] and renders from its read-only
//! projections; see [`events`] for change notifications.

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod format;
pub mod model;
pub mod project;
pub mod undo;
pub mod workspace;
pub mod zoom_math;

pub use config::AppConfig;
pub use error::WorkspaceError;
pub use events::WorkspaceEvent;
pub use model::{PoseRecord, ScoreKind, Visibility};
pub use project::{FlatLayoutChoice, ProjectStore};
pub use workspace::{Workspace, WorkspaceOptions, WorkspaceState};
