//! Annotation file format.
//!
//! One JSON file per image, holding a single-element array that wraps one
//! COCO-flavored pose object:
//!
//! ```json
//! [{
//!   "id": 0,
//!   "keypoints": [[x, y], ...],
//!   "scores": [0.9, ...],
//!   "visibility": [1, 0, ...],
//!   "novelty": -1,
//!   "environment_interaction": -1,
//!   "person_fit": -1,
//!   "skip_reason": ""
//! }]
//! ```
//!
//! ## Accepted on read
//!
//! - **CocoArray**: the array-wrapped form above (what we write)
//! - **CocoObject**: the same object without the array wrapper
//! - **LegacyDict**: `{"keypoints": [{"name", "x", "y", "visibility"}, ...]}`
//!   with 3-way visibility collapsed to occluded/visible

mod annotation;
mod error;

#[cfg(test)]
mod tests;

pub use annotation::{
    AnnotationFormat, detect_format, parse_annotation, parse_value, read_annotation_file,
    serialize_annotation, write_annotation_file,
};
pub(crate) use annotation::write_atomic;
pub use error::FormatError;
