//! Reading and writing per-image pose annotations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{SCORE_VISIBLE_THRESHOLD, UNSCORED};
use crate::format::error::FormatError;
use crate::model::{KEYPOINT_COUNT, KEYPOINT_NAMES, KeypointState, PoseRecord, ScoreKind, Visibility, is_valid_score};

/// The layouts an annotation document can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationFormat {
    /// `[ {coco pose} ]`
    CocoArray,
    /// `{coco pose}`
    CocoObject,
    /// `{"keypoints": [{"name", "x", "y", "visibility"}, ...]}`, bare or wrapped
    LegacyDict,
}

impl AnnotationFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationFormat::CocoArray => "COCO (array)",
            AnnotationFormat::CocoObject => "COCO (object)",
            AnnotationFormat::LegacyDict => "legacy keypoint dict",
        }
    }
}

// ============================================================================
// Serde entries
// ============================================================================

/// Score and triage fields shared by every layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoringIn {
    novelty: Option<f64>,
    environment_interaction: Option<f64>,
    /// Older name of `environment_interaction`
    environment_fit: Option<f64>,
    person_fit: Option<f64>,
    skip_reason: Option<String>,
    /// Deprecated single score
    score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CocoPoseIn {
    id: Option<i64>,
    keypoints: Vec<Vec<f64>>,
    scores: Vec<f64>,
    visibility: Vec<i64>,
    #[serde(flatten)]
    scoring: ScoringIn,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyKeypointIn {
    name: Option<String>,
    x: f64,
    y: f64,
    visibility: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyPoseIn {
    keypoints: Vec<LegacyKeypointIn>,
    #[serde(flatten)]
    scoring: ScoringIn,
}

#[derive(Debug, Serialize)]
struct CocoPoseOut<'a> {
    id: i64,
    keypoints: Vec<[f64; 2]>,
    scores: Vec<f64>,
    visibility: Vec<u8>,
    novelty: i32,
    environment_interaction: i32,
    person_fit: i32,
    skip_reason: &'a str,
    #[serde(skip_serializing_if = "is_unscored")]
    score: i32,
}

fn is_unscored(value: &i32) -> bool {
    *value == UNSCORED
}

// ============================================================================
// Detection
// ============================================================================

/// Classify a parsed JSON document before dispatching to a parser.
pub fn detect_format(value: &Value) -> Result<AnnotationFormat, FormatError> {
    match value {
        Value::Array(items) => match items.first() {
            None => Ok(AnnotationFormat::CocoArray),
            Some(entry @ Value::Object(_)) => Ok(if has_dict_keypoints(entry) {
                AnnotationFormat::LegacyDict
            } else {
                AnnotationFormat::CocoArray
            }),
            Some(_) => Err(FormatError::invalid_format(
                "annotation array must contain a pose object",
            )),
        },
        Value::Object(_) => Ok(if has_dict_keypoints(value) {
            AnnotationFormat::LegacyDict
        } else {
            AnnotationFormat::CocoObject
        }),
        _ => Err(FormatError::invalid_format(
            "annotation must be a JSON array or object",
        )),
    }
}

fn has_dict_keypoints(entry: &Value) -> bool {
    entry
        .get("keypoints")
        .and_then(Value::as_array)
        .and_then(|kps| kps.first())
        .is_some_and(Value::is_object)
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse annotation text in any accepted layout.
pub fn parse_annotation(text: &str) -> Result<PoseRecord, FormatError> {
    let value: Value = serde_json::from_str(text)?;
    parse_value(value)
}

/// Parse an already-decoded JSON document in any accepted layout.
pub fn parse_value(value: Value) -> Result<PoseRecord, FormatError> {
    let format = detect_format(&value)?;
    log::trace!("Annotation layout detected: {}", format.name());

    let entry = match value {
        Value::Array(items) => match items.into_iter().next() {
            Some(entry) => entry,
            None => return Ok(PoseRecord::new()),
        },
        other => other,
    };

    match format {
        AnnotationFormat::CocoArray | AnnotationFormat::CocoObject => {
            Ok(from_coco(serde_json::from_value(entry)?))
        }
        AnnotationFormat::LegacyDict => Ok(from_legacy(serde_json::from_value(entry)?)),
    }
}

fn from_coco(entry: CocoPoseIn) -> PoseRecord {
    let mut pose = PoseRecord::new();
    pose.raw_id = entry.id.unwrap_or(0);

    for index in 0..KEYPOINT_COUNT {
        let coords = entry.keypoints.get(index);
        let x = coords.and_then(|c| c.first()).copied().unwrap_or(0.0);
        let y = coords.and_then(|c| c.get(1)).copied().unwrap_or(0.0);

        let visibility = match entry.visibility.get(index) {
            Some(&raw) => Visibility::from_raw(raw),
            None => match entry.scores.get(index) {
                Some(&score) if score > SCORE_VISIBLE_THRESHOLD => Visibility::Visible,
                _ => Visibility::Occluded,
            },
        };

        pose.set_keypoint_state(index, KeypointState::new(x, y, visibility));
    }

    if entry.keypoints.len() > KEYPOINT_COUNT {
        log::warn!(
            "Annotation has {} keypoints, keeping the first {}",
            entry.keypoints.len(),
            KEYPOINT_COUNT
        );
    }

    pose.raw_scores = entry.scores;
    apply_scoring(&mut pose, entry.scoring);
    pose
}

fn from_legacy(entry: LegacyPoseIn) -> PoseRecord {
    let mut pose = PoseRecord::new();

    for (index, kp) in entry.keypoints.iter().take(KEYPOINT_COUNT).enumerate() {
        if let Some(name) = kp.name.as_deref() {
            if name != KEYPOINT_NAMES[index] {
                log::warn!(
                    "Legacy keypoint {} is named '{}', expected '{}'",
                    index,
                    name,
                    KEYPOINT_NAMES[index]
                );
            }
        }
        pose.set_keypoint_state(
            index,
            KeypointState::new(kp.x, kp.y, Visibility::from_raw(kp.visibility)),
        );
    }

    apply_scoring(&mut pose, entry.scoring);
    pose
}

fn apply_scoring(pose: &mut PoseRecord, scoring: ScoringIn) {
    let environment = scoring.environment_interaction.or(scoring.environment_fit);
    let fields = [
        (ScoreKind::Novelty, scoring.novelty),
        (ScoreKind::EnvironmentInteraction, environment),
        (ScoreKind::PersonFit, scoring.person_fit),
    ];

    for (kind, raw) in fields {
        let value = raw.map_or(UNSCORED, |v| score_or_unscored(kind.json_key(), v));
        // score_or_unscored only yields legal values
        let _ = pose.set_score(kind, value);
    }

    pose.legacy_score = scoring.score.map_or(UNSCORED, |v| score_or_unscored("score", v));
    pose.skip_reason = scoring.skip_reason.unwrap_or_default();
}

fn score_or_unscored(key: &str, raw: f64) -> i32 {
    let value = raw as i32;
    if raw.fract() == 0.0 && is_valid_score(value) {
        value
    } else {
        log::warn!("Ignoring out-of-range {} value {}", key, raw);
        UNSCORED
    }
}

// ============================================================================
// Serialization
// ============================================================================

fn to_coco(pose: &PoseRecord) -> CocoPoseOut<'_> {
    let keypoints = pose.keypoints();
    CocoPoseOut {
        id: pose.raw_id(),
        keypoints: keypoints.iter().map(|kp| [kp.x, kp.y]).collect(),
        scores: if pose.raw_scores().is_empty() {
            vec![0.0; KEYPOINT_COUNT]
        } else {
            pose.raw_scores().to_vec()
        },
        visibility: keypoints.iter().map(|kp| kp.visibility.as_raw()).collect(),
        novelty: pose.score(ScoreKind::Novelty),
        environment_interaction: pose.score(ScoreKind::EnvironmentInteraction),
        person_fit: pose.score(ScoreKind::PersonFit),
        skip_reason: &pose.skip_reason,
        score: pose.legacy_score(),
    }
}

/// Serialize a record as a pretty-printed, array-wrapped COCO document.
pub fn serialize_annotation(pose: &PoseRecord) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&[to_coco(pose)])?)
}

// ============================================================================
// Files
// ============================================================================

/// Read and parse an annotation file.
pub fn read_annotation_file(path: &Path) -> Result<PoseRecord, FormatError> {
    let text = std::fs::read_to_string(path)?;
    parse_annotation(&text)
}

/// Write an annotation file, creating parent directories as needed.
pub fn write_annotation_file(path: &Path, pose: &PoseRecord) -> Result<(), FormatError> {
    let json = serialize_annotation(pose)?;
    write_atomic(path, json.as_bytes()).map_err(|source| FormatError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote annotation {:?}", path);
    Ok(())
}

/// Write `contents` to a sibling temp file and rename it into place, so an
/// interrupted write never leaves a truncated file behind.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, contents)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
