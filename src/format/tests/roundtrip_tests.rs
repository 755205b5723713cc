//! Write/read round trips for annotation files.

use crate::format::{parse_annotation, read_annotation_file, serialize_annotation, write_annotation_file};
use crate::model::{KEYPOINT_COUNT, KeypointState, PoseRecord, ScoreKind, Visibility};

fn edited_pose() -> PoseRecord {
    let mut pose = PoseRecord::new();
    pose.raw_id = 7;
    pose.raw_scores = vec![0.5; KEYPOINT_COUNT];
    for i in 0..KEYPOINT_COUNT {
        let visibility = if i % 2 == 0 {
            Visibility::Visible
        } else {
            Visibility::Occluded
        };
        pose.set_keypoint_state(
            i,
            KeypointState::new(10.25 * i as f64, 0.1 + 3.7 * i as f64, visibility),
        );
    }
    pose.set_score(ScoreKind::Novelty, 3).unwrap();
    pose.set_score(ScoreKind::EnvironmentInteraction, 0).unwrap();
    pose.set_score(ScoreKind::PersonFit, 5).unwrap();
    pose
}

#[test]
fn test_roundtrip_preserves_record() {
    let pose = edited_pose();
    let text = serialize_annotation(&pose).unwrap();
    let loaded = parse_annotation(&text).unwrap();
    assert_eq!(loaded, pose);
}

#[test]
fn test_serialized_shape() {
    let text = serialize_annotation(&PoseRecord::new()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry["keypoints"].as_array().unwrap().len(), KEYPOINT_COUNT);
    assert_eq!(entry["scores"].as_array().unwrap().len(), KEYPOINT_COUNT);
    assert_eq!(entry["visibility"].as_array().unwrap().len(), KEYPOINT_COUNT);
    assert_eq!(entry["novelty"], -1);
    assert_eq!(entry["environment_interaction"], -1);
    assert_eq!(entry["person_fit"], -1);
    assert_eq!(entry["skip_reason"], "");
    // Unset legacy score is not written
    assert!(entry.get("score").is_none());
}

#[test]
fn test_legacy_score_carried_through() {
    let mut pose = PoseRecord::new();
    pose.legacy_score = 4;
    let loaded = parse_annotation(&serialize_annotation(&pose).unwrap()).unwrap();
    assert_eq!(loaded.legacy_score(), 4);
}

#[test]
fn test_file_roundtrip_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations").join("nested").join("img_001.json");

    let mut pose = edited_pose();
    pose.skip_reason = "blur".to_string();
    write_annotation_file(&path, &pose).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(read_annotation_file(&path).unwrap(), pose);
}
