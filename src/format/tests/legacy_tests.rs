//! Tests for the pre-COCO keypoint dict layout.

use serde_json::json;

use crate::format::parse_value;
use crate::model::{KEYPOINT_NAMES, Visibility};

#[test]
fn test_legacy_layout_collapses_visibility() {
    let keypoints: Vec<serde_json::Value> = KEYPOINT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "x": 10.0 * i as f64,
                "y": 5.0 * i as f64,
                "visibility": i % 3
            })
        })
        .collect();

    let pose = parse_value(json!({"keypoints": keypoints, "novelty": 1})).unwrap();

    for (i, kp) in pose.keypoints().iter().enumerate() {
        assert_eq!(kp.name(), KEYPOINT_NAMES[i]);
        assert_eq!(kp.x, 10.0 * i as f64);
        assert_eq!(kp.y, 5.0 * i as f64);
        let expected = if i % 3 == 1 {
            Visibility::Visible
        } else {
            Visibility::Occluded
        };
        assert_eq!(kp.visibility, expected, "keypoint {i}");
    }
    assert_eq!(pose.score(crate::model::ScoreKind::Novelty), 1);
}

#[test]
fn test_legacy_partial_list() {
    let pose = parse_value(json!({
        "keypoints": [
            {"name": "nose", "x": 12.5, "y": 8.2, "visibility": 1},
            {"name": "left_eye", "x": 0.0, "y": 0.0, "visibility": 0}
        ]
    }))
    .unwrap();

    assert_eq!(pose.keypoints()[0].name(), "nose");
    assert_eq!(pose.keypoints()[0].x, 12.5);
    assert_eq!(pose.keypoints()[0].visibility, Visibility::Visible);
    assert_eq!(pose.keypoints()[1].visibility, Visibility::Occluded);
    assert_eq!(pose.keypoints()[16].name(), "right_ankle");
}

#[test]
fn test_legacy_layout_wrapped_in_array() {
    let pose = parse_value(json!([{
        "keypoints": [{"name": "nose", "x": 3.0, "y": 4.0, "visibility": 2}],
        "skip_reason": "blur"
    }]))
    .unwrap();

    assert_eq!(pose.keypoints()[0].x, 3.0);
    assert_eq!(pose.keypoints()[0].visibility, Visibility::Occluded);
    assert_eq!(pose.skip_reason, "blur");
}

#[test]
fn test_legacy_names_are_positional() {
    let pose = parse_value(json!({
        "keypoints": [{"name": "right_ankle", "x": 7.0, "y": 9.0, "visibility": 1}]
    }))
    .unwrap();

    assert_eq!(pose.keypoints()[0].name(), "nose");
    assert_eq!(pose.keypoints()[0].x, 7.0);
}
