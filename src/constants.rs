//! Global constants for the pose editing workspace

/// Subdirectory holding the original images in a structured project
pub const DIR_IMAGES: &str = "images";

/// Subdirectory holding one annotation JSON per image
pub const DIR_ANNOTATIONS: &str = "annotations";

/// Subdirectory holding inpainting reference images
pub const DIR_INPAINTING: &str = "inpainting";

/// Subdirectory holding triaged images, one folder per category
pub const DIR_IGNORE: &str = "ignore";

/// Project metadata file at the project root
pub const META_FILE: &str = "meta.json";

/// Extension of annotation files
pub const ANNOTATION_EXTENSION: &str = "json";

/// Image extensions scanned in the images directory
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// Extensions accepted for inpainting references (images plus webp)
pub const INPAINT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// Number of entries kept in `open_history`
pub const OPEN_HISTORY_LIMIT: usize = 50;

/// Category used when an image cannot be decoded
pub const CORRUPTED_CATEGORY: &str = "corrupted";

/// Reason recorded in the annotation of an undecodable image
pub const CORRUPTED_REASON: &str = "corrupted: image could not be decoded";

/// Category used together with a free-text reason
pub const OTHER_CATEGORY: &str = "other";

/// Preset ignore categories offered by the UI
pub const DEFAULT_IGNORE_CATEGORIES: &[&str] = &[
    "aesthetics",
    "hard_to_complete",
    "background_distortion",
    "bad_proportions",
    "blur",
];

/// Confidence above which a keypoint without explicit visibility is visible
pub const SCORE_VISIBLE_THRESHOLD: f64 = 0.3;

/// Coordinates at or below this value count as "never annotated"
pub const REAL_DATA_THRESHOLD: f64 = 1.0;

/// Manhattan radius (view pixels) for keypoint hit testing
pub const DEFAULT_HIT_RADIUS: f64 = 10.0;

/// Lowest allowed view scale
pub const MIN_SCALE: f64 = 0.1;

/// Highest allowed view scale
pub const MAX_SCALE: f64 = 20.0;

/// Zoom factor for one wheel step forward
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom factor for one wheel step backward
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Margin applied when fitting the whole image into the viewport
pub const FIT_MARGIN: f64 = 0.9;

/// Padding added around the pose box, as a fraction of its extent
pub const FOCUS_PADDING: f64 = 0.5;

/// Upper bound on the scale chosen by pose focusing
pub const FOCUS_MAX_SCALE: f64 = 5.0;

/// Pose boxes narrower or shorter than this fall back to fit-to-window
pub const FOCUS_MIN_EXTENT: f64 = 10.0;

/// Lowest valid score value
pub const SCORE_MIN: i32 = 0;

/// Highest valid score value
pub const SCORE_MAX: i32 = 5;

/// Sentinel for "not scored yet"
pub const UNSCORED: i32 = -1;
