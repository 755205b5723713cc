//! Project directory management.
//!
//! A project is a root directory laid out as:
//!
//! ```text
//! root/
//!   images/        original images (*.jpg, *.jpeg, *.png, *.bmp, *.tiff)
//!   annotations/   <stem>.json, one per image
//!   inpainting/    <stem>.<ext> reference images (webp allowed)
//!   ignore/<category>/<image file>
//!   meta.json
//! ```
//!
//! A legacy flat root (images and JSON side by side, no `images/`) can either
//! be migrated into this layout or opened in place, in which case the image,
//! annotation and inpainting lookups all resolve against the root.
//!
//! # meta.json
//!
//! ```json
//! {
//!   "last_opened": "2026-01-01T09:30:00",
//!   "last_opened_by": "alice",
//!   "open_history": [{ "time": "...", "user": "alice" }],
//!   "total_images": 120,
//!   "last_image": "img_0042.jpg"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    ANNOTATION_EXTENSION, DIR_ANNOTATIONS, DIR_IGNORE, DIR_IMAGES, DIR_INPAINTING,
    IMAGE_EXTENSIONS, INPAINT_EXTENSIONS, META_FILE, OPEN_HISTORY_LIMIT,
};
use crate::format::{FormatError, read_annotation_file, write_annotation_file, write_atomic};
use crate::model::PoseRecord;

// ============================================================================
// Layout
// ============================================================================

/// What a chosen root directory looks like before opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// `root/images/` exists
    Structured,
    /// No `images/`, but the root itself contains image files
    FlatWithImages,
    /// Neither
    Empty,
}

/// How to open a flat root; the UI asks the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatLayoutChoice {
    /// Move images and annotations into the structured subfolders
    Migrate,
    /// Open in place with every directory resolving to the root
    Legacy,
}

/// Directories resolved once when the project is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub origin_dir: PathBuf,
    pub annotation_dir: PathBuf,
    pub inpaint_dir: PathBuf,
}

impl ProjectPaths {
    fn structured(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            origin_dir: root.join(DIR_IMAGES),
            annotation_dir: root.join(DIR_ANNOTATIONS),
            inpaint_dir: root.join(DIR_INPAINTING),
        }
    }

    fn legacy(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            origin_dir: root.to_path_buf(),
            annotation_dir: root.to_path_buf(),
            inpaint_dir: root.join(DIR_INPAINTING),
        }
    }

    /// Whether images and annotations share one directory.
    pub fn is_legacy(&self) -> bool {
        self.annotation_dir == self.origin_dir
    }
}

/// Result of opening a root directory.
#[derive(Debug)]
pub enum OpenOutcome {
    Opened(ProjectStore),
    /// The root had no images; `images/` was created and is waiting for content
    AwaitingContent { images_dir: PathBuf },
}

// ============================================================================
// Metadata
// ============================================================================

/// One entry of the advisory open log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRecord {
    pub time: String,
    pub user: String,
}

/// Contents of `meta.json`. Unknown keys are kept and written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_by: Option<String>,
    pub open_history: Vec<OpenRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_images: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_image: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProjectMeta {
    /// Append an open event, keeping only the newest entries.
    pub fn record_open(&mut self, time: String, user: String) {
        self.last_opened = Some(time.clone());
        self.last_opened_by = Some(user.clone());
        self.open_history.push(OpenRecord { time, user });
        if self.open_history.len() > OPEN_HISTORY_LIMIT {
            let excess = self.open_history.len() - OPEN_HISTORY_LIMIT;
            self.open_history.drain(..excess);
        }
    }
}

/// Where a loaded pose record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationSource {
    /// No annotation file yet; a fresh record was created
    Missing,
    /// Parsed from the file
    Parsed,
    /// The file exists but could not be read; a fresh record was created
    Unreadable(String),
}

/// A pose record together with the path it belongs to.
#[derive(Debug, Clone)]
pub struct LoadedAnnotation {
    pub pose: PoseRecord,
    pub path: PathBuf,
    pub source: AnnotationSource,
}

/// Progress counts over the whole image list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub total: usize,
    pub scored: usize,
    pub triaged: usize,
    pub needs_work: usize,
}

// ============================================================================
// Store
// ============================================================================

/// Filesystem access for one open project.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    paths: ProjectPaths,
}

impl ProjectStore {
    /// Classify a root directory without touching it.
    pub fn detect_layout(root: &Path) -> Result<LayoutKind, ProjectError> {
        if !root.is_dir() {
            return Err(ProjectError::NotADirectory(root.to_path_buf()));
        }
        if root.join(DIR_IMAGES).is_dir() {
            return Ok(LayoutKind::Structured);
        }
        if list_image_files(root)?.is_empty() {
            Ok(LayoutKind::Empty)
        } else {
            Ok(LayoutKind::FlatWithImages)
        }
    }

    /// Resolve the layout of `root`, then record the open in `meta.json`.
    ///
    /// `flat_choice` is only consulted when the root is a flat directory of images.
    pub fn open(
        root: &Path,
        flat_choice: FlatLayoutChoice,
        user: &str,
    ) -> Result<OpenOutcome, ProjectError> {
        let paths = match Self::detect_layout(root)? {
            LayoutKind::Structured => {
                let paths = ProjectPaths::structured(root);
                create_dir(&paths.annotation_dir)?;
                create_dir(&paths.inpaint_dir)?;
                paths
            }
            LayoutKind::FlatWithImages => match flat_choice {
                FlatLayoutChoice::Migrate => {
                    let moved = migrate_flat_layout(root)?;
                    log::info!("Migrated {} images into {}/", moved, DIR_IMAGES);
                    ProjectPaths::structured(root)
                }
                FlatLayoutChoice::Legacy => {
                    log::info!("Opening {:?} in legacy flat mode", root);
                    ProjectPaths::legacy(root)
                }
            },
            LayoutKind::Empty => {
                let images_dir = root.join(DIR_IMAGES);
                create_dir(&images_dir)?;
                log::info!("Created {:?}; add images and reopen", images_dir);
                return Ok(OpenOutcome::AwaitingContent { images_dir });
            }
        };

        let store = Self { paths };
        if let Err(e) = store.record_open(user) {
            log::warn!("Could not update project metadata: {}", e);
        }
        Ok(OpenOutcome::Opened(store))
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    /// Image files in the origin directory, sorted by path.
    pub fn list_images(&self) -> Result<Vec<PathBuf>, ProjectError> {
        list_image_files(&self.paths.origin_dir)
    }

    // ------------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------------

    /// Where the annotation for `image` lives.
    ///
    /// Prefers `annotations/<stem>.json`, falling back to a not-yet-migrated
    /// `<image dir>/<stem>.json` when only that one exists.
    pub fn annotation_path(&self, image: &Path) -> PathBuf {
        let beside_image = image.with_extension(ANNOTATION_EXTENSION);
        if self.paths.is_legacy() {
            return beside_image;
        }

        let stem = image.file_stem().unwrap_or_default();
        let mut preferred = self.paths.annotation_dir.join(stem);
        preferred.set_extension(ANNOTATION_EXTENSION);

        if !preferred.exists() && beside_image.exists() {
            beside_image
        } else {
            preferred
        }
    }

    /// Load the pose record for `image`, falling back to a fresh record.
    ///
    /// Unreadable files are logged and replaced by defaults; they are never
    /// an error for the session.
    pub fn load_annotation(&self, image: &Path) -> LoadedAnnotation {
        let path = self.annotation_path(image);
        if !path.exists() {
            return LoadedAnnotation {
                pose: PoseRecord::new(),
                path,
                source: AnnotationSource::Missing,
            };
        }

        match read_annotation_file(&path) {
            Ok(pose) => LoadedAnnotation {
                pose,
                path,
                source: AnnotationSource::Parsed,
            },
            Err(e) => {
                log::warn!("Failed to load annotation {:?}: {}", path, e);
                LoadedAnnotation {
                    pose: PoseRecord::new(),
                    path,
                    source: AnnotationSource::Unreadable(e.to_string()),
                }
            }
        }
    }

    /// Persist a pose record at its resolved path.
    pub fn save_annotation(&self, path: &Path, pose: &PoseRecord) -> Result<(), ProjectError> {
        write_annotation_file(path, pose)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    pub fn meta_path(&self) -> PathBuf {
        self.paths.root.join(META_FILE)
    }

    /// Read `meta.json`; a missing or unreadable file reads as empty.
    pub fn read_meta(&self) -> ProjectMeta {
        let path = self.meta_path();
        let Ok(json) = std::fs::read_to_string(&path) else {
            return ProjectMeta::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable {:?}: {}", path, e);
            ProjectMeta::default()
        })
    }

    pub fn write_meta(&self, meta: &ProjectMeta) -> Result<(), ProjectError> {
        let path = self.meta_path();
        let json = serde_json::to_string_pretty(meta)?;
        write_atomic(&path, json.as_bytes()).map_err(|source| ProjectError::Io { path, source })
    }

    /// Log an open by `user`, refresh the timestamp and the image count.
    pub fn record_open(&self, user: &str) -> Result<(), ProjectError> {
        let mut meta = self.read_meta();
        meta.record_open(timestamp_now(), user.to_string());
        meta.total_images = Some(self.list_images()?.len());
        self.write_meta(&meta)
    }

    /// Remember the image being worked on so a later open resumes there.
    pub fn record_last_image(&self, image: &Path) -> Result<(), ProjectError> {
        let Some(name) = image.file_name() else {
            return Ok(());
        };
        let mut meta = self.read_meta();
        meta.last_image = Some(name.to_string_lossy().into_owned());
        self.write_meta(&meta)
    }

    // ------------------------------------------------------------------------
    // Inpainting references
    // ------------------------------------------------------------------------

    /// Find an inpainting reference with the same stem as `image`.
    pub fn find_inpainting(&self, image: &Path) -> Option<PathBuf> {
        let stem = image.file_stem()?;
        let entries = std::fs::read_dir(&self.paths.inpaint_dir).ok()?;

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                path.is_file()
                    && path.file_stem() == Some(stem)
                    && has_extension(path, INPAINT_EXTENSIONS)
            })
    }

    // ------------------------------------------------------------------------
    // Triage
    // ------------------------------------------------------------------------

    pub fn ignore_dir(&self, category: &str) -> PathBuf {
        self.paths.root.join(DIR_IGNORE).join(category)
    }

    /// Move an image (only the image) into `ignore/<category>/`.
    pub fn move_to_ignore(&self, image: &Path, category: &str) -> Result<PathBuf, ProjectError> {
        let dir = self.ignore_dir(category);
        create_dir(&dir)?;

        let file_name = image
            .file_name()
            .ok_or_else(|| ProjectError::NotAFile(image.to_path_buf()))?;
        let target = dir.join(file_name);
        move_file(image, &target)?;

        log::info!("Moved {:?} to {:?}", file_name, dir);
        Ok(target)
    }

    /// Count scored, triaged and outstanding images without decoding them.
    pub fn summary(&self) -> Result<ProjectSummary, ProjectError> {
        let images = self.list_images()?;
        let mut summary = ProjectSummary {
            total: images.len(),
            ..Default::default()
        };

        for image in &images {
            let pose = self.load_annotation(image).pose;
            if pose.is_triaged() {
                summary.triaged += 1;
            } else if pose.is_fully_scored() {
                summary.scored += 1;
            } else {
                summary.needs_work += 1;
            }
        }

        Ok(summary)
    }
}

// ============================================================================
// Filesystem helpers
// ============================================================================

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ProjectError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();

    // Sort by filename for consistent ordering
    images.sort();
    Ok(images)
}

fn create_dir(dir: &Path) -> Result<(), ProjectError> {
    std::fs::create_dir_all(dir).map_err(|source| ProjectError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Rename `from` to `to`, copying across filesystems when a rename is refused.
fn move_file(from: &Path, to: &Path) -> Result<(), ProjectError> {
    let move_err = |source| ProjectError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if to.exists() {
        log::warn!("Replacing existing {:?} with {:?}", to, from);
    }

    let Err(rename_err) = std::fs::rename(from, to) else {
        return Ok(());
    };
    if !from.is_file() {
        return Err(move_err(rename_err));
    }

    log::debug!("Rename failed ({}), copying {:?} instead", rename_err, from);
    std::fs::copy(from, to).map_err(move_err)?;
    if let Err(e) = std::fs::remove_file(from) {
        // Keep exactly one copy: the original
        let _ = std::fs::remove_file(to);
        return Err(move_err(e));
    }
    Ok(())
}

/// Move root-level images into `images/` and root-level annotations into `annotations/`.
fn migrate_flat_layout(root: &Path) -> Result<usize, ProjectError> {
    let paths = ProjectPaths::structured(root);
    create_dir(&paths.origin_dir)?;
    create_dir(&paths.annotation_dir)?;
    create_dir(&paths.inpaint_dir)?;

    let entries = std::fs::read_dir(root).map_err(|source| ProjectError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut moved = 0;
    for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };

        if is_image_file(&path) {
            move_file(&path, &paths.origin_dir.join(name))?;
            moved += 1;
        } else if has_extension(&path, &[ANNOTATION_EXTENSION]) && name != META_FILE {
            move_file(&path, &paths.annotation_dir.join(name))?;
        }
    }

    Ok(moved)
}

fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur during project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The chosen root is not a directory
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// A path that should name a file does not
    #[error("Not a file: {0:?}")]
    NotAFile(PathBuf),

    /// File I/O error at a specific path
    #[error("File I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Moving a file failed; the source is left in place
    #[error("Failed to move {from:?} to {to:?}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// `meta.json` could not be serialized
    #[error("Failed to serialize project metadata: {0}")]
    Meta(#[from] serde_json::Error),

    /// Annotation read/write error
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn open_structured(root: &Path) -> ProjectStore {
        fs::create_dir_all(root.join(DIR_IMAGES)).unwrap();
        match ProjectStore::open(root, FlatLayoutChoice::Legacy, "tester").unwrap() {
            OpenOutcome::Opened(store) => store,
            other => panic!("expected an opened project, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_layout() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ProjectStore::detect_layout(dir.path()).unwrap(), LayoutKind::Empty);

        touch(&dir.path().join("a.JPG"));
        assert_eq!(
            ProjectStore::detect_layout(dir.path()).unwrap(),
            LayoutKind::FlatWithImages
        );

        fs::create_dir(dir.path().join(DIR_IMAGES)).unwrap();
        assert_eq!(
            ProjectStore::detect_layout(dir.path()).unwrap(),
            LayoutKind::Structured
        );

        assert!(ProjectStore::detect_layout(&dir.path().join("a.JPG")).is_err());
    }

    #[test]
    fn test_open_empty_root_awaits_content() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = ProjectStore::open(dir.path(), FlatLayoutChoice::Migrate, "tester").unwrap();

        match outcome {
            OpenOutcome::AwaitingContent { images_dir } => {
                assert_eq!(images_dir, dir.path().join(DIR_IMAGES));
                assert!(images_dir.is_dir());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!dir.path().join(DIR_ANNOTATIONS).exists());
    }

    #[test]
    fn test_open_structured_creates_subdirs_and_meta() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(DIR_IMAGES).join("b.png"));
        touch(&dir.path().join(DIR_IMAGES).join("a.jpg"));
        touch(&dir.path().join(DIR_IMAGES).join("notes.txt"));

        let store = open_structured(dir.path());
        assert!(dir.path().join(DIR_ANNOTATIONS).is_dir());
        assert!(dir.path().join(DIR_INPAINTING).is_dir());

        let images = store.list_images().unwrap();
        let names: Vec<_> = images.iter().map(|p| p.file_name().unwrap()).collect();
        assert_eq!(names, ["a.jpg", "b.png"]);

        let meta = store.read_meta();
        assert_eq!(meta.total_images, Some(2));
        assert_eq!(meta.last_opened_by.as_deref(), Some("tester"));
        assert_eq!(meta.open_history.len(), 1);
    }

    #[test]
    fn test_open_history_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        for i in 0..60 {
            store.record_open(&format!("user{i}")).unwrap();
        }

        let meta = store.read_meta();
        assert_eq!(meta.open_history.len(), OPEN_HISTORY_LIMIT);
        assert_eq!(meta.open_history.last().unwrap().user, "user59");
        assert_eq!(meta.last_opened_by.as_deref(), Some("user59"));
    }

    #[test]
    fn test_meta_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(DIR_IMAGES)).unwrap();
        fs::write(
            dir.path().join(META_FILE),
            r#"{"reviewer_notes": "check batch 3", "last_image": "a.jpg"}"#,
        )
        .unwrap();

        let store = open_structured(dir.path());
        let meta = store.read_meta();
        assert_eq!(meta.last_image.as_deref(), Some("a.jpg"));
        assert_eq!(meta.extra["reviewer_notes"], "check batch 3");
    }

    #[test]
    fn test_unreadable_meta_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(DIR_IMAGES)).unwrap();
        fs::write(dir.path().join(META_FILE), "{ not json").unwrap();

        let store = open_structured(dir.path());
        // The open rewrote it from scratch
        assert_eq!(store.read_meta().open_history.len(), 1);
    }

    #[test]
    fn test_unwritable_meta_does_not_block_open() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(DIR_IMAGES).join("a.png"));
        fs::create_dir(dir.path().join(META_FILE)).unwrap();

        let store = open_structured(dir.path());
        assert_eq!(store.list_images().unwrap().len(), 1);
        assert!(store.record_open("tester").is_err());
    }

    #[test]
    fn test_migrate_flat_layout() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("a.json"));
        touch(&dir.path().join("readme.txt"));
        fs::write(dir.path().join(META_FILE), "{}").unwrap();

        let outcome = ProjectStore::open(dir.path(), FlatLayoutChoice::Migrate, "tester").unwrap();
        let OpenOutcome::Opened(store) = outcome else {
            panic!("expected an opened project");
        };

        assert!(!store.paths().is_legacy());
        assert!(dir.path().join(DIR_IMAGES).join("a.jpg").exists());
        assert!(dir.path().join(DIR_ANNOTATIONS).join("a.json").exists());
        assert!(dir.path().join(META_FILE).exists());
        assert!(dir.path().join("readme.txt").exists());
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[test]
    fn test_legacy_mode_resolves_to_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));

        let outcome = ProjectStore::open(dir.path(), FlatLayoutChoice::Legacy, "tester").unwrap();
        let OpenOutcome::Opened(store) = outcome else {
            panic!("expected an opened project");
        };

        assert!(store.paths().is_legacy());
        let image = dir.path().join("a.jpg");
        assert_eq!(store.annotation_path(&image), dir.path().join("a.json"));
        assert!(image.exists());
    }

    #[test]
    fn test_annotation_path_falls_back_beside_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let image = dir.path().join(DIR_IMAGES).join("c.jpg");
        touch(&image);

        let preferred = dir.path().join(DIR_ANNOTATIONS).join("c.json");
        assert_eq!(store.annotation_path(&image), preferred);

        let beside = dir.path().join(DIR_IMAGES).join("c.json");
        touch(&beside);
        assert_eq!(store.annotation_path(&image), beside);

        touch(&preferred);
        assert_eq!(store.annotation_path(&image), preferred);
    }

    #[test]
    fn test_load_annotation_sources() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let image = dir.path().join(DIR_IMAGES).join("d.png");

        let missing = store.load_annotation(&image);
        assert_eq!(missing.source, AnnotationSource::Missing);
        assert_eq!(missing.pose, PoseRecord::new());

        fs::write(&missing.path, "[{\"keypoints\": ").unwrap();
        let garbled = store.load_annotation(&image);
        assert!(matches!(garbled.source, AnnotationSource::Unreadable(_)));
        assert_eq!(garbled.pose, PoseRecord::new());

        let mut pose = PoseRecord::new();
        pose.skip_reason = "blur".to_string();
        store.save_annotation(&missing.path, &pose).unwrap();
        let parsed = store.load_annotation(&image);
        assert_eq!(parsed.source, AnnotationSource::Parsed);
        assert_eq!(parsed.pose.skip_reason, "blur");
    }

    #[test]
    fn test_find_inpainting_matches_stem_any_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let image = dir.path().join(DIR_IMAGES).join("e.jpg");

        assert_eq!(store.find_inpainting(&image), None);

        touch(&dir.path().join(DIR_INPAINTING).join("e.txt"));
        touch(&dir.path().join(DIR_INPAINTING).join("ee.webp"));
        assert_eq!(store.find_inpainting(&image), None);

        let reference = dir.path().join(DIR_INPAINTING).join("e.WEBP");
        touch(&reference);
        assert_eq!(store.find_inpainting(&image), Some(reference));
    }

    #[test]
    fn test_move_to_ignore_moves_only_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let image = dir.path().join(DIR_IMAGES).join("f.jpg");
        touch(&image);
        let annotation = store.annotation_path(&image);
        touch(&annotation);

        let target = store.move_to_ignore(&image, "blur").unwrap();
        assert_eq!(target, dir.path().join(DIR_IGNORE).join("blur").join("f.jpg"));
        assert!(target.exists());
        assert!(!image.exists());
        assert!(annotation.exists());
    }

    #[test]
    fn test_move_to_ignore_replaces_earlier_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let image = dir.path().join(DIR_IMAGES).join("f.jpg");
        fs::create_dir_all(image.parent().unwrap()).unwrap();
        fs::write(&image, b"new").unwrap();
        let earlier = dir.path().join(DIR_IGNORE).join("blur").join("f.jpg");
        touch(&earlier);

        let target = store.move_to_ignore(&image, "blur").unwrap();
        assert_eq!(target, earlier);
        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(!image.exists());
    }

    #[test]
    fn test_move_missing_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let image = dir.path().join(DIR_IMAGES).join("gone.jpg");

        let err = store.move_to_ignore(&image, "blur").unwrap_err();
        assert!(matches!(err, ProjectError::Move { .. }));
    }

    #[test]
    fn test_record_last_image_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_structured(dir.path());
        let images: Vec<PathBuf> = ["a.jpg", "b.jpg", "c.jpg"]
            .iter()
            .map(|n| dir.path().join(DIR_IMAGES).join(n))
            .collect();
        images.iter().for_each(|p| touch(p));

        let mut scored = PoseRecord::new();
        for &kind in crate::model::ScoreKind::all() {
            scored.set_score(kind, 2).unwrap();
        }
        store.save_annotation(&store.annotation_path(&images[0]), &scored).unwrap();

        let mut triaged = PoseRecord::new();
        triaged.skip_reason = "blur".to_string();
        store.save_annotation(&store.annotation_path(&images[1]), &triaged).unwrap();

        assert_eq!(
            store.summary().unwrap(),
            ProjectSummary {
                total: 3,
                scored: 1,
                triaged: 1,
                needs_work: 1
            }
        );

        store.record_last_image(&images[2]).unwrap();
        assert_eq!(store.read_meta().last_image.as_deref(), Some("c.jpg"));
    }
}
