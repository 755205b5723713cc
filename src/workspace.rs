//! The annotation workspace: one open project, one live pose record.
//!
//! [`Workspace`] ties the pieces together. It owns the image list of the
//! open [`ProjectStore`], the pose record of the current image, its undo
//! history and the view transform, and it enforces the scoring gate before
//! moving forward through the list.
//!
//! ```text
//! NoImage ──load──▶ ImageLoaded ◀──save── Dirty
//!                        │  ──edit/score──▶  │
//!                        └──── next/prev/triage reload ────┘
//! ```
//!
//! Every mutation happens synchronously on the caller's thread. Loading a
//! new image discards the old record and clears history.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use image::DynamicImage;

use crate::config::AppConfig;
use crate::constants::{CORRUPTED_CATEGORY, CORRUPTED_REASON, DEFAULT_HIT_RADIUS, UNSCORED};
use crate::error::WorkspaceError;
use crate::events::{EventListeners, WorkspaceEvent};
use crate::hit_test::{HitPolicy, find_keypoint_at};
use crate::model::{KEYPOINT_COUNT, KeypointState, PoseRecord, ScoreKind, Visibility};
use crate::project::{FlatLayoutChoice, OpenOutcome, ProjectStore};
use crate::undo::{KeypointEdit, UndoStack, redo_command, undo_command};
use crate::zoom_math::{Point, Size, ViewTransform};

// ============================================================================
// Public types
// ============================================================================

/// Coarse workspace state for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    NoImage,
    ImageLoaded,
    /// The current record has changes that are not on disk yet
    Dirty,
}

/// Whether the current image may be left in the forward direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    /// A skip reason is set
    Triaged,
    /// All three scores are set
    Complete,
    /// These scores are still unset
    Missing(Vec<ScoreKind>),
}

impl ValidationStatus {
    pub fn passes(&self) -> bool {
        !matches!(self, ValidationStatus::Missing(_))
    }
}

/// Result of [`Workspace::load_project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLoad {
    /// An image is loaded and ready for editing
    Loaded { image_count: usize },
    /// The root was empty; `images/` was created for the user to fill
    AwaitingContent { images_dir: PathBuf },
    /// The project opened but holds no loadable images
    NoImages,
}

/// Behavior settings for a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceOptions {
    pub hit_radius: f64,
    pub hit_policy: HitPolicy,
    /// Recorded in the project open log
    pub user_name: String,
}

impl WorkspaceOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            hit_radius: config.preferences.hit_radius,
            hit_policy: config.preferences.hit_policy,
            user_name: config.user_name(),
        }
    }
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_RADIUS,
            hit_policy: HitPolicy::default(),
            user_name: "unknown".to_string(),
        }
    }
}

/// The image currently on screen.
#[derive(Debug)]
struct CurrentImage {
    path: PathBuf,
    image: DynamicImage,
    annotation_path: PathBuf,
    inpaint_path: Option<PathBuf>,
}

impl CurrentImage {
    fn size(&self) -> Size {
        Size::new(f64::from(self.image.width()), f64::from(self.image.height()))
    }
}

/// A keypoint drag in progress.
#[derive(Debug, Clone, Copy)]
struct Drag {
    index: usize,
    start: KeypointState,
}

// ============================================================================
// Workspace
// ============================================================================

/// Annotation workspace engine.
pub struct Workspace {
    options: WorkspaceOptions,
    project: Option<ProjectStore>,
    images: Vec<PathBuf>,
    index: usize,
    current: Option<CurrentImage>,
    pose: PoseRecord,
    history: UndoStack,
    selected: Option<usize>,
    drag: Option<Drag>,
    transform: ViewTransform,
    viewport: Size,
    dirty: bool,
    listeners: EventListeners,
}

impl Workspace {
    pub fn new(options: WorkspaceOptions) -> Self {
        Self {
            options,
            project: None,
            images: Vec::new(),
            index: 0,
            current: None,
            pose: PoseRecord::new(),
            history: UndoStack::new(),
            selected: None,
            drag: None,
            transform: ViewTransform::identity(),
            viewport: Size::new(0.0, 0.0),
            dirty: false,
            listeners: EventListeners::new(),
        }
    }

    /// Register a listener for workspace events.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&WorkspaceEvent) + 'static,
    {
        self.listeners.subscribe(listener);
    }

    fn emit(&mut self, event: WorkspaceEvent) {
        self.listeners.emit(&event);
    }

    fn emit_history(&mut self) {
        let event = WorkspaceEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }

    // ------------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------------

    pub fn project(&self) -> Option<&ProjectStore> {
        self.project.as_ref()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Index of the current image, if one is loaded.
    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().map(|_| self.index)
    }

    pub fn current_image_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.path.as_path())
    }

    /// Decoded pixels of the current image.
    pub fn current_image(&self) -> Option<&DynamicImage> {
        self.current.as_ref().map(|c| &c.image)
    }

    pub fn image_size(&self) -> Option<Size> {
        self.current.as_ref().map(CurrentImage::size)
    }

    pub fn annotation_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.annotation_path.as_path())
    }

    pub fn inpaint_path(&self) -> Option<&Path> {
        self.current.as_ref().and_then(|c| c.inpaint_path.as_deref())
    }

    pub fn pose(&self) -> &PoseRecord {
        &self.pose
    }

    pub fn selected_keypoint(&self) -> Option<usize> {
        self.selected
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn state(&self) -> WorkspaceState {
        match (&self.current, self.dirty) {
            (None, _) => WorkspaceState::NoImage,
            (Some(_), false) => WorkspaceState::ImageLoaded,
            (Some(_), true) => WorkspaceState::Dirty,
        }
    }

    pub fn validation(&self) -> ValidationStatus {
        if self.pose.is_triaged() {
            return ValidationStatus::Triaged;
        }
        let missing = self.pose.missing_scores();
        if missing.is_empty() {
            ValidationStatus::Complete
        } else {
            ValidationStatus::Missing(missing)
        }
    }

    /// One-line summary for a status bar.
    pub fn status_line(&self) -> String {
        let Some(current) = &self.current else {
            return "No image loaded".to_string();
        };

        let name = current
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut status = format!("Image: {} ({}/{})", name, self.index + 1, self.images.len());

        if self.pose.is_triaged() {
            status.push_str(&format!(" | [Skipped: {}]", self.pose.skip_reason));
        }
        if let Some(kp) = self.selected.and_then(|i| self.pose.keypoint(i)) {
            let visibility = match kp.visibility {
                Visibility::Visible => "visible",
                Visibility::Occluded => "occluded",
            };
            status.push_str(&format!(" | Selected: {} ({})", kp.name(), visibility));
        }
        if self.dirty {
            status.push_str(" | *");
        }
        status
    }

    fn require_image(&self) -> Result<&CurrentImage, WorkspaceError> {
        self.current.as_ref().ok_or(WorkspaceError::NoImageLoaded)
    }

    fn require_project(&self) -> Result<&ProjectStore, WorkspaceError> {
        self.project.as_ref().ok_or(WorkspaceError::NoImageLoaded)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Open a project root and load its first (or last worked-on) image.
    pub fn load_project(
        &mut self,
        root: &Path,
        flat_choice: FlatLayoutChoice,
    ) -> Result<ProjectLoad, WorkspaceError> {
        let store = match ProjectStore::open(root, flat_choice, &self.options.user_name)? {
            OpenOutcome::Opened(store) => store,
            OpenOutcome::AwaitingContent { images_dir } => {
                self.close();
                return Ok(ProjectLoad::AwaitingContent { images_dir });
            }
        };

        let images = store.list_images()?;
        let resume = store.read_meta().last_image;
        log::info!("📂 Opened project {:?} with {} images", root, images.len());

        self.close();
        self.project = Some(store);
        self.images = images;
        self.index = resume
            .and_then(|name| {
                let name = OsStr::new(&name);
                self.images.iter().position(|p| p.file_name() == Some(name))
            })
            .unwrap_or(0);

        if self.images.is_empty() {
            return Ok(ProjectLoad::NoImages);
        }

        self.load_current();
        if self.current.is_some() {
            Ok(ProjectLoad::Loaded {
                image_count: self.images.len(),
            })
        } else {
            Ok(ProjectLoad::NoImages)
        }
    }

    /// Drop the project and all per-image state.
    pub fn close(&mut self) {
        self.project = None;
        self.images.clear();
        self.index = 0;
        self.clear_current();
    }

    fn clear_current(&mut self) {
        self.current = None;
        self.pose = PoseRecord::new();
        self.history.clear();
        self.selected = None;
        self.drag = None;
        self.dirty = false;
        self.transform = ViewTransform::identity();
    }

    fn reset_to_empty(&mut self) {
        self.index = 0;
        self.clear_current();
        log::info!("🏁 No images left in the working list");
        self.emit(WorkspaceEvent::WorkspaceEmptied);
    }

    /// Load the image at `self.index`, routing undecodable files to the
    /// corrupted bucket and moving on until one loads or the list runs out.
    fn load_current(&mut self) {
        loop {
            let Some(path) = self.images.get(self.index).cloned() else {
                self.reset_to_empty();
                return;
            };

            match image::open(&path) {
                Ok(image) => {
                    self.install(path, image);
                    return;
                }
                Err(e) => {
                    log::warn!("🖼️ Failed to decode {:?}: {}", path, e);
                    self.route_corrupt(&path);
                    if self.images.is_empty() {
                        self.reset_to_empty();
                        return;
                    }
                    self.index = self.index.min(self.images.len() - 1);
                }
            }
        }
    }

    fn install(&mut self, path: PathBuf, image: DynamicImage) {
        let Some(store) = &self.project else {
            return;
        };
        let loaded = store.load_annotation(&path);
        let inpaint_path = store.find_inpainting(&path);

        log::info!(
            "🖼️ Loaded {:?} ({}x{}), annotation {:?}",
            path.file_name().unwrap_or_default(),
            image.width(),
            image.height(),
            loaded.source
        );

        self.current = Some(CurrentImage {
            path: path.clone(),
            image,
            annotation_path: loaded.path,
            inpaint_path,
        });
        self.pose = loaded.pose;
        self.history.clear();
        self.drag = None;
        self.dirty = false;
        self.selected = Some(0);
        self.frame_view();

        self.emit(WorkspaceEvent::ImageLoaded {
            index: self.index,
            path,
        });
        self.emit(WorkspaceEvent::SelectionChanged(self.selected));
        self.emit_history();
    }

    /// Record the corrupt reason, move the file aside and drop it from the list.
    fn route_corrupt(&mut self, path: &Path) {
        let routed = match &self.project {
            Some(store) => {
                let loaded = store.load_annotation(path);
                let mut pose = loaded.pose;
                pose.skip_reason = CORRUPTED_REASON.to_string();

                let result = store
                    .save_annotation(&loaded.path, &pose)
                    .and_then(|()| store.move_to_ignore(path, CORRUPTED_CATEGORY));
                match result {
                    Ok(target) => {
                        log::info!("🗑️ Routed corrupt image to {:?}", target);
                        true
                    }
                    Err(e) => {
                        log::error!("Failed to route corrupt image {:?}: {}", path, e);
                        false
                    }
                }
            }
            None => false,
        };

        if self.index < self.images.len() {
            self.images.remove(self.index);
        }
        self.emit(WorkspaceEvent::ImageCorrupted {
            path: path.to_path_buf(),
            routed,
        });
    }

    // ------------------------------------------------------------------------
    // Saving and navigation
    // ------------------------------------------------------------------------

    /// Write the current record to its annotation path.
    ///
    /// On failure the in-memory record is untouched so the save can be retried.
    pub fn save(&mut self) -> Result<PathBuf, WorkspaceError> {
        let current = self.require_image()?;
        let store = self.require_project()?;
        let path = current.annotation_path.clone();

        store.save_annotation(&path, &self.pose)?;
        if let Err(e) = store.record_last_image(&current.path) {
            log::warn!("Failed to update project metadata: {}", e);
        }

        self.dirty = false;
        log::info!("💾 Saved {:?}", path);
        self.emit(WorkspaceEvent::Saved { path: path.clone() });
        Ok(path)
    }

    /// Pass when the record is triaged or fully scored.
    pub fn validate_before_navigate(&self) -> Result<(), WorkspaceError> {
        self.require_image()?;
        match self.validation() {
            ValidationStatus::Missing(missing) => Err(WorkspaceError::ValidationBlocked { missing }),
            _ => Ok(()),
        }
    }

    /// Validate, save, and advance one image.
    pub fn next(&mut self) -> Result<(), WorkspaceError> {
        self.validate_before_navigate()?;
        if self.index + 1 >= self.images.len() {
            return Err(WorkspaceError::AtLastImage);
        }
        self.save()?;
        self.index += 1;
        self.load_current();
        Ok(())
    }

    /// Save and go back one image. No validation.
    pub fn prev(&mut self) -> Result<(), WorkspaceError> {
        self.require_image()?;
        if self.index == 0 {
            return Err(WorkspaceError::AtFirstImage);
        }
        self.save()?;
        self.index -= 1;
        self.load_current();
        Ok(())
    }

    /// Jump forward to the next active image that still needs scores.
    ///
    /// Validates and saves first. When nothing is found the workspace stays
    /// on (or returns to) the image it started from.
    pub fn next_needing_work(&mut self) -> Result<(), WorkspaceError> {
        self.validate_before_navigate()?;
        self.save()?;

        let origin = self.require_image()?.path.clone();
        let mut candidate = self.index + 1;

        while candidate < self.images.len() {
            let needs_work = match &self.project {
                Some(store) => store.load_annotation(&self.images[candidate]).pose.needs_work(),
                None => false,
            };
            if !needs_work {
                candidate += 1;
                continue;
            }

            self.index = candidate;
            self.load_current();
            if self.current.is_none() {
                return Err(WorkspaceError::NothingLeft);
            }
            if self.pose.needs_work() && self.current_image_path() != Some(origin.as_path()) {
                return Ok(());
            }
            // A corrupt file shifted the list; keep scanning after what loaded
            candidate = self.index + 1;
        }

        if self.current_image_path() != Some(origin.as_path()) {
            if let Some(position) = self.images.iter().position(|p| *p == origin) {
                self.index = position;
                self.load_current();
            }
        }
        log::info!("No more images need work");
        Err(WorkspaceError::NothingLeft)
    }

    /// Jump to an arbitrary index after saving. No validation.
    pub fn go_to(&mut self, index: usize) -> Result<(), WorkspaceError> {
        self.require_image()?;
        if index >= self.images.len() {
            return Err(WorkspaceError::AtLastImage);
        }
        if index == self.index {
            return Ok(());
        }
        self.save()?;
        self.index = index;
        self.load_current();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Triage
    // ------------------------------------------------------------------------

    /// Mark the current image as ignored and move it to `ignore/<category>/`.
    ///
    /// The annotation (with `skip_reason` set to `reason`, or the category
    /// when no reason is given) is written first and stays where it is. A
    /// failed write changes nothing; a failed move keeps the written reason.
    pub fn triage(&mut self, category: &str, reason: Option<&str>) -> Result<(), WorkspaceError> {
        if !is_valid_category(category) {
            return Err(WorkspaceError::InvalidCategory(category.to_string()));
        }
        let (image, annotation_path) = {
            let current = self.require_image()?;
            (current.path.clone(), current.annotation_path.clone())
        };
        let store = self.require_project()?.clone();
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(category)
            .to_string();

        let mut recorded = self.pose.clone();
        recorded.skip_reason = reason.clone();
        store
            .save_annotation(&annotation_path, &recorded)
            .map_err(|source| WorkspaceError::TriageWriteFailed {
                image: image.clone(),
                source,
            })?;

        self.pose.skip_reason = reason;
        self.dirty = false;

        store
            .move_to_ignore(&image, category)
            .map_err(|source| WorkspaceError::TriageMoveFailed {
                image: image.clone(),
                source,
            })?;

        self.images.remove(self.index);
        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("🚫 Triaged {} as {}", file_name, category);
        self.emit(WorkspaceEvent::ImageTriaged {
            file_name,
            category: category.to_string(),
        });

        if self.images.is_empty() {
            self.reset_to_empty();
        } else {
            self.index = self.index.min(self.images.len() - 1);
            self.load_current();
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn select_keypoint(&mut self, index: usize) -> Result<(), WorkspaceError> {
        self.require_image()?;
        if index >= KEYPOINT_COUNT {
            return Err(WorkspaceError::KeypointOutOfRange(index));
        }
        self.set_selection(Some(index));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    /// Select the following keypoint, wrapping at the end.
    pub fn select_next_keypoint(&mut self) {
        if self.current.is_none() {
            return;
        }
        let next = self.selected.map_or(0, |i| (i + 1) % KEYPOINT_COUNT);
        self.set_selection(Some(next));
    }

    /// Select the preceding keypoint, wrapping at the start.
    pub fn select_prev_keypoint(&mut self) {
        if self.current.is_none() {
            return;
        }
        let prev = self
            .selected
            .map_or(KEYPOINT_COUNT - 1, |i| (i + KEYPOINT_COUNT - 1) % KEYPOINT_COUNT);
        self.set_selection(Some(prev));
    }

    fn set_selection(&mut self, selection: Option<usize>) {
        if self.selected != selection {
            self.selected = selection;
            self.emit(WorkspaceEvent::SelectionChanged(selection));
        }
    }

    // ------------------------------------------------------------------------
    // Keypoint editing
    // ------------------------------------------------------------------------

    /// Apply a new keypoint state and record it in history.
    /// Returns false when nothing changed.
    fn commit_edit(&mut self, index: usize, after: KeypointState) -> Result<bool, WorkspaceError> {
        if !after.x.is_finite() || !after.y.is_finite() {
            return Err(WorkspaceError::NonFiniteCoordinate {
                x: after.x,
                y: after.y,
            });
        }
        let before = self
            .pose
            .set_keypoint_state(index, after)
            .ok_or(WorkspaceError::KeypointOutOfRange(index))?;
        let recorded = self.history.push(KeypointEdit::new(index, before, after));
        if recorded {
            self.dirty = true;
            self.emit_history();
        }
        Ok(recorded)
    }

    /// Set one keypoint's position and visibility as a single undoable edit.
    pub fn edit_keypoint(
        &mut self,
        index: usize,
        x: f64,
        y: f64,
        visibility: Visibility,
    ) -> Result<bool, WorkspaceError> {
        self.require_image()?;
        self.commit_edit(index, KeypointState::new(x, y, visibility))
    }

    fn selected_state(&self) -> Option<(usize, KeypointState)> {
        let index = self.selected?;
        Some((index, self.pose.keypoint(index)?.state()))
    }

    pub fn set_selected_visibility(&mut self, visibility: Visibility) -> Result<bool, WorkspaceError> {
        self.require_image()?;
        let Some((index, state)) = self.selected_state() else {
            return Ok(false);
        };
        self.commit_edit(index, KeypointState { visibility, ..state })
    }

    pub fn toggle_selected_visibility(&mut self) -> Result<bool, WorkspaceError> {
        self.require_image()?;
        let Some((index, state)) = self.selected_state() else {
            return Ok(false);
        };
        let visibility = state.visibility.toggled();
        self.commit_edit(index, KeypointState { visibility, ..state })
    }

    /// Move the selected keypoint under the cursor and mark it visible.
    pub fn place_selected_at(&mut self, view_point: Point) -> Result<bool, WorkspaceError> {
        self.require_image()?;
        let Some(index) = self.selected else {
            return Ok(false);
        };
        let p = self.transform.view_to_image(view_point);
        self.commit_edit(index, KeypointState::new(p.x, p.y, Visibility::Visible))
    }

    /// Hit-test and start dragging the keypoint under the cursor.
    ///
    /// A miss clears the selection.
    pub fn pointer_down(&mut self, view_point: Point) -> Option<usize> {
        self.current.as_ref()?;
        let hit = find_keypoint_at(
            view_point,
            &self.pose,
            &self.transform,
            self.options.hit_radius,
            self.options.hit_policy,
        );

        self.drag = hit.and_then(|index| {
            let start = self.pose.keypoint(index)?.state();
            Some(Drag { index, start })
        });
        self.set_selection(hit);
        hit
    }

    /// Move the dragged keypoint live. History is written on release.
    pub fn pointer_move(&mut self, view_point: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let p = self.transform.view_to_image(view_point);
        if !p.x.is_finite() || !p.y.is_finite() {
            return false;
        }
        let visibility = self
            .pose
            .keypoint(drag.index)
            .map_or(drag.start.visibility, |kp| kp.visibility);
        self.pose
            .set_keypoint_state(drag.index, KeypointState::new(p.x, p.y, visibility))
            .is_some()
    }

    /// Finish a drag as one history entry from where it started.
    pub fn pointer_up(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let Some(after) = self.pose.keypoint(drag.index).map(|kp| kp.state()) else {
            return false;
        };
        let recorded = self.history.push(KeypointEdit::new(drag.index, drag.start, after));
        if recorded {
            self.dirty = true;
            self.emit_history();
        }
        recorded
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.drag = None;
        let undone = undo_command(&mut self.history, &mut self.pose);
        if undone {
            self.dirty = true;
            self.emit_history();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.drag = None;
        let redone = redo_command(&mut self.history, &mut self.pose);
        if redone {
            self.dirty = true;
            self.emit_history();
        }
        redone
    }

    // ------------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------------

    /// Set a score; `-1` clears it. Not part of undo history.
    pub fn set_score(&mut self, kind: ScoreKind, value: i32) -> Result<(), WorkspaceError> {
        self.require_image()?;
        if self.pose.score(kind) != value {
            self.pose.set_score(kind, value)?;
            self.dirty = true;
        }
        Ok(())
    }

    /// Set a score, or clear it when the same value is chosen again.
    pub fn toggle_score(&mut self, kind: ScoreKind, value: i32) -> Result<i32, WorkspaceError> {
        let next = if self.pose.score(kind) == value {
            UNSCORED
        } else {
            value
        };
        self.set_score(kind, next)?;
        Ok(next)
    }

    // ------------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------------

    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform.pan_by(dx, dy);
    }

    pub fn wheel(&mut self, view_point: Point, steps: i32) {
        self.transform.wheel(view_point, steps);
    }

    pub fn fit_to_window(&mut self) {
        if let Some(size) = self.image_size() {
            self.transform.fit_to_window(size, self.viewport);
        }
    }

    pub fn focus_on_pose(&mut self) {
        if let Some(size) = self.image_size() {
            self.transform
                .focus_on_bbox(self.pose.bounding_box(), size, self.viewport);
        }
    }

    /// Focus on the pose when it has real coordinates, else fit the image.
    fn frame_view(&mut self) {
        if self.pose.has_real_data() {
            self.focus_on_pose();
        } else {
            self.fit_to_window();
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceOptions::default())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("root", &self.project.as_ref().map(ProjectStore::root))
            .field("images", &self.images.len())
            .field("index", &self.index)
            .field("state", &self.state())
            .field("selected", &self.selected)
            .finish()
    }
}

/// A category must name exactly one plain directory.
fn is_valid_category(category: &str) -> bool {
    let mut components = Path::new(category).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && category.trim() == category
}
