//! Change notifications emitted by the workspace.
//!
//! A UI layer registers listeners with [`Workspace::subscribe`](crate::workspace::Workspace::subscribe)
//! and redraws or updates its widgets when they fire. Listeners are called
//! synchronously, in registration order, after the state change is complete.

use std::fmt;
use std::path::PathBuf;

/// Something observable changed in the workspace.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    /// A new image and its pose record became current
    ImageLoaded { index: usize, path: PathBuf },
    /// The selected keypoint changed
    SelectionChanged(Option<usize>),
    /// Undo/redo availability may have changed
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// An image was moved into `ignore/<category>/`
    ImageTriaged { file_name: String, category: String },
    /// An image could not be decoded; `routed` tells whether it reached the corrupted bucket
    ImageCorrupted { path: PathBuf, routed: bool },
    /// No images remain in the working list
    WorkspaceEmptied,
    /// The current annotation was written
    Saved { path: PathBuf },
}

type Listener = Box<dyn FnMut(&WorkspaceEvent)>;

/// Registered event listeners.
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<Listener>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every future event.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&WorkspaceEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver an event to every listener.
    pub fn emit(&mut self, event: &WorkspaceEvent) {
        log::trace!("Event: {:?}", event);
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
