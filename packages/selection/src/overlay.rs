//! Delete callbacks for detail overlays.
//!
//! An info-window overlay is rendered outside the normal component tree,
//! yet its embedded delete button must invoke a handler owned by an
//! ancestor. Each overlay instance registers its own callback here and
//! unregisters it on teardown; nothing is attached to ambient global
//! state.

use std::collections::HashMap;

/// A delete handler owned by an overlay's ancestor. Receives the marker id
/// to delete.
pub type DeleteHandler = Box<dyn Fn(&str) + Send>;

/// Per-overlay-instance delete callbacks.
#[derive(Default)]
pub struct OverlayCallbacks {
    handlers: HashMap<String, DeleteHandler>,
}

impl OverlayCallbacks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the delete handler for an overlay instance, replacing any
    /// previous registration for the same overlay.
    pub fn register(&mut self, overlay_id: impl Into<String>, handler: DeleteHandler) {
        self.handlers.insert(overlay_id.into(), handler);
    }

    /// Removes the handler for an overlay instance on teardown.
    pub fn unregister(&mut self, overlay_id: &str) {
        self.handlers.remove(overlay_id);
    }

    /// Invokes the delete handler registered for `overlay_id`.
    ///
    /// Returns `false` when no handler is registered (e.g. the overlay was
    /// already torn down); never an error.
    pub fn invoke_delete(&self, overlay_id: &str, marker_id: &str) -> bool {
        self.handlers.get(overlay_id).is_some_and(|handler| {
            handler(marker_id);
            true
        })
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no overlay is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
