//! View Activator: tracks the single active view and moves the active marker.
//!
//! Activation is split in two: [`ViewActivator::locate`] decides whether the
//! target can be shown at all, and [`ViewActivator::apply`] performs the marker
//! swap. Nothing is touched until the target element is known to exist, so an
//! abandoned activation leaves both the markers and the current view as they were.
use crate::dom::{Container, NodePath};
use crate::view::ViewName;

#[derive(Clone, Debug)]
pub struct ViewActivator {
    active_class: String,
    current: Option<ViewName>,
}

impl ViewActivator {
    pub fn new(active_class: &str) -> Self {
        Self {
            active_class: active_class.to_string(),
            current: None,
        }
    }

    /// `None` until the first successful activation.
    pub fn current(&self) -> Option<ViewName> {
        self.current
    }

    /// Path of the mounted element for `target`, first in container order.
    pub fn locate(&self, container: &Container, target: ViewName) -> Option<NodePath> {
        container.path_of_id(&target.element_id())
    }

    /// Clear the marker from every view, mark `path` active and record `target`
    /// as current. Returns `false` (and changes nothing) if `path` is stale.
    pub fn apply(&mut self, container: &mut Container, target: ViewName, path: &NodePath) -> bool {
        if container.get(path).is_none() {
            return false;
        }
        for view in ViewName::ALL {
            if let Some(element) = container.find_by_id_mut(&view.element_id()) {
                element.remove_class(&self.active_class);
            }
        }
        if let Some(element) = container.get_mut(path) {
            element.add_class(&self.active_class);
        }
        self.current = Some(target);
        true
    }

    /// Align a freshly mounted `view` at `path` with the activation state: it
    /// carries the marker if and only if it is the current view, whatever its
    /// markup said.
    pub fn sync_marker(&self, container: &mut Container, view: ViewName, path: &NodePath) {
        let Some(element) = container.get_mut(path) else {
            return;
        };
        if self.current == Some(view) {
            element.add_class(&self.active_class);
        } else {
            element.remove_class(&self.active_class);
        }
    }

    /// Views whose mounted element currently carries the active marker.
    pub fn marked_views(&self, container: &Container) -> Vec<ViewName> {
        ViewName::ALL
            .iter()
            .copied()
            .filter(|view| {
                container
                    .find_by_id(&view.element_id())
                    .is_some_and(|element| element.has_class(&self.active_class))
            })
            .collect()
    }
}
