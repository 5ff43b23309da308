//! Component Mounter: turns fragment markup into a mounted element.
//!
//! A mount parses the markup, gives view roots their `<view>-view` id when the
//! markup omits one, then either replaces the element already carrying that id
//! (keeping its position) or appends. Mount-time initialization binds
//! declarative navigation and is safe to repeat thanks to the binding flag.
use crate::dom::{Container, Element, Listener, NodePath};
use crate::markup::parse_fragment;
use crate::view::{Component, ComponentKind, ViewName};

/// Binding flag for declarative `data-show-view` navigation.
pub const NAV_BOUND_ATTR: &str = "data-bound-nav";
/// Binding flag for the review view's back control and sidebar list.
pub const REVIEW_BOUND_ATTR: &str = "data-bound-review";
/// Declarative navigation: clicking the element activates the named view.
pub const SHOW_VIEW_ATTR: &str = "data-show-view";
/// Marks placeholder views produced by [`fallback_markup`].
pub const FALLBACK_ATTR: &str = "data-fallback";

/// Attach `listener` unless `element` already carries the binding flag `flag`.
/// Each binder owns its own flag, so one element can take one listener from
/// each. Returns whether a listener was attached.
pub fn bind_once(element: &mut Element, flag: &str, listener: Listener) -> bool {
    if element.attr(flag) == Some("true") {
        return false;
    }
    element.add_listener(listener);
    element.set_attr(flag, "true");
    true
}

/// Where a mount landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mounted {
    pub path: NodePath,
    pub replaced: bool,
}

/// Mount `markup` for `component`. Partials and markup without any element are
/// no-ops and return `None`.
pub fn mount(container: &mut Container, component: &Component, markup: &str) -> Option<Mounted> {
    if !component.is_mountable() {
        return None;
    }
    let Some(mut element) = parse_fragment(markup) else {
        tracing::warn!(
            component = component.name.as_str(),
            "fragment has no element; nothing mounted"
        );
        return None;
    };
    if element.id().is_none() {
        if let ComponentKind::View(_) = component.kind() {
            element.set_id(&component.name);
        }
    }

    let existing = element.id().and_then(|id| container.path_of_id(id));
    let mounted = match existing {
        Some(path) => {
            container.replace(&path, element);
            Mounted {
                path,
                replaced: true,
            }
        }
        None => Mounted {
            path: container.append(element),
            replaced: false,
        },
    };
    tracing::debug!(
        component = component.name.as_str(),
        path = %mounted.path,
        replaced = mounted.replaced,
        "component mounted"
    );

    if let Some(element) = container.get_mut(&mounted.path) {
        initialize(component, element);
    }
    Some(mounted)
}

/// One-time initialization hook. Binds every `data-show-view` control (the
/// root included) to its view; already-bound controls are left alone.
pub fn initialize(component: &Component, element: &mut Element) -> usize {
    let mut targets = element.paths_with_attr(SHOW_VIEW_ATTR);
    if element.has_attr(SHOW_VIEW_ATTR) {
        targets.insert(0, Vec::new());
    }

    let mut bound = 0;
    for path in targets {
        let Some(control) = element.at_path_mut(&path) else {
            continue;
        };
        let Some(raw) = control.attr(SHOW_VIEW_ATTR).map(str::to_string) else {
            continue;
        };
        match raw.parse::<ViewName>() {
            Ok(view) => {
                if bind_once(control, NAV_BOUND_ATTR, Listener::ShowView(view)) {
                    bound += 1;
                }
            }
            Err(err) => tracing::warn!(
                component = component.name.as_str(),
                error = %err,
                "ignoring navigation control"
            ),
        }
    }
    bound
}

/// Placeholder substituted when a view's fragment cannot be fetched. Always
/// yields one element identified as the view, flagged with `data-fallback`.
pub fn fallback_markup(view: ViewName) -> String {
    let back = match view {
        ViewName::Landing => String::new(),
        _ => format!(
            r#"<button type="button" {SHOW_VIEW_ATTR}="{}">Back to start</button>"#,
            ViewName::Landing
        ),
    };
    format!(
        r#"<section id="{id}" class="view fallback-view" {FALLBACK_ATTR}="true"><h2>{label}</h2><p>This section could not be loaded. Check your connection and try again.</p>{back}</section>"#,
        id = view.element_id(),
        label = view.label(),
    )
}
