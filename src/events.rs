//! Click delivery. A click at a target bubbles from the target to the mounted
//! root; every listener on the way contributes at most one action.
use crate::dom::{Container, Listener, NodePath};
use crate::review::resolve_review_index;
use crate::view::ViewName;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickAction {
    ShowView(ViewName),
    ReviewQuestion(usize),
}

/// Actions triggered by a click at `target`, innermost listener first.
pub fn resolve_click(container: &Container, target: &NodePath) -> Vec<ClickAction> {
    let mut actions = Vec::new();
    for step in container.ancestry(target) {
        let Some(element) = container.get(&step) else {
            continue;
        };
        for listener in element.listeners() {
            let action = match listener {
                Listener::ShowView(view) => Some(ClickAction::ShowView(*view)),
                Listener::ReviewNavigation => {
                    resolve_review_index(container, &step, target).map(ClickAction::ReviewQuestion)
                }
            };
            actions.extend(action);
        }
    }
    actions
}
