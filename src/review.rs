//! Review Manager handle, its lazy slot, and the review navigation binder.
//!
//! The review view owns two controls: a "back to results" button and a sidebar
//! list whose items map one-to-one to questions. The list gets a single
//! delegated listener; a click anywhere inside an item resolves to that item's
//! position among the list's direct children.
use serde::{Deserialize, Serialize};

use crate::collab::{Question, ShellDeps, TestResults};
use crate::dom::{Container, Element, Listener, NodePath};
use crate::mount::{bind_once, REVIEW_BOUND_ATTR};
use crate::view::ViewName;

/// Renders and navigates the answer review. Constructed by the shell on the
/// first review activation and owned by it afterwards.
pub trait ReviewManager {
    fn initialize(&mut self, results: &TestResults, questions: &[Question], view: &mut Element);
    fn load_review_question(&mut self, index: usize);
    fn close_sidebar(&mut self);
}

pub type ReviewFactory = Box<dyn Fn() -> Box<dyn ReviewManager>>;

/// Minimal review manager: tracks position and sidebar state without rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewCursor {
    pub question_count: usize,
    pub current: Option<usize>,
    pub sidebar_open: bool,
}

impl ReviewManager for ReviewCursor {
    fn initialize(&mut self, _results: &TestResults, questions: &[Question], _view: &mut Element) {
        self.question_count = questions.len();
        self.current = if questions.is_empty() { None } else { Some(0) };
        self.sidebar_open = false;
    }

    fn load_review_question(&mut self, index: usize) {
        if index < self.question_count {
            self.current = Some(index);
        }
    }

    fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }
}

/// Ids of the controls the binder looks for inside the review view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewControls {
    pub back_control_id: String,
    pub sidebar_list_id: String,
}

impl Default for ReviewControls {
    fn default() -> Self {
        Self {
            back_control_id: "back-to-results".to_string(),
            sidebar_list_id: "review-question-list".to_string(),
        }
    }
}

/// Optional-ownership slot for the review manager, filled on first demand.
pub struct ReviewSlot {
    factory: ReviewFactory,
    handle: Option<Box<dyn ReviewManager>>,
}

impl ReviewSlot {
    pub fn new(factory: ReviewFactory) -> Self {
        Self {
            factory,
            handle: None,
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn get_or_create(&mut self) -> &mut (dyn ReviewManager + 'static) {
        if self.handle.is_none() {
            tracing::debug!("constructing review manager");
        }
        let handle = self.handle.get_or_insert_with(|| (self.factory)());
        handle.as_mut()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn ReviewManager + 'static)> {
        self.handle.as_deref_mut()
    }
}

impl Default for ReviewSlot {
    fn default() -> Self {
        Self::new(Box::new(|| -> Box<dyn ReviewManager> {
            Box::new(ReviewCursor::default())
        }))
    }
}

/// Initialize the review manager for `view` and bind its controls. Skipped
/// (returns `false`) when state or questions are not configured.
pub fn initialize_review(
    deps: &ShellDeps,
    slot: &mut ReviewSlot,
    controls: &ReviewControls,
    view: &mut Element,
) -> bool {
    let (Some(state), Some(questions)) = (&deps.state, &deps.questions) else {
        tracing::debug!("review skipped: state or question collaborator not configured");
        return false;
    };
    let results = state.test_results();
    let questions = questions.questions();
    slot.get_or_create().initialize(&results, &questions, view);
    let bound = bind_review_controls(view, controls);
    tracing::debug!(questions = questions.len(), bound, "review initialized");
    true
}

/// Wire the back control and the sidebar list, each at most once.
pub fn bind_review_controls(view: &mut Element, controls: &ReviewControls) -> usize {
    let mut bound = 0;
    if let Some(back) = view.find_by_id_mut(&controls.back_control_id) {
        if bind_once(
            back,
            REVIEW_BOUND_ATTR,
            Listener::ShowView(ViewName::Result),
        ) {
            bound += 1;
        }
    }
    if let Some(list) = view.find_by_id_mut(&controls.sidebar_list_id) {
        if bind_once(list, REVIEW_BOUND_ATTR, Listener::ReviewNavigation) {
            bound += 1;
        }
    }
    bound
}

/// Resolve a click at `target` against the delegated list at `list`: the
/// nearest `li` at or above the target (but below the list) must be a direct
/// child of the list, and its ordinal among the list's element children is
/// returned.
pub fn resolve_review_index(
    container: &Container,
    list: &NodePath,
    target: &NodePath,
) -> Option<usize> {
    if !target.starts_with(list) {
        return None;
    }
    let mut current = target.clone();
    while current.depth() > list.depth() {
        let element = container.get(&current)?;
        if element.tag() == "li" {
            if current.depth() != list.depth() + 1 {
                return None;
            }
            return current.indices().last().copied();
        }
        current = current.parent()?;
    }
    None
}

/// Forward a resolved review index to state and to the review manager.
pub fn navigate_review(deps: &ShellDeps, slot: &mut ReviewSlot, index: usize) {
    match &deps.state {
        Some(state) => state.set_review_current_question(index),
        None => tracing::debug!("state collaborator not configured"),
    }
    if let Some(handle) = slot.get_mut() {
        handle.load_review_question(index);
        handle.close_sidebar();
    }
    tracing::debug!(index, "review question selected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;
    use crate::mount::{initialize, NAV_BOUND_ATTR};
    use crate::view::Component;

    fn review_container() -> (Container, NodePath) {
        let view = parse_fragment(
            r#"<section id="review-answers-view">
                 <button id="back-to-results">Back</button>
                 <ul id="review-question-list">
                   <li><span>Q1</span></li>
                   <li><span>Q2</span><ol><li>nested</li></ol></li>
                   <li>Q3</li>
                 </ul>
               </section>"#,
        )
        .expect("view");
        let mut container = Container::new("app");
        container.append(view);
        let list = container
            .path_of_id("review-question-list")
            .expect("sidebar list");
        (container, list)
    }

    #[test]
    fn resolves_items_and_their_descendants() {
        let (container, list) = review_container();
        assert_eq!(
            resolve_review_index(&container, &list, &list.child(0)),
            Some(0)
        );
        assert_eq!(
            resolve_review_index(&container, &list, &list.child(1).child(0)),
            Some(1)
        );
        assert_eq!(
            resolve_review_index(&container, &list, &list.child(2)),
            Some(2)
        );
    }

    #[test]
    fn clicks_outside_items_resolve_to_nothing() {
        let (container, list) = review_container();
        assert_eq!(resolve_review_index(&container, &list, &list), None);
        let back = container.path_of_id("back-to-results").expect("back");
        assert_eq!(resolve_review_index(&container, &list, &back), None);
        // nested items are not direct children of the list
        let nested = list.child(1).child(1).child(0);
        assert_eq!(resolve_review_index(&container, &list, &nested), None);
    }

    #[test]
    fn binding_is_idempotent() {
        let (mut container, _) = review_container();
        let view = container
            .find_by_id_mut("review-answers-view")
            .expect("view");
        let controls = ReviewControls::default();
        assert_eq!(bind_review_controls(view, &controls), 2);
        assert_eq!(bind_review_controls(view, &controls), 0);
        let list = view.find_by_id("review-question-list").expect("list");
        assert_eq!(list.listeners(), &[Listener::ReviewNavigation]);
    }

    #[test]
    fn back_control_binds_alongside_declarative_navigation() {
        let component = Component::view(ViewName::ReviewAnswers);
        let mut view = parse_fragment(
            r#"<section><button id="back-to-results" data-show-view="result">Back</button></section>"#,
        )
        .expect("view");
        assert_eq!(initialize(&component, &mut view), 1);
        assert_eq!(bind_review_controls(&mut view, &ReviewControls::default()), 1);
        assert_eq!(bind_review_controls(&mut view, &ReviewControls::default()), 0);
        assert_eq!(initialize(&component, &mut view), 0);

        let back = view.find_by_id("back-to-results").expect("back");
        assert_eq!(back.attr(NAV_BOUND_ATTR), Some("true"));
        assert_eq!(back.attr(REVIEW_BOUND_ATTR), Some("true"));
        assert_eq!(
            back.listeners(),
            &[
                Listener::ShowView(ViewName::Result),
                Listener::ShowView(ViewName::Result)
            ]
        );
    }

    #[test]
    fn slot_constructs_once() {
        let mut slot = ReviewSlot::default();
        assert!(!slot.is_constructed());
        assert!(slot.get_mut().is_none());
        let mut view = Element::new("section");
        let questions = vec![Question::default(), Question::default()];
        slot.get_or_create()
            .initialize(&TestResults::default(), &questions, &mut view);
        slot.get_or_create().load_review_question(1);
        assert!(slot.is_constructed());
    }

    #[test]
    fn cursor_ignores_out_of_range_questions() {
        let mut cursor = ReviewCursor::default();
        let mut view = Element::new("section");
        cursor.initialize(&TestResults::default(), &[Question::default()], &mut view);
        cursor.sidebar_open = true;
        cursor.load_review_question(4);
        cursor.close_sidebar();
        assert_eq!(cursor.current, Some(0));
        assert!(!cursor.sidebar_open);
    }
}
