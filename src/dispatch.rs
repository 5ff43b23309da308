//! Activation Dispatcher: what happens after a view becomes active.
//!
//! | view | effect |
//! |------|--------|
//! | landing | nothing |
//! | test | test collaborator refreshes its question display |
//! | result | test collaborator computes and renders results |
//! | review-answers | test collaborator's review hook, else the shell's own review manager |
//!
//! Every effect is best-effort: an unconfigured collaborator is skipped.
use crate::collab::ShellDeps;
use crate::dom::Element;
use crate::review::{initialize_review, ReviewControls, ReviewSlot};
use crate::view::ViewName;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActivationEffect {
    Nothing,
    RefreshQuestionDisplay,
    CalculateResults,
    InitializeReview,
}

impl ActivationEffect {
    pub fn for_view(view: ViewName) -> Self {
        match view {
            ViewName::Landing => ActivationEffect::Nothing,
            ViewName::Test => ActivationEffect::RefreshQuestionDisplay,
            ViewName::Result => ActivationEffect::CalculateResults,
            ViewName::ReviewAnswers => ActivationEffect::InitializeReview,
        }
    }
}

/// Who ended up handling an effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    Skipped,
    TestCollaborator,
    ReviewManager,
}

/// Everything the dispatcher may touch besides the activated element.
pub struct DispatchContext<'a> {
    pub deps: &'a ShellDeps,
    pub review: &'a mut ReviewSlot,
    pub controls: &'a ReviewControls,
}

pub fn dispatch(
    effect: ActivationEffect,
    cx: DispatchContext<'_>,
    view: &mut Element,
) -> Dispatched {
    match effect {
        ActivationEffect::Nothing => Dispatched::Skipped,
        ActivationEffect::RefreshQuestionDisplay => match &cx.deps.test {
            Some(test) => {
                test.update_question_display();
                Dispatched::TestCollaborator
            }
            None => not_configured(effect),
        },
        ActivationEffect::CalculateResults => match &cx.deps.test {
            Some(test) => {
                test.calculate_results();
                Dispatched::TestCollaborator
            }
            None => not_configured(effect),
        },
        ActivationEffect::InitializeReview => {
            if let Some(test) = &cx.deps.test {
                if test.initialize_review(view) {
                    return Dispatched::TestCollaborator;
                }
            }
            if initialize_review(cx.deps, cx.review, cx.controls, view) {
                Dispatched::ReviewManager
            } else {
                Dispatched::Skipped
            }
        }
    }
}

fn not_configured(effect: ActivationEffect) -> Dispatched {
    tracing::debug!(?effect, "test collaborator not configured");
    Dispatched::Skipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::TestSource;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
        handles_review: bool,
    }

    impl TestSource for Recorder {
        fn update_question_display(&self) {
            self.calls.borrow_mut().push("update");
        }

        fn calculate_results(&self) {
            self.calls.borrow_mut().push("calculate");
        }

        fn initialize_review(&self, _view: &mut Element) -> bool {
            self.calls.borrow_mut().push("review");
            self.handles_review
        }
    }

    fn run(effect: ActivationEffect, deps: &ShellDeps, slot: &mut ReviewSlot) -> Dispatched {
        let controls = ReviewControls::default();
        let mut view = Element::new("section");
        dispatch(
            effect,
            DispatchContext {
                deps,
                review: slot,
                controls: &controls,
            },
            &mut view,
        )
    }

    #[test]
    fn mapping_is_exhaustive_and_distinct() {
        let effects: Vec<ActivationEffect> = ViewName::ALL
            .iter()
            .map(|view| ActivationEffect::for_view(*view))
            .collect();
        assert_eq!(
            effects,
            vec![
                ActivationEffect::Nothing,
                ActivationEffect::RefreshQuestionDisplay,
                ActivationEffect::CalculateResults,
                ActivationEffect::InitializeReview,
            ]
        );
    }

    #[test]
    fn each_effect_calls_only_its_method() {
        let recorder = Rc::new(Recorder::default());
        let deps = ShellDeps::new().with_test(recorder.clone());
        let mut slot = ReviewSlot::default();

        run(ActivationEffect::RefreshQuestionDisplay, &deps, &mut slot);
        assert_eq!(*recorder.calls.borrow(), vec!["update"]);
        recorder.calls.borrow_mut().clear();

        run(ActivationEffect::CalculateResults, &deps, &mut slot);
        assert_eq!(*recorder.calls.borrow(), vec!["calculate"]);
        recorder.calls.borrow_mut().clear();

        assert_eq!(
            run(ActivationEffect::Nothing, &deps, &mut slot),
            Dispatched::Skipped
        );
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn review_prefers_test_collaborator_hook() {
        let recorder = Rc::new(Recorder {
            handles_review: true,
            ..Recorder::default()
        });
        let deps = ShellDeps::new().with_test(recorder.clone());
        let mut slot = ReviewSlot::default();
        assert_eq!(
            run(ActivationEffect::InitializeReview, &deps, &mut slot),
            Dispatched::TestCollaborator
        );
        assert!(!slot.is_constructed());
    }

    #[test]
    fn review_without_state_or_questions_is_skipped() {
        let recorder = Rc::new(Recorder::default());
        let deps = ShellDeps::new().with_test(recorder.clone());
        let mut slot = ReviewSlot::default();
        assert_eq!(
            run(ActivationEffect::InitializeReview, &deps, &mut slot),
            Dispatched::Skipped
        );
        assert_eq!(*recorder.calls.borrow(), vec!["review"]);
        assert!(!slot.is_constructed());
    }

    #[test]
    fn missing_test_collaborator_is_not_an_error() {
        let deps = ShellDeps::new();
        let mut slot = ReviewSlot::default();
        assert_eq!(
            run(ActivationEffect::CalculateResults, &deps, &mut slot),
            Dispatched::Skipped
        );
    }
}
