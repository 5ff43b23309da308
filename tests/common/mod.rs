//! Shared test infrastructure for shell integration tests.
#![allow(dead_code)]

use quizshell::config::default_config;
use quizshell::{
    FragmentSource, Orchestrator, Question, QuestionSource, ReviewFactory, ReviewManager,
    ShellDeps, ShellError, StateSource, TestResults, TestSource,
};
use quizshell::{Element, ViewName};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

pub const LANDING: &str = r#"<section class="view"><h1>Quiz</h1><button id="start-test" data-show-view="test">Start</button></section>"#;
pub const TEST: &str = r#"<section class="view"><div id="question-host"></div><button id="submit-test" data-show-view="result">Submit</button></section>"#;
pub const RESULT: &str = r#"<section class="view"><p id="score"></p><button id="open-review" data-show-view="review-answers">Review answers</button></section>"#;
pub const REVIEW: &str = r#"<section class="view">
  <button id="back-to-results">Back to results</button>
  <aside class="sidebar open">
    <ul id="review-question-list">
      <li><span>Question 1</span></li>
      <li><span>Question 2</span></li>
      <li><span>Question 3</span></li>
    </ul>
  </aside>
  <div id="review-body"></div>
</section>"#;
pub const MODAL: &str = r#"<div id="confirm-modal" class="modal" hidden></div>"#;
pub const CARD: &str = r#"<article class="question-card"></article>"#;

/// Fragments served from memory. Clones share state, so a test can keep one
/// handle while the shell owns another.
#[derive(Clone, Default)]
pub struct MemorySite {
    markup: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<HashMap<String, u16>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MemorySite {
    pub fn standard() -> Self {
        let site = Self::default();
        site.set("landing-view", LANDING);
        site.set("test-view", TEST);
        site.set("result-view", RESULT);
        site.set("review-answers-view", REVIEW);
        site.set("confirm-modal", MODAL);
        site.set("question-card", CARD);
        site
    }

    pub fn set(&self, name: &str, markup: &str) {
        self.markup
            .lock()
            .expect("markup lock")
            .insert(name.to_string(), markup.to_string());
    }

    pub fn fail(&self, name: &str, status: u16) {
        self.failures
            .lock()
            .expect("failures lock")
            .insert(name.to_string(), status);
    }

    pub fn heal(&self, name: &str) {
        self.failures.lock().expect("failures lock").remove(name);
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|call| call.as_str() == name)
            .count()
    }

    pub fn source(&self) -> Box<dyn FragmentSource> {
        Box::new(self.clone())
    }
}

impl FragmentSource for MemorySite {
    fn fetch(&self, name: &str) -> Result<String, ShellError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(name.to_string());
        if let Some(status) = self.failures.lock().expect("failures lock").get(name) {
            return Err(ShellError::Fetch {
                name: name.to_string(),
                status: *status,
            });
        }
        self.markup
            .lock()
            .expect("markup lock")
            .get(name)
            .cloned()
            .ok_or_else(|| ShellError::Fetch {
                name: name.to_string(),
                status: 404,
            })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Test screen that records which hooks ran.
#[derive(Default)]
pub struct RecordingTest {
    calls: RefCell<Vec<String>>,
    pub handles_review: bool,
}

impl RecordingTest {
    /// A test screen that owns review initialization itself.
    pub fn handling_review() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            handles_review: true,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl TestSource for RecordingTest {
    fn update_question_display(&self) {
        self.calls.borrow_mut().push("update_question_display".to_string());
    }

    fn calculate_results(&self) {
        self.calls.borrow_mut().push("calculate_results".to_string());
    }

    fn initialize_review(&self, view: &mut Element) -> bool {
        self.calls
            .borrow_mut()
            .push(format!("initialize_review:{}", view.id().unwrap_or_default()));
        self.handles_review
    }
}

/// Quiz state and question bank in one, recording review position updates.
pub struct RecordingState {
    results: TestResults,
    questions: Vec<Question>,
    pub review_indices: RefCell<Vec<usize>>,
}

impl RecordingState {
    pub fn with_questions(count: usize) -> Self {
        let questions = (0..count)
            .map(|index| Question {
                id: format!("q{}", index + 1),
                prompt: format!("Question {}", index + 1),
                options: vec!["yes".to_string(), "no".to_string()],
                answer: 0,
            })
            .collect::<Vec<_>>();
        Self {
            results: TestResults {
                answers: vec![Some(0); count],
                score: count as u32,
                total: count as u32,
            },
            questions,
            review_indices: RefCell::new(Vec::new()),
        }
    }
}

impl StateSource for RecordingState {
    fn test_results(&self) -> TestResults {
        self.results.clone()
    }

    fn set_review_current_question(&self, index: usize) {
        self.review_indices.borrow_mut().push(index);
    }
}

impl QuestionSource for RecordingState {
    fn questions(&self) -> Vec<Question> {
        self.questions.clone()
    }
}

pub type ReviewLog = Rc<RefCell<Vec<String>>>;

/// Review manager writing every call into a shared log.
pub struct RecordingReview {
    log: ReviewLog,
}

impl ReviewManager for RecordingReview {
    fn initialize(&mut self, results: &TestResults, questions: &[Question], view: &mut Element) {
        self.log.borrow_mut().push(format!(
            "initialize:{}:{}:{}",
            results.total,
            questions.len(),
            view.id().unwrap_or_default()
        ));
    }

    fn load_review_question(&mut self, index: usize) {
        self.log.borrow_mut().push(format!("load:{index}"));
    }

    fn close_sidebar(&mut self) {
        self.log.borrow_mut().push("close_sidebar".to_string());
    }
}

pub fn review_factory(log: ReviewLog, constructed: Rc<RefCell<usize>>) -> ReviewFactory {
    Box::new(move || -> Box<dyn ReviewManager> {
        *constructed.borrow_mut() += 1;
        Box::new(RecordingReview { log: log.clone() })
    })
}

/// A shell wired to recording collaborators.
pub struct Harness {
    pub site: MemorySite,
    pub test: Rc<RecordingTest>,
    pub state: Rc<RecordingState>,
    pub review_log: ReviewLog,
    pub reviews_constructed: Rc<RefCell<usize>>,
    pub shell: Orchestrator,
}

impl Harness {
    pub fn new(site: MemorySite) -> Self {
        let test = Rc::new(RecordingTest::default());
        let state = Rc::new(RecordingState::with_questions(3));
        let deps = ShellDeps::new()
            .with_state(state.clone())
            .with_questions(state.clone())
            .with_test(test.clone());
        Self::with_deps(site, test, state, deps)
    }

    pub fn with_deps(
        site: MemorySite,
        test: Rc<RecordingTest>,
        state: Rc<RecordingState>,
        deps: ShellDeps,
    ) -> Self {
        let review_log: ReviewLog = Rc::new(RefCell::new(Vec::new()));
        let reviews_constructed = Rc::new(RefCell::new(0));
        let shell = Orchestrator::new(default_config(), site.source(), deps)
            .with_review_factory(review_factory(review_log.clone(), reviews_constructed.clone()));
        Self {
            site,
            test,
            state,
            review_log,
            reviews_constructed,
            shell,
        }
    }

    pub fn booted() -> Self {
        let mut harness = Self::new(MemorySite::standard());
        harness.shell.init().expect("bootstrap");
        harness
    }

    pub fn review_log(&self) -> Vec<String> {
        self.review_log.borrow().clone()
    }

    pub fn assert_only_active(&self, view: ViewName) {
        assert_eq!(self.shell.current_view(), Some(view));
        assert_eq!(self.shell.marked_views(), vec![view]);
    }
}
