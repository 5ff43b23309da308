//! Collaborators the shell talks to but does not own: quiz state, the question
//! bank and the test screen. They are injected explicitly through [`ShellDeps`];
//! an absent collaborator is a configuration gap, checked before use.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use crate::dom::Element;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer: usize,
}

/// Outcome of a submitted test, one slot per question.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResults {
    #[serde(default)]
    pub answers: Vec<Option<usize>>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub total: u32,
}

/// Source of truth for past answers and review position.
pub trait StateSource {
    fn test_results(&self) -> TestResults;
    fn set_review_current_question(&self, index: usize);
}

/// Source of truth for question content.
pub trait QuestionSource {
    fn questions(&self) -> Vec<Question>;
}

/// The test screen. Every method is optional: the defaults do nothing, and
/// `initialize_review` reports `false` to say review is not handled here.
pub trait TestSource {
    fn update_question_display(&self) {}

    fn calculate_results(&self) {}

    fn initialize_review(&self, _view: &mut Element) -> bool {
        false
    }
}

/// Explicitly injected collaborators. `None` means "not configured".
#[derive(Clone, Default)]
pub struct ShellDeps {
    pub state: Option<Rc<dyn StateSource>>,
    pub questions: Option<Rc<dyn QuestionSource>>,
    pub test: Option<Rc<dyn TestSource>>,
}

impl ShellDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: Rc<dyn StateSource>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_questions(mut self, questions: Rc<dyn QuestionSource>) -> Self {
        self.questions = Some(questions);
        self
    }

    pub fn with_test(mut self, test: Rc<dyn TestSource>) -> Self {
        self.test = Some(test);
        self
    }
}

/// Fixed results and questions, typically loaded from JSON files. Serves as
/// both state and question collaborator and remembers the review position.
#[derive(Debug, Default)]
pub struct StaticQuiz {
    results: TestResults,
    questions: Vec<Question>,
    review_index: Cell<Option<usize>>,
}

impl StaticQuiz {
    pub fn new(results: TestResults, questions: Vec<Question>) -> Self {
        Self {
            results,
            questions,
            review_index: Cell::new(None),
        }
    }

    /// Load from optional JSON files; a missing path yields empty data.
    pub fn from_files(results: Option<&Path>, questions: Option<&Path>) -> Result<Self> {
        let results = match results {
            Some(path) => read_json(path).context("load test results")?,
            None => TestResults::default(),
        };
        let questions = match questions {
            Some(path) => read_json(path).context("load questions")?,
            None => Vec::new(),
        };
        Ok(Self::new(results, questions))
    }

    pub fn review_index(&self) -> Option<usize> {
        self.review_index.get()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

impl StateSource for StaticQuiz {
    fn test_results(&self) -> TestResults {
        self.results.clone()
    }

    fn set_review_current_question(&self, index: usize) {
        self.review_index.set(Some(index));
    }
}

impl QuestionSource for StaticQuiz {
    fn questions(&self) -> Vec<Question> {
        self.questions.clone()
    }
}
