//! The closed set of quiz views and the component manifest entries that feed them.
//!
//! Every view is backed by exactly one view component named `<view>-view`; the
//! mounted root element of that component carries the same string as its id.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShellError;

/// Top-level views of the quiz shell. Exactly one is active after bootstrap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewName {
    /// Entry screen before a test starts.
    Landing,
    /// Question-by-question test screen.
    Test,
    /// Score summary after submission.
    Result,
    /// Per-question walkthrough of submitted answers.
    ReviewAnswers,
}

impl ViewName {
    pub const ALL: [ViewName; 4] = [
        ViewName::Landing,
        ViewName::Test,
        ViewName::Result,
        ViewName::ReviewAnswers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Landing => "landing",
            ViewName::Test => "test",
            ViewName::Result => "result",
            ViewName::ReviewAnswers => "review-answers",
        }
    }

    /// Human-readable title, used by the fallback placeholder.
    pub fn label(self) -> &'static str {
        match self {
            ViewName::Landing => "Welcome",
            ViewName::Test => "Test",
            ViewName::Result => "Results",
            ViewName::ReviewAnswers => "Review Answers",
        }
    }

    /// Name of the fragment component that renders this view.
    pub fn component_name(self) -> String {
        format!("{}-view", self.as_str())
    }

    /// Id carried by the mounted root element of this view.
    pub fn element_id(self) -> String {
        self.component_name()
    }

    /// Resolve a `<view>-view` component name back to its view.
    pub fn from_component_name(name: &str) -> Option<ViewName> {
        let view = name.strip_suffix("-view")?;
        view.parse().ok()
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewName::ALL
            .iter()
            .copied()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| ShellError::UnknownView(s.to_string()))
    }
}

/// Declared role of a manifest entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentRole {
    View,
    Panel,
    Partial,
}

/// Resolved kind of a component, used to decide whether and how it mounts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// Mounted, id assigned from the component name when absent.
    View(ViewName),
    /// Mounted with whatever id its markup carries.
    Panel,
    /// Fetched and cached only.
    Partial,
}

/// One entry of the fragment manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub role: ComponentRole,
}

impl Component {
    pub fn view(view: ViewName) -> Self {
        Self {
            name: view.component_name(),
            role: ComponentRole::View,
        }
    }

    pub fn panel(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: ComponentRole::Panel,
        }
    }

    pub fn partial(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: ComponentRole::Partial,
        }
    }

    /// Resolve the role against the view set. A `view` entry whose name does not
    /// resolve is rejected by config validation, so it is treated as a panel here.
    pub fn kind(&self) -> ComponentKind {
        match self.role {
            ComponentRole::View => match ViewName::from_component_name(&self.name) {
                Some(view) => ComponentKind::View(view),
                None => ComponentKind::Panel,
            },
            ComponentRole::Panel => ComponentKind::Panel,
            ComponentRole::Partial => ComponentKind::Partial,
        }
    }

    pub fn view_name(&self) -> Option<ViewName> {
        match self.kind() {
            ComponentKind::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_mountable(&self) -> bool {
        !matches!(self.kind(), ComponentKind::Partial)
    }
}
