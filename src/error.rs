use thiserror::Error;

use crate::view::ViewName;

/// Failures surfaced by the shell core.
///
/// Markup that yields no element and unconfigured collaborators are not errors:
/// both are logged and skipped where they occur.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to fetch component {name}: HTTP {status}")]
    Fetch { name: String, status: u16 },
    #[error("failed to fetch component {name}: {message}")]
    Transport { name: String, message: String },
    #[error("view element for {0} not found after reload")]
    MissingElement(ViewName),
    #[error("unknown view {0:?}")]
    UnknownView(String),
    #[error("component {0:?} is not in the manifest")]
    UnknownComponent(String),
    #[error("fragment worker failed: {0}")]
    Worker(String),
}

impl ShellError {
    /// True for failures of the fetch itself, which view loads recover from.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ShellError::Fetch { .. } | ShellError::Transport { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
