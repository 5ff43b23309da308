//! View orchestration core for a single-page quiz shell.
//!
//! Fragments are fetched by name and memoized ([`fragments`]), parsed and
//! mounted into one root container ([`mount`]), and exactly one view is marked
//! active at a time ([`activate`]). Activating a view notifies the injected
//! collaborators ([`dispatch`]); the review view additionally gets delegated
//! sidebar navigation ([`review`]). [`Orchestrator`] ties these together.
pub mod activate;
pub mod collab;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod events;
pub mod fragments;
pub mod markup;
pub mod mount;
pub mod orchestrator;
pub mod review;
pub mod view;

pub use collab::{Question, QuestionSource, ShellDeps, StateSource, TestResults, TestSource};
pub use config::ShellConfig;
pub use dom::{Container, Element, NodePath};
pub use error::ShellError;
pub use events::ClickAction;
pub use fragments::{FragmentSource, FragmentStore};
pub use orchestrator::Orchestrator;
pub use review::{ReviewFactory, ReviewManager};
pub use view::{Component, ViewName};
