//! CLI argument parsing for the quiz shell harness.
//!
//! The binary drives the same [`quizshell::Orchestrator`] a host page would,
//! then prints the resulting container markup so a fragment set can be
//! checked without a browser.
use clap::{ArgAction, Parser, Subcommand};
use quizshell::ViewName;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quizshell",
    version,
    about = "Load quiz view fragments, mount them and switch views headlessly",
    after_help = "Examples:\n  quizshell --config site/quizshell.json render\n  quizshell render --view result --results results.json\n  quizshell render --view review-answers --questions q.json --results r.json --click review-question-list/2\n  quizshell fetch landing-view",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Shell config JSON (defaults to the per-user config, then built-in defaults)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Render(RenderArgs),
    Fetch(FetchArgs),
    /// Print the effective config as JSON
    Config,
}

#[derive(Parser, Debug)]
#[command(about = "Bootstrap the shell and print the mounted container")]
pub struct RenderArgs {
    /// View to activate after bootstrap
    #[arg(long, value_name = "VIEW")]
    pub view: Option<ViewName>,

    /// Test results JSON for the state collaborator
    #[arg(long, value_name = "PATH")]
    pub results: Option<PathBuf>,

    /// Questions JSON for the question collaborator
    #[arg(long, value_name = "PATH")]
    pub questions: Option<PathBuf>,

    /// Click an element: ID, optionally followed by /N child indices
    #[arg(long, value_name = "TARGET")]
    pub click: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Fetch a single component fragment and print it")]
pub struct FetchArgs {
    /// Component name from the manifest
    pub name: String,
}
