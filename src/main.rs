use anyhow::{anyhow, Context, Result};
use clap::Parser;
use quizshell::collab::StaticQuiz;
use quizshell::config::{default_config, default_config_path, load_config};
use quizshell::{NodePath, Orchestrator, ShellConfig, ShellDeps};
use std::path::Path;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Command, FetchArgs, RenderArgs, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_logging(args.verbose);
    let config = resolve_config(args.config.as_deref())?;

    match args.command {
        Command::Render(render) => cmd_render(config, render),
        Command::Fetch(fetch) => cmd_fetch(config, fetch),
        Command::Config => {
            let text = serde_json::to_string_pretty(&config).context("serialize config")?;
            println!("{text}");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(explicit: Option<&Path>) -> Result<ShellConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(default_config()),
    }
}

fn cmd_render(config: ShellConfig, args: RenderArgs) -> Result<()> {
    let quiz = Rc::new(
        StaticQuiz::from_files(args.results.as_deref(), args.questions.as_deref())
            .context("load quiz data")?,
    );
    let deps = ShellDeps::new()
        .with_state(quiz.clone())
        .with_questions(quiz.clone());
    let mut shell = Orchestrator::from_config(config, deps);
    shell.init().context("bootstrap shell")?;

    if let Some(view) = args.view {
        shell
            .show_view(view)
            .with_context(|| format!("activate {view}"))?;
    }
    for target in &args.click {
        let path = click_target(&shell, target)?;
        let actions = shell.click(&path);
        tracing::info!(click = target.as_str(), ?actions, "click delivered");
    }

    println!("{}", shell.container().render());
    if let Some(index) = quiz.review_index() {
        eprintln!("review question: {index}");
    }
    Ok(())
}

/// `ID[/N...]`: element with ID, then element-child indices below it.
fn click_target(shell: &Orchestrator, raw: &str) -> Result<NodePath> {
    let mut parts = raw.split('/');
    let id = parts.next().unwrap_or_default();
    let mut path = shell
        .container()
        .path_of_id(id)
        .ok_or_else(|| anyhow!("no mounted element with id {id:?}"))?;
    for part in parts {
        let index: usize = part
            .parse()
            .with_context(|| format!("parse child index {part:?} in {raw:?}"))?;
        path = path.child(index);
    }
    if shell.container().get(&path).is_none() {
        return Err(anyhow!("click target {raw:?} does not exist"));
    }
    Ok(path)
}

fn cmd_fetch(config: ShellConfig, args: FetchArgs) -> Result<()> {
    let shell = Orchestrator::from_config(config, ShellDeps::new());
    let markup = shell
        .store()
        .load(&args.name)
        .with_context(|| format!("fetch {}", args.name))?;
    println!("{markup}");
    Ok(())
}
