//! Shell configuration: where fragments come from, what the manifest holds and
//! which ids and classes the shell relies on.
//!
//! Config is plain JSON. Relative `dir` source roots resolve against the
//! directory holding the config file.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fragments::{DirSource, FragmentSource, HttpSource};
use crate::review::ReviewControls;
use crate::view::{Component, ComponentRole, ViewName};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Http { base_url: String },
    Dir { root: PathBuf },
}

impl SourceConfig {
    pub fn build(&self) -> Box<dyn FragmentSource> {
        match self {
            SourceConfig::Http { base_url } => Box::new(HttpSource::new(base_url)),
            SourceConfig::Dir { root } => Box::new(DirSource::new(root)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    pub schema_version: u32,
    pub container_id: String,
    pub active_class: String,
    pub initial_view: ViewName,
    pub source: SourceConfig,
    pub components: Vec<Component>,
    #[serde(default)]
    pub review: ReviewControls,
}

impl ShellConfig {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.name == name)
    }

    /// Manifest entry for `view`, or the conventional one if the manifest lacks it.
    pub fn view_component(&self, view: ViewName) -> Component {
        self.component(&view.component_name())
            .cloned()
            .unwrap_or_else(|| Component::view(view))
    }
}

/// Default manifest: the four views plus one panel and one partial.
pub fn default_components() -> Vec<Component> {
    let mut components: Vec<Component> = ViewName::ALL
        .iter()
        .map(|view| Component::view(*view))
        .collect();
    components.push(Component::panel("confirm-modal"));
    components.push(Component::partial("question-card"));
    components
}

pub fn default_config() -> ShellConfig {
    ShellConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        container_id: "app".to_string(),
        active_class: "active".to_string(),
        initial_view: ViewName::Landing,
        source: SourceConfig::Dir {
            root: PathBuf::from("."),
        },
        components: default_components(),
        review: ReviewControls::default(),
    }
}

/// Per-user config location, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quizshell").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<ShellConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: ShellConfig =
        serde_json::from_slice(&bytes).context("parse shell config JSON")?;
    if let SourceConfig::Dir { root } = &mut config.source {
        if root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            *root = base.join(&*root);
        }
    }
    validate_config(&config)?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &ShellConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create config dir")?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize shell config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &ShellConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported shell config schema_version {}",
            config.schema_version
        ));
    }
    if config.container_id.trim().is_empty() {
        return Err(anyhow!("container_id must be non-empty"));
    }
    if config.active_class.trim().is_empty()
        || config.active_class.contains(char::is_whitespace)
    {
        return Err(anyhow!(
            "active_class must be a single class name (got {:?})",
            config.active_class
        ));
    }
    match &config.source {
        SourceConfig::Http { base_url } if base_url.trim().is_empty() => {
            return Err(anyhow!("http source needs a base_url"));
        }
        SourceConfig::Dir { root } if root.as_os_str().is_empty() => {
            return Err(anyhow!("dir source needs a root"));
        }
        _ => {}
    }

    let mut seen = HashSet::new();
    for component in &config.components {
        if component.name.trim().is_empty() {
            return Err(anyhow!("component names must be non-empty"));
        }
        if !seen.insert(component.name.as_str()) {
            return Err(anyhow!("duplicate component {:?}", component.name));
        }
        if component.role == ComponentRole::View && component.view_name().is_none() {
            return Err(anyhow!(
                "view component {:?} must be named <view>-view for a known view",
                component.name
            ));
        }
    }
    for view in ViewName::ALL {
        let present = config
            .components
            .iter()
            .any(|component| component.view_name() == Some(view));
        if !present {
            return Err(anyhow!(
                "manifest is missing the {} component",
                view.component_name()
            ));
        }
    }
    Ok(())
}
