//! The shell: loads the manifest, mounts components, and moves between views.
//!
//! Bootstrap fetches every component concurrently and joins on all of them
//! before mounting anything. A view whose fetch fails is replaced by its
//! fallback placeholder; any other component failing aborts bootstrap.
//! After bootstrap, [`Orchestrator::show_view`] is the single entry point for
//! navigation, including navigation triggered by bound clicks.
use crate::activate::ViewActivator;
use crate::collab::ShellDeps;
use crate::config::ShellConfig;
use crate::dispatch::{dispatch, ActivationEffect, DispatchContext, Dispatched};
use crate::dom::{Container, NodePath};
use crate::error::{Result, ShellError};
use crate::events::{resolve_click, ClickAction};
use crate::fragments::{FragmentSource, FragmentStore};
use crate::mount::{fallback_markup, mount, Mounted};
use crate::review::{navigate_review, ReviewFactory, ReviewSlot};
use crate::view::{Component, ViewName};

pub struct Orchestrator {
    config: ShellConfig,
    store: FragmentStore,
    container: Container,
    activator: ViewActivator,
    deps: ShellDeps,
    review: ReviewSlot,
}

impl Orchestrator {
    pub fn new(config: ShellConfig, source: Box<dyn FragmentSource>, deps: ShellDeps) -> Self {
        let container = Container::new(&config.container_id);
        let activator = ViewActivator::new(&config.active_class);
        Self {
            config,
            store: FragmentStore::new(source),
            container,
            activator,
            deps,
            review: ReviewSlot::default(),
        }
    }

    /// Build with the fragment source the config names.
    pub fn from_config(config: ShellConfig, deps: ShellDeps) -> Self {
        let source = config.source.build();
        Self::new(config, source, deps)
    }

    /// Replace the review manager constructed on first review activation.
    pub fn with_review_factory(mut self, factory: ReviewFactory) -> Self {
        self.review = ReviewSlot::new(factory);
        self
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    pub fn current_view(&self) -> Option<ViewName> {
        self.activator.current()
    }

    /// Views currently carrying the active marker. Exactly one after any
    /// successful activation.
    pub fn marked_views(&self) -> Vec<ViewName> {
        self.activator.marked_views(&self.container)
    }

    pub fn review_constructed(&self) -> bool {
        self.review.is_constructed()
    }

    /// Load every manifest component, mount the mountable ones in manifest
    /// order, then activate the initial view.
    pub fn init(&mut self) -> Result<()> {
        let components = self.config.components.clone();
        let names: Vec<String> = components
            .iter()
            .map(|component| component.name.clone())
            .collect();
        tracing::info!(
            components = names.len(),
            source = %self.store.source_description(),
            "loading components"
        );

        let fetched = self.store.fetch_all(&names);
        let mut ready = Vec::with_capacity(fetched.len());
        for (component, (_, result)) in components.iter().zip(fetched) {
            match resolve_markup(component, result) {
                Ok(markup) => ready.push((component, markup)),
                Err(err) => {
                    tracing::error!(
                        component = component.name.as_str(),
                        error = %err,
                        "component load failed; startup abandoned"
                    );
                    return Err(err);
                }
            }
        }
        for (component, markup) in ready {
            self.mount_markup(component, &markup);
        }

        let initial = self.config.initial_view;
        self.show_view(initial)
    }

    /// Load (through the cache) and mount a single manifest component.
    /// Partials are loaded but not mounted and return `None`.
    pub fn load_component(&mut self, name: &str) -> Result<Option<Mounted>> {
        let component = self
            .config
            .component(name)
            .cloned()
            .ok_or_else(|| ShellError::UnknownComponent(name.to_string()))?;
        self.load_and_mount(&component)
    }

    fn load_and_mount(&mut self, component: &Component) -> Result<Option<Mounted>> {
        let markup = resolve_markup(component, self.store.load(&component.name))?;
        Ok(self.mount_markup(component, &markup))
    }

    fn mount_markup(&mut self, component: &Component, markup: &str) -> Option<Mounted> {
        let mounted = mount(&mut self.container, component, markup)?;
        if let Some(view) = component.view_name() {
            self.activator
                .sync_marker(&mut self.container, view, &mounted.path);
        }
        Some(mounted)
    }

    /// Activate `target`. A missing view element triggers one reload of its
    /// component; if the element is still missing the activation is abandoned
    /// and nothing changes.
    pub fn show_view(&mut self, target: ViewName) -> Result<()> {
        let path = match self.activator.locate(&self.container, target) {
            Some(path) => path,
            None => self.recover_view(target)?,
        };
        if !self.activator.apply(&mut self.container, target, &path) {
            return Err(ShellError::MissingElement(target));
        }
        tracing::info!(view = %target, "view activated");

        let effect = ActivationEffect::for_view(target);
        let Some(element) = self.container.get_mut(&path) else {
            return Ok(());
        };
        let handled = dispatch(
            effect,
            DispatchContext {
                deps: &self.deps,
                review: &mut self.review,
                controls: &self.config.review,
            },
            element,
        );
        if handled == Dispatched::Skipped && effect != ActivationEffect::Nothing {
            tracing::debug!(view = %target, ?effect, "activation effect skipped");
        }
        Ok(())
    }

    /// `show_view` by name, for callers holding strings.
    pub fn show_view_named(&mut self, name: &str) -> Result<()> {
        let view = name.parse()?;
        self.show_view(view)
    }

    fn recover_view(&mut self, target: ViewName) -> Result<NodePath> {
        tracing::warn!(view = %target, "view element missing; reloading component");
        let component = self.config.view_component(target);
        if let Err(err) = self.load_and_mount(&component) {
            tracing::warn!(view = %target, error = %err, "view reload failed");
        }
        match self.activator.locate(&self.container, target) {
            Some(path) => Ok(path),
            None => {
                tracing::error!(view = %target, "view element still missing; activation abandoned");
                Err(ShellError::MissingElement(target))
            }
        }
    }

    /// Deliver a click at `target`. Returns the actions that fired. Failures of
    /// triggered navigation are logged, never propagated.
    pub fn click(&mut self, target: &NodePath) -> Vec<ClickAction> {
        let actions = resolve_click(&self.container, target);
        for action in &actions {
            match *action {
                ClickAction::ShowView(view) => {
                    if let Err(err) = self.show_view(view) {
                        tracing::error!(view = %view, error = %err, "navigation failed");
                    }
                }
                ClickAction::ReviewQuestion(index) => {
                    navigate_review(&self.deps, &mut self.review, index);
                }
            }
        }
        actions
    }

    /// Click the element with `id`, if mounted.
    pub fn click_id(&mut self, id: &str) -> Vec<ClickAction> {
        match self.container.path_of_id(id) {
            Some(path) => self.click(&path),
            None => Vec::new(),
        }
    }
}

/// Turn a fetch result into mountable markup. View fetch failures fall back
/// to a placeholder; everything else propagates.
fn resolve_markup(component: &Component, fetched: Result<String>) -> Result<String> {
    match fetched {
        Ok(markup) => Ok(markup),
        Err(err) if err.is_fetch_failure() => match component.view_name() {
            Some(view) => {
                tracing::warn!(
                    component = component.name.as_str(),
                    error = %err,
                    "using fallback view"
                );
                Ok(fallback_markup(view))
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
