//! Fragment Store: fetches raw component markup by name and memoizes it.
//!
//! A successful fetch is cached for the lifetime of the store and never issued
//! again; a failed fetch leaves the cache untouched so the next load retries.
//! Concurrent loads of the same uncached name are not coalesced.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::{Result, ShellError};

/// Directory, relative to the site root, that holds component fragments.
pub const COMPONENTS_DIR: &str = "components";

/// Deterministic resource path for a component.
pub fn component_path(name: &str) -> String {
    format!("{COMPONENTS_DIR}/{name}.html")
}

/// Where fragment markup comes from.
pub trait FragmentSource: Send + Sync {
    /// Fetch the markup for `name`. Non-success responses map to
    /// [`ShellError::Fetch`] carrying the status code.
    fn fetch(&self, name: &str) -> Result<String>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Fetches fragments over HTTP from `<base_url>/components/<name>.html`.
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, component_path(name))
    }
}

impl FragmentSource for HttpSource {
    fn fetch(&self, name: &str) -> Result<String> {
        let url = self.url_for(name);
        let mut response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(ShellError::Fetch {
                    name: name.to_string(),
                    status,
                })
            }
            Err(err) => {
                return Err(ShellError::Transport {
                    name: name.to_string(),
                    message: err.to_string(),
                })
            }
        };
        let status = response.status();
        if !status.is_success() {
            return Err(ShellError::Fetch {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .body_mut()
            .read_to_string()
            .map_err(|err| ShellError::Transport {
                name: name.to_string(),
                message: err.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads fragments from `<root>/components/<name>.html` on disk. A missing file
/// reports as HTTP 404 so callers see the same failure shape as over the wire.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(component_path(name))
    }
}

impl FragmentSource for DirSource {
    fn fetch(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ShellError::Fetch {
                name: name.to_string(),
                status: 404,
            },
            std::io::ErrorKind::PermissionDenied => ShellError::Fetch {
                name: name.to_string(),
                status: 403,
            },
            _ => ShellError::Transport {
                name: name.to_string(),
                message: format!("read {}: {err}", path.display()),
            },
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Memoizing front for a [`FragmentSource`].
pub struct FragmentStore {
    source: Box<dyn FragmentSource>,
    cache: Mutex<HashMap<String, String>>,
    fetches: AtomicUsize,
}

impl FragmentStore {
    pub fn new(source: Box<dyn FragmentSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the markup for `name`, fetching only on a cache miss.
    pub fn load(&self, name: &str) -> Result<String> {
        if let Some(markup) = self.cached(name) {
            tracing::debug!(component = name, "fragment cache hit");
            return Ok(markup);
        }

        let start = Instant::now();
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let markup = match self.source.fetch(name) {
            Ok(markup) => markup,
            Err(err) => {
                tracing::debug!(component = name, error = %err, "fragment fetch failed");
                return Err(err);
            }
        };
        tracing::info!(
            component = name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = markup.len(),
            "fragment fetch complete"
        );

        self.cache().insert(name.to_string(), markup.clone());
        Ok(markup)
    }

    /// Load every name concurrently and wait for all of them. Results come back
    /// in input order; one failure does not cancel the other fetches.
    pub fn fetch_all(&self, names: &[String]) -> Vec<(String, Result<String>)> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = names
                .iter()
                .map(|name| (name, scope.spawn(move || self.load(name))))
                .collect();
            handles
                .into_iter()
                .map(|(name, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(ShellError::Worker(format!("fetch of {name} panicked")))
                    });
                    (name.clone(), result)
                })
                .collect()
        })
    }

    pub fn cached(&self, name: &str) -> Option<String> {
        self.cache().get(name).cloned()
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache().contains_key(name)
    }

    /// Number of fetches issued against the source so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}
