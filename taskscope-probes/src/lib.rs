//! # Probe Catalog
//!
//! Named, zero-argument units of concurrent work exercised by the taskscope
//! analyzer. Each probe demonstrates one Tokio concurrency pattern (channels,
//! join sets, select, fan-in, bounded parallelism) and joins everything it
//! spawns before its future resolves.
//!
//! The one exception is [`patterns::leaky_spawn`], which deliberately leaves
//! tasks behind so the analyzer's leak detection has something to catch.
//!
//! ## Key Types
//!
//! - [`Probe`] - A name plus an async action
//! - [`ProbeCatalog`] - An ordered, name-unique sequence of probes
//! - [`CatalogError`] - Duplicate or unknown probe names

pub mod fetch;
pub mod patterns;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Future returned by a probe action.
pub type ProbeFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Type-erased probe action. Each call starts a fresh run of the probe.
pub type ProbeAction = Arc<dyn Fn() -> ProbeFuture + Send + Sync>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Probe '{0}' is already registered")]
    DuplicateProbe(String),

    #[error("No probe named '{0}' in the catalog")]
    UnknownProbe(String),
}

/// A named unit of work.
///
/// Cloning is cheap: the action is shared behind an `Arc`.
#[derive(Clone)]
pub struct Probe {
    name: String,
    action: ProbeAction,
}

impl Probe {
    pub fn new<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self { name: name.into(), action: Arc::new(move || Box::pin(action())) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start one run of the probe. The returned future resolves once the
    /// probe has settled.
    #[must_use]
    pub fn start(&self) -> ProbeFuture {
        (self.action)()
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Ordered collection of probes with unique names.
///
/// Iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct ProbeCatalog {
    probes: Vec<Probe>,
}

impl ProbeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard battery of concurrency patterns, in execution order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            probes: vec![
                Probe::new("simple_task", patterns::simple_task),
                Probe::new("join_set", patterns::join_set),
                Probe::new("channel_param", patterns::channel_param),
                Probe::new("return_channel", patterns::return_channel),
                Probe::new("with_range", patterns::with_range),
                Probe::new("with_select", patterns::with_select),
                Probe::new("with_try_join", patterns::with_try_join),
                Probe::new("merge_channels", patterns::merge_channels),
                Probe::new("bounded_fetch", patterns::bounded_fetch),
                Probe::new("run_tasks", patterns::run_tasks),
            ],
        }
    }

    /// Probe that leaves [`patterns::LEAKED_TASKS`] tasks running forever.
    #[must_use]
    pub fn leaky_probe() -> Probe {
        Probe::new("leaky_spawn", patterns::leaky_spawn)
    }

    /// Append a probe.
    ///
    /// # Errors
    /// Returns `CatalogError::DuplicateProbe` if the name is already taken.
    pub fn register(&mut self, probe: Probe) -> Result<&mut Self, CatalogError> {
        if self.get(probe.name()).is_some() {
            return Err(CatalogError::DuplicateProbe(probe.name));
        }
        self.probes.push(probe);
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Probe> {
        self.probes.iter().find(|p| p.name == name)
    }

    /// Build a sub-catalog holding only `names`, in the order given.
    ///
    /// # Errors
    /// Returns `CatalogError::UnknownProbe` for the first name not present and
    /// `CatalogError::DuplicateProbe` if a name is listed twice.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, CatalogError> {
        let mut selected = Self::new();
        for name in names {
            let name = name.as_ref();
            let probe = self.get(name).ok_or_else(|| CatalogError::UnknownProbe(name.to_owned()))?;
            selected.register(probe.clone())?;
        }
        Ok(selected)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Probe> {
        self.probes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.probes.iter().map(Probe::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProbeCatalog {
    type Item = &'a Probe;
    type IntoIter = std::slice::Iter<'a, Probe>;

    fn into_iter(self) -> Self::IntoIter {
        self.probes.iter()
    }
}
