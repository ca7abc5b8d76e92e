//! The main `Container` struct and its associated methods.

use crate::config::{ContainerConfig, DuplicatePolicy, FailurePolicy};
use crate::core::{Factory, Kind, Provider, Registration, Registry, Resolution, Slot, State, Value};
use crate::dependencies::{downcast, Construct, Dependencies};
use crate::error::{BoxError, RegistrationError, ResolveError};
use crate::graph::{self, GraphIssue};
use futures::future::{self, try_join_all, FutureExt};
use parking_lot::Mutex;
use std::any::Any;
use std::future::Future;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

/// The Inversion of Control (IoC) container.
///
/// Entries are registered under a name together with the names of the entries
/// they depend on. Nothing is constructed at registration time; a later
/// [`resolve`](Container::resolve) resolves the dependencies first, then builds
/// the value.
///
/// `Container` is a cheap handle: clones share the same registry.
#[derive(Clone, Default)]
pub struct Container {
  inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
  registry: Mutex<Registry>,
  config: ContainerConfig,
}

impl Inner {
  fn settle(&self, ticket: u64, outcome: &Result<Value, ResolveError>) {
    let keep_failures = self.config.on_failure == FailurePolicy::Cache;
    self.registry.lock().settle(ticket, outcome, keep_failures);
  }
}

impl Container {
  /// Creates a new, empty `Container` with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Container` using `config`.
  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      inner: Arc::new(Inner {
        registry: Mutex::new(Registry::default()),
        config,
      }),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.inner.config
  }

  // --- PRIVATE HELPERS ---

  fn register(
    &self,
    name: &str,
    dependencies: &[&str],
    provider: Provider,
  ) -> Result<(), RegistrationError> {
    let kind = provider.kind();
    let registration = Registration {
      dependencies: dependencies.iter().map(|dep| (*dep).to_owned()).collect(),
      provider,
    };

    // The replaced slot is dropped after the lock is released; user values may
    // call back into the container from their `Drop`.
    let previous = {
      let mut registry = self.inner.registry.lock();
      self.check_duplicate(&registry, name)?;
      registry.slots.insert(name.to_owned(), Slot::new(registration))
    };
    match previous {
      Some(previous) => debug!(
        name,
        previous = %previous.registration.provider.kind(),
        %kind,
        "replaced registration"
      ),
      None => debug!(name, %kind, ?dependencies, "registered"),
    }
    Ok(())
  }

  fn check_duplicate(&self, registry: &Registry, name: &str) -> Result<(), RegistrationError> {
    if self.inner.config.on_duplicate == DuplicatePolicy::Reject {
      if let Some(existing) = registry.slots.get(name) {
        return Err(RegistrationError::Duplicate {
          name: name.to_owned(),
          kind: existing.registration.provider.kind(),
        });
      }
    }
    Ok(())
  }

  /// The synchronous part of a resolution: consults the cache, detects cycles,
  /// recurses into dependencies and records pending futures. Nothing is
  /// constructed here.
  fn plan(
    &self,
    registry: &mut Registry,
    name: &str,
    chain: &mut Vec<String>,
  ) -> Result<Resolution, ResolveError> {
    let slot = registry
      .slots
      .get(name)
      .ok_or_else(|| ResolveError::NotRegistered {
        name: name.to_owned(),
      })?;

    match &slot.state {
      State::Resolved(value) => {
        trace!(name, "resolved from cache");
        return Ok(future::ready(Ok(Arc::clone(value))).boxed());
      }
      State::Pending { future: in_flight, .. } => {
        trace!(name, "joining in-flight resolution");
        return Ok(in_flight.clone().boxed());
      }
      State::Failed(err) => {
        trace!(name, "replaying cached failure");
        return Ok(future::ready(Err(err.clone())).boxed());
      }
      State::Unresolved => {}
    }

    let registration = Arc::clone(&slot.registration);
    let factory = match &registration.provider {
      Provider::Value(value) => return Ok(future::ready(Ok(Arc::clone(value))).boxed()),
      Provider::Callable(factory) | Provider::Singleton(factory) | Provider::Instance(factory) => {
        Arc::clone(factory)
      }
    };

    if let Some(limit) = self.inner.config.max_depth {
      if chain.len() >= limit {
        return Err(ResolveError::DepthExceeded {
          name: name.to_owned(),
          limit,
        });
      }
    }

    chain.push(name.to_owned());
    let planned = self.plan_dependencies(registry, &registration.dependencies, chain);
    chain.pop();
    let pending = planned?;

    let owner = name.to_owned();
    let names = registration.dependencies.clone();
    let construction = async move {
      let values = try_join_all(pending).await?;
      debug!(name = %owner, "constructing");
      factory(Dependencies::new(names, values))
        .await
        .map_err(|source| {
          let err = ResolveError::construction(&owner, source);
          warn!(name = %owner, error = %err, "construction failed");
          err
        })
    };

    if !registration.provider.is_cached() {
      return Ok(construction.boxed());
    }

    let ticket = registry.issue_ticket();
    let container: Weak<Inner> = Arc::downgrade(&self.inner);
    let shared = async move {
      let outcome = construction.await;
      if let Some(inner) = container.upgrade() {
        inner.settle(ticket, &outcome);
      }
      outcome
    }
    .boxed()
    .shared();

    if let Some(slot) = registry.slots.get_mut(name) {
      slot.state = State::Pending {
        ticket,
        future: shared.clone(),
      };
    }
    Ok(shared.boxed())
  }

  fn plan_dependencies(
    &self,
    registry: &mut Registry,
    dependencies: &[String],
    chain: &mut Vec<String>,
  ) -> Result<Vec<Resolution>, ResolveError> {
    dependencies
      .iter()
      .map(|dependency| {
        if chain.contains(dependency) {
          return Err(ResolveError::CircularDependency {
            name: dependency.clone(),
            chain: chain.iter().cloned().chain([dependency.clone()]).collect(),
          });
        }
        self.plan(registry, dependency, chain)
      })
      .collect()
  }

  // --- PUBLIC API ---

  // --- Singleton Registration ---

  /// Registers a singleton built by `T::construct` from `dependencies`.
  pub fn singleton<T: Construct>(
    &self,
    name: &str,
    dependencies: &[&str],
  ) -> Result<(), RegistrationError> {
    self.register(name, dependencies, Provider::Singleton(construct_factory::<T>()))
  }

  /// Registers a singleton built by `factory`.
  pub fn singleton_with<T, E, F>(
    &self,
    name: &str,
    dependencies: &[&str],
    factory: F,
  ) -> Result<(), RegistrationError>
  where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(Dependencies) -> Result<T, E> + Send + Sync + 'static,
  {
    self.register(name, dependencies, Provider::Singleton(sync_factory(factory)))
  }

  // --- Callable Registration ---

  /// Registers a function whose return value becomes the resolved value.
  /// The function runs at most once; its result is cached.
  pub fn callable<T, E, F>(
    &self,
    name: &str,
    dependencies: &[&str],
    func: F,
  ) -> Result<(), RegistrationError>
  where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(Dependencies) -> Result<T, E> + Send + Sync + 'static,
  {
    self.register(name, dependencies, Provider::Callable(sync_factory(func)))
  }

  /// Registers an async function whose output becomes the resolved value.
  pub fn callable_async<T, E, F, Fut>(
    &self,
    name: &str,
    dependencies: &[&str],
    func: F,
  ) -> Result<(), RegistrationError>
  where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(Dependencies) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
  {
    let factory: Factory = Arc::new(move |deps| {
      let produced = func(deps);
      async move {
        let value = produced.await.map_err(Into::<BoxError>::into)?;
        Ok::<Value, BoxError>(Arc::new(value))
      }
      .boxed()
    });
    self.register(name, dependencies, Provider::Callable(factory))
  }

  // --- Instance Registration ---

  /// Registers a type constructed afresh, with fresh dependencies, on every resolution.
  pub fn instance<T: Construct>(
    &self,
    name: &str,
    dependencies: &[&str],
  ) -> Result<(), RegistrationError> {
    self.register(name, dependencies, Provider::Instance(construct_factory::<T>()))
  }

  pub fn instance_with<T, E, F>(
    &self,
    name: &str,
    dependencies: &[&str],
    factory: F,
  ) -> Result<(), RegistrationError>
  where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(Dependencies) -> Result<T, E> + Send + Sync + 'static,
  {
    self.register(name, dependencies, Provider::Instance(sync_factory(factory)))
  }

  // --- Value Registration ---

  /// Seeds `name` with an already-built value.
  pub fn value<T: Any + Send + Sync>(&self, name: &str, value: T) -> Result<(), RegistrationError> {
    self.register(name, &[], Provider::Value(Arc::new(value)))
  }

  // --- Aliasing ---

  /// Makes `new_name` an alias of `old_name`.
  ///
  /// The registration and the current resolution state of `old_name` are copied
  /// as they are right now. Aliasing a name that was already resolved (or is
  /// being resolved) shares its value; aliasing before the first resolution
  /// gives the alias its own construction. Later changes to `old_name` are not
  /// seen by the alias. Unknown `old_name`s are ignored.
  pub fn same(&self, new_name: &str, old_name: &str) -> Result<(), RegistrationError> {
    let mut registry = self.inner.registry.lock();
    let Some(slot) = registry.slots.get(old_name).cloned() else {
      warn!(new_name, old_name, "alias target is not registered; nothing copied");
      return Ok(());
    };
    if new_name != old_name {
      self.check_duplicate(&registry, new_name)?;
    }
    debug!(new_name, old_name, kind = %slot.registration.provider.kind(), "aliased");
    let replaced = registry.slots.insert(new_name.to_owned(), slot);
    drop(registry);
    drop(replaced);
    Ok(())
  }

  // --- Resolution ---

  /// Resolves `name` and all of its dependencies.
  ///
  /// The dependency walk happens immediately, so missing names and cycles are
  /// detected during this call; construction happens when the returned future
  /// is awaited. Callables and singletons are constructed at most once, even
  /// when several resolutions are in flight at the same time.
  pub fn resolve(&self, name: &str) -> Resolution {
    let planned = {
      let mut registry = self.inner.registry.lock();
      self.plan(&mut registry, name, &mut Vec::new())
    };
    planned.unwrap_or_else(|err| {
      debug!(name, error = %err, "resolution failed");
      future::ready(Err(err)).boxed()
    })
  }

  /// Resolves `name` and downcasts the value to `T`.
  pub fn resolve_as<T: Any + Send + Sync>(
    &self,
    name: &str,
  ) -> impl Future<Output = Result<Arc<T>, ResolveError>> + Send + 'static {
    let resolution = self.resolve(name);
    let name = name.to_owned();
    async move { downcast::<T>(&name, resolution.await?) }
  }

  /// Resolves every name in `names` concurrently, returning the values in the
  /// order given.
  pub fn resolve_dependencies(
    &self,
    names: &[&str],
  ) -> impl Future<Output = Result<Dependencies, ResolveError>> + Send + 'static {
    let owned: Vec<String> = names.iter().map(|name| (*name).to_owned()).collect();
    let planned: Result<Vec<Resolution>, ResolveError> = {
      let mut registry = self.inner.registry.lock();
      owned
        .iter()
        .map(|name| self.plan(&mut registry, name, &mut Vec::new()))
        .collect()
    };
    async move {
      let values = try_join_all(planned?).await?;
      Ok(Dependencies::new(owned, values))
    }
  }

  // --- Inspection ---

  /// Checks the whole dependency graph without constructing anything.
  pub fn validate(&self) -> Result<(), Vec<GraphIssue>> {
    let registry = self.inner.registry.lock();
    let issues = graph::check(&registry);
    if issues.is_empty() {
      Ok(())
    } else {
      Err(issues)
    }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.inner.registry.lock().slots.contains_key(name)
  }

  pub fn kind_of(&self, name: &str) -> Option<Kind> {
    self
      .inner
      .registry
      .lock()
      .slots
      .get(name)
      .map(|slot| slot.registration.provider.kind())
  }

  /// Whether `name` holds a settled value (values always do).
  pub fn is_resolved(&self, name: &str) -> bool {
    matches!(
      self.inner.registry.lock().slots.get(name).map(|slot| &slot.state),
      Some(State::Resolved(_))
    )
  }

  /// All registered names, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.inner.registry.lock().slots.keys().cloned().collect();
    names.sort();
    names
  }

  pub fn len(&self) -> usize {
    self.inner.registry.lock().slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Drops every registration and cached value.
  ///
  /// Resolutions already in flight still complete, but their results are not
  /// recorded.
  pub fn reset(&self) {
    let slots = std::mem::take(&mut self.inner.registry.lock().slots);
    debug!(entries = slots.len(), "resetting container");
    drop(slots);
  }
}

fn sync_factory<T, E, F>(func: F) -> Factory
where
  T: Any + Send + Sync,
  E: Into<BoxError>,
  F: Fn(Dependencies) -> Result<T, E> + Send + Sync + 'static,
{
  Arc::new(move |deps| {
    let produced: Result<Value, BoxError> = func(deps)
      .map(|value| Arc::new(value) as Value)
      .map_err(Into::into);
    future::ready(produced).boxed()
  })
}

fn construct_factory<T: Construct>() -> Factory {
  sync_factory(T::construct)
}
