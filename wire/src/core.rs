//! Core, non-public data structures for the IoC container.

use crate::dependencies::Dependencies;
use crate::error::{BoxError, ResolveError};
use futures::future::{BoxFuture, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resolved value, shared by everyone who resolved the same name.
pub type Value = Arc<dyn Any + Send + Sync>;

/// The future returned by [`Container::resolve`](crate::Container::resolve).
pub type Resolution = BoxFuture<'static, Result<Value, ResolveError>>;

pub(crate) type Construction = BoxFuture<'static, Result<Value, BoxError>>;

pub(crate) type Factory = Arc<dyn Fn(Dependencies) -> Construction + Send + Sync>;

/// The construction strategy of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
  /// Produced by invoking a function; cached after the first resolution.
  Callable,
  /// Constructed once and cached.
  Singleton,
  /// Constructed afresh on every resolution.
  Instance,
  /// Seeded directly, already resolved.
  Value,
}

impl fmt::Display for Kind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Kind::Callable => "callable",
      Kind::Singleton => "singleton",
      Kind::Instance => "instance",
      Kind::Value => "value",
    };
    f.write_str(label)
  }
}

pub(crate) enum Provider {
  Callable(Factory),
  Singleton(Factory),
  Instance(Factory),
  Value(Value),
}

impl Provider {
  pub(crate) fn kind(&self) -> Kind {
    match self {
      Provider::Callable(_) => Kind::Callable,
      Provider::Singleton(_) => Kind::Singleton,
      Provider::Instance(_) => Kind::Instance,
      Provider::Value(_) => Kind::Value,
    }
  }

  /// Callables and singletons are memoized; instances and values are not.
  pub(crate) fn is_cached(&self) -> bool {
    matches!(self, Provider::Callable(_) | Provider::Singleton(_))
  }
}

/// A registration as stored in the registry. Immutable once stored.
pub(crate) struct Registration {
  pub(crate) dependencies: Vec<String>,
  pub(crate) provider: Provider,
}

/// Resolution state of one name.
#[derive(Clone)]
pub(crate) enum State {
  Unresolved,
  /// An in-flight construction. `ticket` identifies it so that every slot
  /// sharing the future (aliases included) is settled together.
  Pending {
    ticket: u64,
    future: Shared<Resolution>,
  },
  Resolved(Value),
  Failed(ResolveError),
}

#[derive(Clone)]
pub(crate) struct Slot {
  pub(crate) registration: Arc<Registration>,
  pub(crate) state: State,
}

impl Slot {
  pub(crate) fn new(registration: Registration) -> Self {
    let state = match &registration.provider {
      Provider::Value(value) => State::Resolved(Arc::clone(value)),
      _ => State::Unresolved,
    };
    Self {
      registration: Arc::new(registration),
      state,
    }
  }
}

#[derive(Default)]
pub(crate) struct Registry {
  pub(crate) slots: HashMap<String, Slot>,
  next_ticket: u64,
}

impl Registry {
  pub(crate) fn issue_ticket(&mut self) -> u64 {
    self.next_ticket += 1;
    self.next_ticket
  }

  /// Moves every slot still pending on `ticket` to its settled state.
  pub(crate) fn settle(&mut self, ticket: u64, outcome: &Result<Value, ResolveError>, keep_failures: bool) {
    for slot in self.slots.values_mut() {
      let matches = matches!(&slot.state, State::Pending { ticket: t, .. } if *t == ticket);
      if !matches {
        continue;
      }
      slot.state = match outcome {
        Ok(value) => State::Resolved(Arc::clone(value)),
        Err(err) if keep_failures => State::Failed(err.clone()),
        Err(_) => State::Unresolved,
      };
    }
  }
}
