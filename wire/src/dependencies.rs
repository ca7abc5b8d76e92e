//! The argument list handed to constructors.

use crate::core::Value;
use crate::error::{BoxError, ResolveError};
use std::any::{type_name, Any};
use std::sync::Arc;

/// A type the container knows how to build from its resolved dependencies.
///
/// Registered with [`Container::singleton`](crate::Container::singleton) or
/// [`Container::instance`](crate::Container::instance).
///
/// ```
/// use fibre_wire::{BoxError, Construct, Dependencies};
///
/// struct Database { url: String }
///
/// impl Construct for Database {
///   fn construct(deps: Dependencies) -> Result<Self, BoxError> {
///     let url = deps.get::<String>(0)?;
///     Ok(Database { url: (*url).clone() })
///   }
/// }
/// ```
pub trait Construct: Any + Send + Sync + Sized {
  fn construct(deps: Dependencies) -> Result<Self, BoxError>;
}

/// Resolved dependency values, in the order they were declared.
#[derive(Clone, Default)]
pub struct Dependencies {
  names: Vec<String>,
  values: Vec<Value>,
}

impl Dependencies {
  pub(crate) fn new(names: Vec<String>, values: Vec<Value>) -> Self {
    debug_assert_eq!(names.len(), values.len());
    Self { names, values }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The declared dependency names.
  pub fn names(&self) -> &[String] {
    &self.names
  }

  /// The untyped value at `index`.
  pub fn value(&self, index: usize) -> Option<&Value> {
    self.values.get(index)
  }

  /// The value at `index`, downcast to `T`.
  pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ResolveError> {
    let value = self.values.get(index).ok_or(ResolveError::MissingArgument {
      index,
      len: self.values.len(),
    })?;
    downcast(&self.names[index], Arc::clone(value))
  }

  /// The value declared under `name`, downcast to `T`.
  ///
  /// If the same name was declared more than once, the first position is used.
  pub fn named<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ResolveError> {
    let index = self
      .names
      .iter()
      .position(|declared| declared == name)
      .ok_or_else(|| ResolveError::UndeclaredDependency {
        name: name.to_owned(),
        declared: self.names.clone(),
      })?;
    self.get(index)
  }

  /// Iterates `(name, value)` pairs in declared order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.names.iter().map(String::as_str).zip(self.values.iter())
  }

  pub fn into_values(self) -> Vec<Value> {
    self.values
  }
}

impl std::fmt::Debug for Dependencies {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Dependencies")
      .field("names", &self.names)
      .finish_non_exhaustive()
  }
}

pub(crate) fn downcast<T: Any + Send + Sync>(name: &str, value: Value) -> Result<Arc<T>, ResolveError> {
  value.downcast::<T>().map_err(|_| ResolveError::TypeMismatch {
    name: name.to_owned(),
    expected: type_name::<T>(),
  })
}
