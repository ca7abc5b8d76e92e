//! Error types for registration, resolution and configuration.

use crate::core::Kind;
use std::sync::Arc;
use thiserror::Error;

/// A boxed error returned by user factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised synchronously by the registration functions.
///
/// Names are not validated: an empty name or an entry listing itself as a
/// dependency is stored as given, and a self-dependency fails at resolution
/// with [`ResolveError::CircularDependency`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
  #[error("'{name}' is already registered as a {kind}")]
  Duplicate { name: String, kind: Kind },
}

/// Errors surfaced by a failed resolution.
///
/// The type is `Clone` because a single in-flight resolution can be awaited by
/// many callers, and each of them receives the same failure.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
  #[error("Can't resolve '{name}': not registered")]
  NotRegistered { name: String },

  #[error("Circular dependency on '{name}' (chain: {})", .chain.join(" -> "))]
  CircularDependency { name: String, chain: Vec<String> },

  #[error("Resolving '{name}' exceeded the maximum chain depth of {limit}")]
  DepthExceeded { name: String, limit: usize },

  #[error("'{name}' does not hold a value of type {expected}")]
  TypeMismatch { name: String, expected: &'static str },

  #[error("Dependency argument {index} requested but only {len} were declared")]
  MissingArgument { index: usize, len: usize },

  #[error("'{name}' is not among the declared dependencies ({})", .declared.join(", "))]
  UndeclaredDependency { name: String, declared: Vec<String> },

  #[error("Construction of '{name}' failed: {source}")]
  Construction {
    name: String,
    #[source]
    source: Arc<dyn std::error::Error + Send + Sync>,
  },
}

impl ResolveError {
  /// Wraps a factory error, passing through errors that already are resolution errors.
  pub(crate) fn construction(name: &str, source: BoxError) -> Self {
    match source.downcast::<ResolveError>() {
      Ok(resolve_error) => *resolve_error,
      Err(source) => ResolveError::Construction {
        name: name.to_owned(),
        source: Arc::from(source),
      },
    }
  }

  /// The name this error is about, when it concerns a single entry.
  pub fn name(&self) -> Option<&str> {
    match self {
      ResolveError::NotRegistered { name }
      | ResolveError::CircularDependency { name, .. }
      | ResolveError::DepthExceeded { name, .. }
      | ResolveError::TypeMismatch { name, .. }
      | ResolveError::UndeclaredDependency { name, .. }
      | ResolveError::Construction { name, .. } => Some(name),
      ResolveError::MissingArgument { .. } => None,
    }
  }
}

/// Errors raised while loading a [`ContainerConfig`](crate::ContainerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  Parse(#[from] serde_yaml::Error),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidValue { field: String, message: String },
}

/// A specialized `Result` type for resolution.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
