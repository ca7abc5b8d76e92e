//! Container configuration, loadable from YAML.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MAX_DEPTH: usize = 256;

/// What happens to a callable or singleton whose construction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
  /// Forget the failure; the next resolution constructs again.
  #[default]
  Retry,
  /// Remember the failure; every later resolution replays it.
  Cache,
}

/// What happens when a name that is already registered is registered again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
  /// Last write wins, and any cached state for the name is discarded.
  #[default]
  Replace,
  /// The second registration fails with `RegistrationError::Duplicate`.
  Reject,
}

/// Tuning knobs for a [`Container`](crate::Container).
///
/// ```yaml
/// on_failure: cache
/// on_duplicate: reject
/// max_depth: 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
  pub on_failure: FailurePolicy,
  pub on_duplicate: DuplicatePolicy,
  /// Maximum number of names on one resolution chain, 256 by default.
  /// A deeper acyclic chain fails with `ResolveError::DepthExceeded`.
  /// `None` disables the limit, leaving only the thread's stack as a bound.
  pub max_depth: Option<usize>,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      on_failure: FailurePolicy::default(),
      on_duplicate: DuplicatePolicy::default(),
      max_depth: Some(DEFAULT_MAX_DEPTH),
    }
  }
}

impl ContainerConfig {
  /// Parses and validates a YAML document.
  pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
    let config: ContainerConfig = serde_yaml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a YAML file.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_yaml_str(&contents)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_depth == Some(0) {
      return Err(ConfigError::InvalidValue {
        field: "max_depth".to_string(),
        message: "must be at least 1, or null to disable the limit".to_string(),
      });
    }
    Ok(())
  }
}
