//! Static checks over the registered dependency graph.

use crate::core::Registry;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// A problem found by [`Container::validate`](crate::Container::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphIssue {
  #[error("'{dependent}' depends on '{dependency}', which is not registered")]
  Missing { dependent: String, dependency: String },

  #[error("Circular dependency: {}", .chain.join(" -> "))]
  Cycle { chain: Vec<String> },
}

/// Walks every registration and collects all missing dependencies and cycles.
/// Names are visited in sorted order so reports are stable.
pub(crate) fn check(registry: &Registry) -> Vec<GraphIssue> {
  let graph: BTreeMap<&str, &[String]> = registry
    .slots
    .iter()
    .map(|(name, slot)| (name.as_str(), slot.registration.dependencies.as_slice()))
    .collect();

  let mut issues = Vec::new();
  let mut done = HashSet::new();
  for name in graph.keys().copied() {
    let mut chain = Vec::new();
    visit(&graph, name, &mut chain, &mut done, &mut issues);
  }
  issues
}

fn visit<'a>(
  graph: &BTreeMap<&'a str, &'a [String]>,
  name: &'a str,
  chain: &mut Vec<&'a str>,
  done: &mut HashSet<&'a str>,
  issues: &mut Vec<GraphIssue>,
) {
  if done.contains(name) {
    return;
  }
  if let Some(start) = chain.iter().position(|ancestor| *ancestor == name) {
    let mut cycle: Vec<String> = chain[start..].iter().map(|n| n.to_string()).collect();
    cycle.push(name.to_string());
    issues.push(GraphIssue::Cycle { chain: cycle });
    return;
  }

  chain.push(name);
  let dependencies = graph.get(name).copied().unwrap_or_default();
  for dependency in dependencies {
    if graph.contains_key(dependency.as_str()) {
      visit(graph, dependency, chain, done, issues);
    } else {
      issues.push(GraphIssue::Missing {
        dependent: name.to_string(),
        dependency: dependency.clone(),
      });
    }
  }
  chain.pop();
  done.insert(name);
}

#[cfg(test)]
mod tests {
  use crate::{Container, GraphIssue};
  use pretty_assertions::assert_eq;

  fn unit(_: crate::Dependencies) -> Result<(), crate::BoxError> {
    Ok(())
  }

  #[test]
  fn healthy_graph_has_no_issues() {
    let container = Container::new();
    container.value("url", "postgres://localhost").unwrap();
    container.singleton_with("db", &["url"], unit).unwrap();
    container.instance_with("repo", &["db", "url"], unit).unwrap();

    assert_eq!(container.validate(), Ok(()));
  }

  #[test]
  fn reports_missing_dependencies() {
    let container = Container::new();
    container.callable("report", &["clock", "store"], unit).unwrap();
    container.value("store", 1_u8).unwrap();

    assert_eq!(
      container.validate(),
      Err(vec![GraphIssue::Missing {
        dependent: "report".to_string(),
        dependency: "clock".to_string(),
      }])
    );
  }

  #[test]
  fn reports_each_cycle_once() {
    let container = Container::new();
    container.singleton_with("a", &["b"], unit).unwrap();
    container.singleton_with("b", &["c"], unit).unwrap();
    container.singleton_with("c", &["a"], unit).unwrap();

    let issues = container.validate().unwrap_err();
    assert_eq!(
      issues,
      vec![GraphIssue::Cycle {
        chain: vec!["a".into(), "b".into(), "c".into(), "a".into()],
      }]
    );
    assert_eq!(issues[0].to_string(), "Circular dependency: a -> b -> c -> a");
  }
}
