use fibre_wire::{BoxError, Construct, Container, Dependencies, Kind, ResolveError};
use pretty_assertions::assert_eq;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

#[derive(Debug)]
struct Config {
  id: usize,
}

static CONFIG_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl Construct for Config {
  fn construct(_deps: Dependencies) -> Result<Self, BoxError> {
    Ok(Config {
      id: CONFIG_COUNTER.fetch_add(1, Ordering::SeqCst),
    })
  }
}

struct Service {
  config: Arc<Config>,
}

impl Construct for Service {
  fn construct(deps: Dependencies) -> Result<Self, BoxError> {
    Ok(Service {
      config: deps.get::<Config>(0)?,
    })
  }
}

// --- Basic Tests ---

#[tokio::test]
async fn test_callable_receives_resolved_values() {
  // Arrange
  let container = Container::new();
  container
    .callable("greeting", &["name"], |deps: Dependencies| {
      let name = deps.get::<String>(0)?;
      Ok::<_, BoxError>(format!("hello {}", name))
    })
    .unwrap();
  container.value("name", String::from("world")).unwrap();

  // Act
  let greeting = container.resolve_as::<String>("greeting").await.unwrap();

  // Assert
  assert_eq!(*greeting, "hello world");
}

#[tokio::test]
async fn test_value_resolves_without_registry_walk() {
  let container = Container::new();
  container.value("x", 42_i32).unwrap();

  assert!(container.is_resolved("x"));
  assert_eq!(*container.resolve_as::<i32>("x").await.unwrap(), 42);
}

#[tokio::test]
async fn test_singleton_is_constructed_once() {
  let container = Container::new();
  container.instance::<Config>("config", &[]).unwrap();
  container.singleton::<Service>("service", &["config"]).unwrap();

  let s1 = container.resolve_as::<Service>("service").await.unwrap();
  let s2 = container.resolve_as::<Service>("service").await.unwrap();

  // Ensure it's a singleton by checking pointer equality.
  assert!(Arc::ptr_eq(&s1, &s2));
  // The singleton keeps the config it was built with.
  assert!(Arc::ptr_eq(&s1.config, &s2.config));
}

#[tokio::test]
async fn test_instance_is_constructed_every_time() {
  let container = Container::new();
  container.instance::<Config>("config", &[]).unwrap();

  let c1 = container.resolve_as::<Config>("config").await.unwrap();
  let c2 = container.resolve_as::<Config>("config").await.unwrap();

  assert!(!Arc::ptr_eq(&c1, &c2));
  assert_ne!(c1.id, c2.id);
  assert!(!container.is_resolved("config"));
}

#[tokio::test]
async fn test_instance_dependencies_are_fresh_each_time() {
  let container = Container::new();
  container.instance::<Config>("config", &[]).unwrap();
  container.instance::<Service>("service", &["config"]).unwrap();

  let s1 = container.resolve_as::<Service>("service").await.unwrap();
  let s2 = container.resolve_as::<Service>("service").await.unwrap();

  assert!(!Arc::ptr_eq(&s1, &s2));
  assert!(!Arc::ptr_eq(&s1.config, &s2.config));
  assert_ne!(s1.config.id, s2.config.id);
}

#[tokio::test]
async fn test_unregistered_name_fails() {
  let container = Container::new();

  let err = container.resolve("missing").await.unwrap_err();

  assert!(matches!(err, ResolveError::NotRegistered { ref name } if name == "missing"));
  assert_eq!(err.to_string(), "Can't resolve 'missing': not registered");
}

#[tokio::test]
async fn test_missing_dependency_fails_the_dependent() {
  let container = Container::new();
  container.singleton::<Service>("service", &["config"]).unwrap();

  let err = container.resolve("service").await.unwrap_err();

  assert_eq!(err.name(), Some("config"));
}

#[tokio::test]
async fn test_wrong_type_is_a_mismatch() {
  let container = Container::new();
  container.value("port", 8080_u16).unwrap();

  let err = container.resolve_as::<String>("port").await.unwrap_err();

  assert!(matches!(err, ResolveError::TypeMismatch { ref name, .. } if name == "port"));
}

#[tokio::test]
async fn test_async_callable() {
  let container = Container::new();
  container.value("base", 20_u64).unwrap();
  container
    .callable_async("answer", &["base"], |deps: Dependencies| async move {
      let base = deps.get::<u64>(0)?;
      tokio::task::yield_now().await;
      Ok::<_, BoxError>(*base + 22)
    })
    .unwrap();

  assert_eq!(*container.resolve_as::<u64>("answer").await.unwrap(), 42);
}

#[tokio::test]
async fn test_resolve_dependencies_keeps_order() {
  let container = Container::new();
  container.value("a", 1_u8).unwrap();
  container.value("b", 2_u8).unwrap();
  container
    .callable("c", &[], |_: Dependencies| Ok::<_, BoxError>(3_u8))
    .unwrap();

  let deps = container.resolve_dependencies(&["c", "a", "b"]).await.unwrap();

  assert_eq!(deps.names(), ["c", "a", "b"]);
  let values: Vec<u8> = (0..deps.len()).map(|i| *deps.get::<u8>(i).unwrap()).collect();
  assert_eq!(values, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_registration_stores_names_as_given() {
  let container = Container::new();

  container.value("", 1_u8).unwrap();
  container.instance::<Config>("config", &["ok", ""]).unwrap();
  container.singleton::<Service>("service", &["service"]).unwrap();

  assert_eq!(container.len(), 3);
  assert_eq!(*container.resolve_as::<u8>("").await.unwrap(), 1);
  let err = container.resolve("config").await.unwrap_err();
  assert_eq!(err.name(), Some("ok"));
}

#[tokio::test]
async fn test_self_dependency_fails_at_resolution() {
  static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
  let container = Container::new();
  container
    .singleton_with("narcissus", &["narcissus"], |_: Dependencies| {
      CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
      Ok::<_, BoxError>(())
    })
    .unwrap();

  let err = container.resolve("narcissus").await.unwrap_err();

  match err {
    ResolveError::CircularDependency { name, chain } => {
      assert_eq!(name, "narcissus");
      assert_eq!(chain, vec!["narcissus", "narcissus"]);
    }
    other => panic!("expected a circular dependency, got {other}"),
  }
  assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_alias_onto_a_dependency_fails_at_resolution() {
  let container = Container::new();
  container
    .singleton_with("x", &["y"], |_: Dependencies| Ok::<_, BoxError>(()))
    .unwrap();
  container.same("y", "x").unwrap();

  let err = container.resolve("y").await.unwrap_err();

  assert_eq!(err.to_string(), "Circular dependency on 'y' (chain: y -> y)");
}

#[test]
fn test_registration_is_pure_bookkeeping() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);
  let container = Container::new();

  container
    .callable("side_effect", &["not_yet_registered"], |_: Dependencies| {
      CALLS.fetch_add(1, Ordering::SeqCst);
      Ok::<_, BoxError>(())
    })
    .unwrap();

  assert_eq!(CALLS.load(Ordering::SeqCst), 0);
  assert_eq!(container.kind_of("side_effect"), Some(Kind::Callable));
  assert_eq!(container.names(), vec!["side_effect".to_string()]);
}
