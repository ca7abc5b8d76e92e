//! Tests specifically for the resolution macros.
//! This file verifies the behavior of:
//! - `resolve!` / `try_resolve!` against the global container
//! - `resolve_from!` / `try_resolve_from!` against a local `Container`

use fibre_wire::{
  global, resolve, resolve_from, try_resolve, try_resolve_from, BoxError, Container,
  Dependencies, ResolveError,
};
use std::sync::Arc;

// --- Test Fixtures ---

struct MacroTestService {
  value: i32,
}

// --- Global Macro Tests ---

#[tokio::test]
async fn test_resolve_global() {
  global()
    .singleton_with("macro_service", &[], |_: Dependencies| {
      Ok::<_, BoxError>(MacroTestService { value: 42 })
    })
    .unwrap();

  let typed = resolve!(MacroTestService, "macro_service");
  assert_eq!(typed.value, 42);

  let untyped = resolve!("macro_service");
  let downcast = untyped.downcast::<MacroTestService>().ok().unwrap();
  assert!(Arc::ptr_eq(&typed, &downcast));
}

#[tokio::test]
async fn test_try_resolve_global() {
  global().value("macro_number", 7_u8).unwrap();

  assert_eq!(*try_resolve!(u8, "macro_number").unwrap(), 7);
  assert!(try_resolve!("macro_number").is_ok());

  let missing = try_resolve!(u8, "macro_never_registered");
  assert!(matches!(missing, Err(ResolveError::NotRegistered { .. })));
}

#[tokio::test]
#[should_panic(expected = "Failed to resolve required dependency 'macro_absent'")]
async fn test_resolve_panics_on_missing_entry() {
  let _ = resolve!(MacroTestService, "macro_absent");
}

#[tokio::test]
#[should_panic(expected = "Failed to resolve required dependency 'macro_wrong_type' as u64")]
async fn test_resolve_panics_on_wrong_type() {
  global().value("macro_wrong_type", 1_u8).unwrap();
  let _ = resolve!(u64, "macro_wrong_type");
}

// --- Local Container Macro Tests ---

#[tokio::test]
async fn test_macros_with_local_container() {
  let container = Container::new();
  container.value("local", String::from("local value")).unwrap();
  let name = String::from("local");

  let value = resolve_from!(container, String, &name);
  assert_eq!(*value, "local value");

  assert!(try_resolve_from!(container, "local").is_ok());
  assert!(try_resolve_from!(container, String, "other").is_err());
  // The local entry is invisible to the global container.
  assert!(try_resolve!(String, "local").is_err());
}

#[tokio::test]
#[should_panic(expected = "Failed to resolve required dependency 'nothing'")]
async fn test_resolve_from_panics_on_missing_entry() {
  let container = Container::new();
  let _ = resolve_from!(container, "nothing");
}
