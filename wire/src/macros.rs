//! Public macros for ergonomic resolution.
//!
//! Every macro expands to an `.await`, so it can only be used inside an async
//! context.

/// Resolves an entry from the global container, panicking on failure.
///
/// `resolve!(Type, name)` yields an `Arc<Type>`; `resolve!(name)` yields the
/// untyped [`Value`](crate::Value).
///
/// # Panics
///
/// Panics if the entry cannot be resolved or holds another type. For a
/// non-panicking version, use [`try_resolve!`].
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, resolve};
///
/// # futures::executor::block_on(async {
/// global().value("doc_greeting", String::from("hello")).unwrap();
///
/// let message = resolve!(String, "doc_greeting");
/// assert_eq!(*message, "hello");
/// # });
/// ```
#[macro_export]
macro_rules! resolve {
  ($type:ty, $name:expr) => {
    $crate::resolve_from!($crate::global(), $type, $name)
  };
  ($name:expr) => {{
    let name: &str = $name;
    $crate::global()
      .resolve(name)
      .await
      .unwrap_or_else(|err| panic!("Failed to resolve required dependency '{}': {}", name, err))
  }};
}

/// Resolves an entry from the global container, yielding the `Result`.
#[macro_export]
macro_rules! try_resolve {
  ($type:ty, $name:expr) => {
    $crate::try_resolve_from!($crate::global(), $type, $name)
  };
  ($name:expr) => {
    $crate::global().resolve($name).await
  };
}

/// Like [`resolve!`], against an explicit container.
#[macro_export]
macro_rules! resolve_from {
  ($container:expr, $type:ty, $name:expr) => {{
    let name: &str = $name;
    $container
      .resolve_as::<$type>(name)
      .await
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required dependency '{}' as {}: {}",
          name,
          std::any::type_name::<$type>(),
          err
        )
      })
  }};
  ($container:expr, $name:expr) => {{
    let name: &str = $name;
    $container
      .resolve(name)
      .await
      .unwrap_or_else(|err| panic!("Failed to resolve required dependency '{}': {}", name, err))
  }};
}

/// Like [`try_resolve!`], against an explicit container.
#[macro_export]
macro_rules! try_resolve_from {
  ($container:expr, $type:ty, $name:expr) => {
    $container.resolve_as::<$type>($name).await
  };
  ($container:expr, $name:expr) => {
    $container.resolve($name).await
  };
}
