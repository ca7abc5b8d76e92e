//! The global IoC container instance and access functions.

use crate::container::Container;
use once_cell::sync::Lazy;

// The one and only global container instance.
// It will be created on its first access in a thread-safe manner.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Provides a reference to the global container instance.
///
/// Application modules can register their entries here at startup and resolve
/// them later, without passing a container around. Code that needs isolation
/// (tests in particular) should create its own [`Container`] instead.
///
/// # Examples
///
/// ```
/// use fibre_wire::global;
///
/// fn register_services() {
///   global().value("banner", String::from("Hello from global!")).unwrap();
/// }
/// # register_services();
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}
