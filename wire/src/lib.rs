//! # Fibre Wire
//!
//! A named, asynchronous Inversion of Control (IoC) container for Rust.
//!
//! Entries are registered under a string name together with the names of the
//! entries they depend on. Registration is pure bookkeeping; nothing is built
//! until the entry is resolved. Resolution walks the dependency names
//! recursively, resolves them concurrently, and hands the values to the
//! entry's constructor in the order they were declared.
//!
//! ## Core Concepts
//!
//! - **Callable**: a function whose return value (or awaited output) becomes the
//!   value. Runs at most once; the result is cached.
//! - **Singleton**: a type constructed once and cached.
//! - **Instance**: a type constructed afresh, with fresh dependencies, on every
//!   resolution.
//! - **Value**: an already-built value seeded directly.
//! - **Container**: the registry. Create as many as you need, or use the
//!   process-wide one via [`global()`].
//!
//! Missing names and circular dependencies are reported as a failed
//! resolution, never as a panic.
//!
//! ## Chain Depth
//!
//! The dependency walk is recursive, so by default a single resolution chain
//! may hold at most 256 unresolved names; a longer acyclic chain fails with
//! [`ResolveError::DepthExceeded`]. Names that are already resolved or in
//! flight do not count. Raise or disable the limit with
//! [`ContainerConfig::max_depth`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_wire::{BoxError, Construct, Container, Dependencies};
//! use std::sync::Arc;
//!
//! struct Greeter {
//!   name: Arc<String>,
//! }
//!
//! impl Construct for Greeter {
//!   fn construct(deps: Dependencies) -> Result<Self, BoxError> {
//!     Ok(Greeter { name: deps.get::<String>(0)? })
//!   }
//! }
//!
//! # futures::executor::block_on(async {
//! let container = Container::new();
//! container.value("name", String::from("world")).unwrap();
//! container.singleton::<Greeter>("greeter", &["name"]).unwrap();
//! container
//!   .callable("greeting", &["greeter"], |deps: Dependencies| {
//!     let greeter = deps.get::<Greeter>(0)?;
//!     Ok::<_, BoxError>(format!("hello {}", greeter.name))
//!   })
//!   .unwrap();
//!
//! let greeting = container.resolve_as::<String>("greeting").await.unwrap();
//! assert_eq!(*greeting, "hello world");
//! # });
//! ```

mod config;
mod container;
mod core;
mod dependencies;
mod error;
mod global;
mod graph;
mod macros;

pub use config::{ContainerConfig, DuplicatePolicy, FailurePolicy};
pub use container::Container;
pub use crate::core::{Kind, Resolution, Value};
pub use dependencies::{Construct, Dependencies};
pub use error::{BoxError, ConfigError, RegistrationError, ResolveError, Result};
pub use global::global;
pub use graph::GraphIssue;
