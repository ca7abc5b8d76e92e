use fibre_wire::{global, resolve, BoxError, Dependencies};
use futures::executor::block_on;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn track(_: Dependencies) -> Result<RequestTracker, BoxError> {
  Ok(RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  })
}

fn main() -> Result<(), BoxError> {
  // Show the container's own debug logging.
  tracing_subscriber::fmt()
    .with_env_filter("fibre_wire=debug")
    .init();

  // --- Singleton Registration ---
  // This factory will only be called ONCE.
  global().singleton_with("singleton_tracker", &[], track)?;

  // --- Instance Registration ---
  // This factory will be called EVERY time the entry is resolved.
  global().instance_with("instance_tracker", &[], track)?;

  block_on(async {
    println!("--- Resolving Singletons ---");
    let s1 = resolve!(RequestTracker, "singleton_tracker");
    let s2 = resolve!(RequestTracker, "singleton_tracker");
    println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
    assert_eq!(s1.id, 0);
    assert!(Arc::ptr_eq(&s1, &s2), "Singleton values should be identical");

    println!("--- Resolving Instances ---");
    let t1 = resolve!(RequestTracker, "instance_tracker");
    let t2 = resolve!(RequestTracker, "instance_tracker");
    println!("Instance 1 ID: {}, Instance 2 ID: {}", t1.id, t2.id);
    assert_eq!((t1.id, t2.id), (1, 2));
    assert!(!Arc::ptr_eq(&t1, &t2), "Instances should be different");
  });

  Ok(())
}
