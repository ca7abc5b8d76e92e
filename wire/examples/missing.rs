use fibre_wire::{global, try_resolve, BoxError, Dependencies, ResolveError};
use futures::executor::block_on;

fn main() -> Result<(), BoxError> {
  // Two entries that need each other can be registered, but never resolved.
  global().singleton_with("chicken", &["egg"], |_: Dependencies| Ok::<_, BoxError>("chicken"))?;
  global().singleton_with("egg", &["chicken"], |_: Dependencies| Ok::<_, BoxError>("egg"))?;

  // The graph can be checked up front, without constructing anything.
  if let Err(issues) = global().validate() {
    for issue in &issues {
      println!("Graph issue: {}", issue);
    }
  }

  block_on(async {
    println!("Attempting to resolve an entry that was never registered...");
    match try_resolve!("unregistered") {
      Err(ResolveError::NotRegistered { name }) => println!("Correctly reported '{}' as missing.", name),
      other => panic!("Unexpected outcome: {:?}", other.map(|_| ())),
    }

    println!("\nAttempting to resolve a circular dependency...");
    match try_resolve!("chicken") {
      Err(err @ ResolveError::CircularDependency { .. }) => println!("Correctly failed: {}", err),
      other => panic!("Unexpected outcome: {:?}", other.map(|_| ())),
    }
  });

  Ok(())
}
