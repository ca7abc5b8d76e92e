use fibre_wire::{global, BoxError, Container, ContainerConfig, Dependencies};
use futures::executor::block_on;

// A function that configures dependencies and runs some logic.
// By accepting a `&Container`, it can be exercised with a controlled environment.
async fn process_data(container: &Container) -> Result<String, BoxError> {
  // Register a data source ONLY within this container.
  container.value("data", "test data".to_string())?;
  container.callable("processed", &["data"], |deps: Dependencies| {
    let data = deps.get::<String>(0)?;
    Ok::<_, BoxError>(format!("Processed: {}", data.to_uppercase()))
  })?;

  let processed = container.resolve_as::<String>("processed").await?;
  Ok((*processed).clone())
}

fn main() -> Result<(), BoxError> {
  // --- A local container, configured from YAML ---
  let config = ContainerConfig::from_yaml_str("on_failure: cache\non_duplicate: reject\nmax_depth: 16")?;
  println!("Using configuration: {:?}", config);
  let local = Container::with_config(config);

  let result = block_on(process_data(&local))?;
  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // --- Verify Isolation ---
  // Nothing registered in `local` exists in the global container.
  assert!(!global().contains("data"));
  println!("Global container is unaffected, as expected.");

  // The reject policy refuses a second registration under the same name.
  let duplicate = local.value("data", "other data".to_string());
  println!("Registering 'data' again: {:?}", duplicate);
  assert!(duplicate.is_err());

  Ok(())
}
