use fibre_wire::{resolve, global, BoxError, Construct, Dependencies};
use futures::executor::block_on;
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

// The service declares how it is built from its dependencies; it never
// creates its logger itself.
impl Construct for ReportService {
  fn construct(deps: Dependencies) -> Result<Self, BoxError> {
    let logger = deps.get::<Arc<dyn Logger>>(0)?;
    Ok(ReportService {
      logger: Arc::clone(&logger),
    })
  }
}

fn main() -> Result<(), BoxError> {
  // --- Registration ---

  // Trait objects are stored as `Arc<dyn Trait>` values.
  global().callable("logger", &[], |_: Dependencies| {
    Ok::<_, BoxError>(Arc::new(ConsoleLogger) as Arc<dyn Logger>)
  })?;
  global().singleton::<ReportService>("reports", &["logger"])?;

  // --- Resolution and Usage ---
  block_on(async {
    println!("Resolving the high-level service...");
    let report_service = resolve!(ReportService, "reports");

    println!("Using the service...");
    report_service.generate_report();
  });

  Ok(())
}
