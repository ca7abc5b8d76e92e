use fibre_wire::{global, resolve, BoxError, Dependencies};
use futures::executor::block_on;
use std::sync::Arc;

struct Clock {
  zone: &'static str,
}

fn main() -> Result<(), BoxError> {
  global().singleton_with("clock", &[], |_: Dependencies| Ok::<_, BoxError>(Clock { zone: "UTC" }))?;

  // Aliased before the first resolution: the alias gets its own construction.
  global().same("early_clock", "clock")?;

  block_on(async {
    let clock = resolve!(Clock, "clock");

    // Aliased after the first resolution: the alias shares the value.
    global().same("late_clock", "clock").expect("valid alias");

    let early = resolve!(Clock, "early_clock");
    let late = resolve!(Clock, "late_clock");
    println!("clock zone: {}, early alias zone: {}", clock.zone, early.zone);

    assert!(!Arc::ptr_eq(&clock, &early));
    assert!(Arc::ptr_eq(&clock, &late));
  });

  Ok(())
}
