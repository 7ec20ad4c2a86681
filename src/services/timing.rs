// src/services/timing.rs

use std::time::Instant;

use crate::error::AppResult;

/// Run `f` and log how long it took, whether it succeeded or not
pub fn timed<T, F>(operation: &str, target: &str, f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T>,
{
    let started = Instant::now();
    let result = f();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(_) => log::info!("{} {} completed in {:.4} ms", operation, target, elapsed_ms),
        Err(e) => log::warn!(
            "{} {} failed in {:.4} ms: {}",
            operation,
            target,
            elapsed_ms,
            e
        ),
    }

    result
}
