//! Query timing macro
//!
//! Logs how long a database operation took in debug builds and compiles to
//! the bare expression in release builds.

/// Evaluate `$body`, logging its elapsed time under `$label` (debug builds only)
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! timed {
    ($label:expr, $body:expr) => {{
        let started = std::time::Instant::now();
        let result = $body;
        log::debug!("{} took {:?}", $label, started.elapsed());
        result
    }};
}

/// Evaluate `$body` (release builds skip the timing)
#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! timed {
    ($label:expr, $body:expr) => {{
        let _ = $label;
        $body
    }};
}
