//! Process-wide `tracing` subscriber.
//!
//! `RUST_LOG` picks the filter (default `info`), `LOG_FORMAT=json` switches
//! to one JSON object per line.  Output goes to stderr so stdout stays free
//! for tool output.

use tracing_subscriber::EnvFilter;

/// Install the subscriber.  Later calls are no-ops.
pub fn init() {
    init_with_default("info");
}

/// Same as [`init`] with a caller-chosen fallback filter (`-v` flags etc.).
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let installed = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
    };
    if installed.is_ok() {
        install_panic_hook();
    }
}

/// Route panics through the subscriber.  Left out of test builds so the
/// harness keeps reporting panics itself.
#[cfg(not(test))]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

#[cfg(test)]
fn install_panic_hook() {}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_is_harmless() {
        super::init();
        super::init_with_default("debug");
        tracing::info!("logging still works");
    }

    #[test]
    fn panics_stay_with_the_test_harness() {
        super::init();
        let caught = std::panic::catch_unwind(|| panic!("boom"));
        let payload = caught.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
    }
}
