#![forbid(unsafe_code)]

//! Logging support for the flip engine.
//!
//! Animators log transitions at `debug` and timer activity at `trace`.
//! With the `tracing` feature the macros below are the real `tracing`
//! macros; without it they expand to nothing, so call sites can use
//! `crate::debug!` unconditionally.
//!
//! The `tracing-json` feature additionally provides
//! [`init_json_subscriber`] for binaries that want structured output.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Install a JSON `tracing` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` (default `flap_core=debug`). Stderr keeps
/// log lines out of whatever the host is drawing on stdout.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed or the
/// filter directive cannot be parsed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new("flap_core=debug")?,
    };
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
