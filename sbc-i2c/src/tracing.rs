//! Logging setup for programs built on this crate.
//!
//! The library itself only emits `tracing` events: failed transactions (via
//! [`TracingDiagnostics`](crate::diagnostics::TracingDiagnostics)), scan
//! tables, and per-probe trace output. A program that wants to see them
//! calls [`init_journald_or_stdout`] once at startup.
//!
//! Modules in this crate `use crate::tracing::prelude::*` for the level
//! macros.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

/// Level macros for use inside this crate and by programs built on it.
pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Where log events end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// systemd journal, with structured fields preserved
    Journald,
    /// Human-readable lines on stdout
    Stdout,
}

impl Output {
    /// Journald when systemd attached our stdio to the journal, stdout
    /// otherwise.
    pub fn detect() -> Self {
        if env::var_os("JOURNAL_STREAM").is_some() {
            Self::Journald
        } else {
            Self::Stdout
        }
    }
}

/// Install a global subscriber for the detected [`Output`].
///
/// A no-op when a subscriber is already installed, so tests and programs
/// that set up their own logging can call it freely.
pub fn init_journald_or_stdout() {
    init(Output::detect());
}

/// Install a global subscriber writing to `output`.
///
/// If the journal socket can't be opened, events go to stdout instead.
pub fn init(output: Output) {
    match output {
        Output::Journald => match tracing_journald::layer() {
            Ok(journal) => {
                let _ = tracing_subscriber::registry().with(journal).try_init();
            }
            Err(e) => {
                init_stdout();
                warn!(error = %e, "Journald unavailable, logging to stdout");
            }
        },
        Output::Stdout => init_stdout(),
    }
}

// RUST_LOG picks the levels; without it INFO is shown, which includes the
// scan table.
fn init_stdout() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let lines = tracing_subscriber::fmt::layer()
        .with_timer(LocalTimer)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(lines)
        .try_init();
}

// Timestamps in local time to the nearest second. Boards usually run with
// a local clock, and the default UTC RFC 3339 stamp is hard to scan.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or(OffsetDateTime::now_utc());
        let stamp = now
            .format(time::macros::format_description!(
                "[hour]:[minute]:[second]"
            ))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", stamp)
    }
}
