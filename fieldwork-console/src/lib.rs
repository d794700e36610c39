//! Script console helpers for Fieldwork
//!
//! [`Console`] parses getopt-style options through clap, logs lines with
//! the time elapsed since the previous one, keeps named timers and renders
//! handlebars reports.
//!
//! ```no_run
//! use fieldwork_console::{Console, init_tracing};
//!
//! init_tracing();
//!
//! let mut console = Console::builder()
//!     .short_options("ab:c::")
//!     .long_options(["verbose", "file:", "level::"])
//!     .parse()?;
//!
//! if console.is_arg_set("verbose") {
//!     console.log("Verbose output enabled", false)?;
//! }
//!
//! console.timer_start("import");
//! // ...
//! let took = console.timer_stop("import")?;
//! console.log(format!("Import took {:?}", took), true)?;
//! console.end(true)?;
//! # Ok::<(), fieldwork_console::ConsoleError>(())
//! ```

pub mod console;
pub mod error;
pub mod options;

pub use console::{
    Console, ConsoleBuilder, DEFAULT_README, NO_HELP_MESSAGE, SCRIPT_TIMER, Timer,
};
pub use error::{ConsoleError, Result};
pub use options::{ArgValue, OptionDef, ValueMode};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FIELDWORK_LOG";

/// Install a `tracing` subscriber filtered by `FIELDWORK_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Install a `tracing` subscriber, falling back to `level` when `FIELDWORK_LOG` is unset.
pub fn init_tracing_with_level(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
