//! Logging setup for the Kiln CLI.
//!
//! Log lines always go to stderr so that `kiln plan` output on stdout stays
//! machine-readable.
//!
//! ```rust,no_run
//! use kiln_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("assembling plan");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "kiln=debug,kiln_config=debug,kiln_cli=debug";
const QUIET_FILTER: &str = "kiln=error,kiln_config=error,kiln_cli=error";
const DEFAULT_FILTER: &str = "kiln=info,kiln_config=info,kiln_cli=info";

/// Select the filter directives for the given flags.
///
/// The level is determined in this order:
/// 1. `--verbose`: debug for kiln crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`, when set and valid
/// 4. info for kiln crates
pub fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && console::colors_enabled_stderr())
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn verbose_wins_over_environment() {
        let filter = env_filter(true, false);
        assert!(filter.to_string().contains("kiln_config=debug"));
    }

    #[test]
    fn quiet_is_errors_only() {
        let filter = env_filter(false, true);
        assert!(filter.to_string().contains("kiln_config=error"));
        assert!(!filter.to_string().contains("info"));
    }

    #[test]
    #[serial]
    fn rust_log_is_used_by_default() {
        unsafe { std::env::set_var("RUST_LOG", "kiln_config=trace") };
        let filter = env_filter(false, false);
        unsafe { std::env::remove_var("RUST_LOG") };
        assert_eq!(filter.to_string(), "kiln_config=trace");
    }

    #[test]
    #[serial]
    fn default_is_info() {
        unsafe { std::env::remove_var("RUST_LOG") };
        assert!(env_filter(false, false).to_string().contains("kiln_config=info"));
    }
}
