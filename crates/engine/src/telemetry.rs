//! Logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "grimoire_engine=info,grimoire_domain=info";

/// Build the filter: explicit directives first, then `RUST_LOG`, then the
/// default. Unparseable directives fall back to the default.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|error| {
            eprintln!("Invalid log filter {directives:?}: {error}");
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

/// Install the global subscriber. Returns false if the host already
/// installed one.
pub fn init_tracing(directives: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(log_filter(directives))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directives_are_used() {
        let filter = log_filter(Some("grimoire_domain=trace"));
        assert_eq!(filter.to_string(), "grimoire_domain=trace");
    }

    #[test]
    fn invalid_directives_fall_back() {
        let filter = log_filter(Some("grimoire_engine=loud"));
        assert_eq!(filter.to_string(), EnvFilter::new(DEFAULT_LOG_FILTER).to_string());
    }

    #[test]
    fn second_init_is_refused() {
        init_tracing(Some("warn"));
        assert!(!init_tracing(Some("warn")));
    }
}
