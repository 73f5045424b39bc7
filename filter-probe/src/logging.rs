//! Logging setup. Logs always go to stderr; stdout carries the report.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber built by [`subscriber`].
pub fn setup_logging(directives: &str, pretty: bool) {
    subscriber(directives, pretty).init()
}

/// A subscriber that writes pretty or JSON events to stderr. `RUST_LOG`
/// takes precedence over `directives`.
pub fn subscriber(
    directives: &str,
    pretty: bool,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    // Exactly one of the two layers is present.
    let pretty_layer = pretty.then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
    });
    let json_layer = (!pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(false)
            .with_current_span(true)
            .with_span_list(true)
            .with_line_number(true)
            .with_file(true)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
}
