use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Filter variable, e.g. `TEXTFLOW_LOG=textflow_session=debug`.
pub const LOG_ENV: &str = "TEXTFLOW_LOG";

static INIT: Once = Once::new();

/// Install a stderr subscriber. Stdout carries command output only.
pub fn init_tracing(json: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let builder = tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(true)
            .with_env_filter(filter);
        if json {
            builder
                .json()
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
                .init();
        } else {
            builder.init();
        }
    });
}
