use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a verbosity level.
fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "sensectl=error";
    }
    match verbose {
        0 => "sensectl=warn",
        1 => "sensectl=info",
        2 => "sensectl=debug",
        _ => "sensectl=trace",
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    if io::stderr().is_terminal() {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .compact()
            .with_writer(io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
