use logkeep::cli::{print_error, Cli};
use tracing_subscriber::EnvFilter;

/// Env var holding the diagnostic log filter
const LOG_FILTER_ENV: &str = "LOGKEEP_LOG";

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so they never mix with command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = Cli::run().await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
