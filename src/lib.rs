pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod render;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr so stdout carries only report output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Binary entry point.
pub fn run() -> anyhow::Result<()> {
    init_tracing();
    tracing::debug!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    cli::run(cli::Cli::parse_args())
}
