//! enrol-server CLI
//!
//! Runs the registration form.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use enrol_client::{DEFAULT_DEPARTMENTS_URL, DEFAULT_USERS_URL, Endpoints};
use enrol_forms::Locale;
use enrol_server::Config;
use enrol_server::config::DEFAULT_LISTEN;

/// Registration form server.
#[derive(Parser)]
#[command(name = "enrol-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(short, long, env = "ENROL_LISTEN", default_value = DEFAULT_LISTEN)]
    listen: SocketAddr,

    /// URL of the department list document.
    #[arg(long, env = "ENROL_DEPARTMENTS_URL", default_value = DEFAULT_DEPARTMENTS_URL)]
    departments_url: String,

    /// URL submissions are POSTed to.
    #[arg(long, env = "ENROL_USERS_URL", default_value = DEFAULT_USERS_URL)]
    users_url: String,

    /// Interface language (en, pl).
    #[arg(long, env = "ENROL_LOCALE", default_value = "en")]
    locale: Locale,

    /// Seconds the success banner stays visible.
    #[arg(long, default_value_t = 3)]
    banner_seconds: u64,

    /// Timeout for remote requests, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_seconds: u64,

    /// Idle sessions are dropped after this many seconds.
    #[arg(long, default_value_t = 1800)]
    session_idle_seconds: u64,

    /// Most sessions kept at once.
    #[arg(long, default_value_t = 10_000)]
    max_sessions: usize,

    /// Largest accepted request body, in bytes.
    #[arg(long, default_value_t = enrol_server::request::DEFAULT_BODY_LIMIT)]
    max_body_bytes: usize,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config {
        listen: cli.listen,
        endpoints: Endpoints {
            departments_url: cli.departments_url,
            users_url: cli.users_url,
        },
        locale: cli.locale,
        banner_duration: Duration::from_secs(cli.banner_seconds),
        request_timeout: Duration::from_secs(cli.timeout_seconds),
        session_idle_timeout: Duration::from_secs(cli.session_idle_seconds),
        max_sessions: cli.max_sessions,
        max_body_bytes: cli.max_body_bytes,
    };

    enrol_server::run(config).await?;
    Ok(())
}
