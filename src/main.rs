//! # firefetch
//!
//! Command-line client for a Firebase Realtime Database: authenticate with
//! a service account, read one path, print the result.
//!
//! ```bash
//! export FIRE_URL=https://my-project.firebaseio.com
//! export FIRE_ACCOUNT=~/keys/my-project-admin.json
//!
//! firefetch -p /users/alice   # full subtree, indented
//! firefetch -s /users         # one level, nested objects as `true`
//! firefetch -k -a /users      # child keys, prefixed with the path
//! ```
//!
//! Exit codes: `0` success, `1` usage or missing environment variable,
//! `2` authentication, network, or encoding failure.

use clap::Parser;
use firefetch::{commands, error::FetchError, usage, Cli};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        commands::completions::run(shell);
        return;
    }

    setup_logging(cli.verbose);

    match commands::run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(FetchError::Usage) => {
            let program = std::env::args()
                .next()
                .unwrap_or_else(|| "firefetch".to_string());
            println!("{}", usage(&program));
            std::process::exit(FetchError::Usage.exit_code());
        }
        Err(e) => {
            tracing::debug!(error = ?e, "fetch failed");
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
