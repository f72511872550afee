//! Warren - a mountable secret namespace.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warren::cli::output;
use warren::cli::{execute, Cli};
use warren::core::constants::LOG_ENV;
use warren::error::{ConfigError, Error, PathError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("warren=debug")
        } else {
            EnvFilter::new("warren=warn")
        }
    });

    let json_logs = std::env::var(format!("{}_FORMAT", LOG_ENV)).is_ok_and(|v| v == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized(_)) => Some("run: warren init"),
            Error::Path(PathError::AlreadyExists(_)) => Some("rerun with --yes to overwrite"),
            Error::Path(PathError::IsDirectory(_)) => {
                Some("use `warren ls` to see its contents, or `rm -r` to delete it")
            }
            Error::Path(PathError::NotFound { .. }) => Some("run: warren ls"),
            Error::Partial(_) => Some("completed secrets stay in place; run: warren ls"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
