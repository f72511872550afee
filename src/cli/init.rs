//! Init command - create the config and root store.

use std::path::PathBuf;

use tracing::info;

use crate::cli::{output, Context};
use crate::core::config::Config;
use crate::error::{ConfigError, Result};

/// Write a fresh config whose root store lives at `store`.
pub fn execute(ctx: &Context, store: Option<PathBuf>) -> Result<()> {
    if Config::exists(&ctx.config_path) {
        return Err(ConfigError::AlreadyInitialized(ctx.config_path.display().to_string()).into());
    }

    let store = match store {
        Some(path) if path.is_relative() => std::env::current_dir()?.join(path),
        Some(path) => path,
        None => Config::default_store_path()?,
    };
    info!(config = %ctx.config_path.display(), store = %store.display(), "initializing");

    std::fs::create_dir_all(&store)?;
    Config::new(&store).save(&ctx.config_path)?;

    output::success(&format!("initialized {}", output::path(ctx.config_path.display())));
    output::kv("root store:", store.display());
    Ok(())
}
