//! Mount commands (add, rm, list).

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cli::{output, Context};
use crate::core::cipher;
use crate::core::config::MountConfig;
use crate::core::path::PathArg;
use crate::core::store;
use crate::error::{MountError, Result};

/// One row of `mounts list --json`.
#[derive(Debug, Serialize)]
struct MountRow {
    prefix: String,
    store: String,
}

/// Mount a store directory at `prefix` and record it in the config.
pub fn add(
    ctx: &Context,
    prefix: &str,
    path: PathBuf,
    seal: bool,
    mut recipients: Vec<String>,
    identity: Option<PathBuf>,
) -> Result<()> {
    let prefix = PathArg::parse(prefix)?.key().to_string();
    if prefix.is_empty() {
        return Err(MountError::RootMount.into());
    }

    let mut config = ctx.config()?;
    if config.mounts.contains_key(&prefix) {
        return Err(MountError::AlreadyMounted(prefix).into());
    }

    let identity = match identity {
        Some(file) => {
            let public = cipher::load_identity(&file)?.to_public().to_string();
            if !recipients.contains(&public) {
                recipients.push(public);
            }
            Some(absolute(file)?)
        }
        None if seal => {
            let file = key_dir(&ctx.config_path).join(format!("{}.key", prefix.replace('/', "-")));
            recipients.push(cipher::generate_identity(&file)?);
            output::success(&format!("generated identity {}", output::path(file.display())));
            Some(file)
        }
        None => None,
    };
    let mount = MountConfig {
        path: absolute(path)?,
        recipients,
        identity,
    };

    let mut ns = config.open()?;
    config.mounts.insert(prefix.clone(), mount.clone());
    config.validate()?;
    ns.mount(&prefix, store::open(&mount)?)?;

    std::fs::create_dir_all(&mount.path)?;
    config.save(&ctx.config_path)?;

    info!(prefix = %prefix, sealed = mount.is_sealed(), "mount added");
    output::success(&format!(
        "mounted {} at {}",
        output::path(mount.path.display()),
        output::key(&prefix)
    ));
    Ok(())
}

/// Forget the mount at `prefix`. Its files stay on disk.
pub fn rm(ctx: &Context, prefix: &str) -> Result<()> {
    let prefix = PathArg::parse(prefix)?.key().to_string();
    if prefix.is_empty() {
        return Err(MountError::RootMount.into());
    }

    let mut config = ctx.config()?;
    let mount = config
        .mounts
        .remove(&prefix)
        .ok_or_else(|| MountError::NotMounted(prefix.clone()))?;
    config.save(&ctx.config_path)?;

    info!(prefix = %prefix, "mount removed");
    output::success(&format!("unmounted {}", output::key(&prefix)));
    output::kv("files kept at:", mount.path.display());
    Ok(())
}

/// List the root store and every mount.
pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let ns = ctx.namespace()?;
    let rows: Vec<MountRow> = ns
        .mounts()
        .mounts()
        .map(|m| MountRow {
            prefix: m.prefix().to_string(),
            store: m.store().describe(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    output::header("Mounts");
    output::rule();
    for row in rows {
        let prefix = if row.prefix.is_empty() { "/" } else { row.prefix.as_str() };
        output::kv(&output::key(prefix), row.store);
    }
    Ok(())
}

fn key_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|dir| dir.join("keys"))
        .unwrap_or_else(|| PathBuf::from("keys"))
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_relative() {
        Ok(std::env::current_dir()?.join(path))
    } else {
        Ok(path)
    }
}
