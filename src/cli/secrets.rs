//! Secret commands (ls, show, insert, rm, mv, cp).

use std::io::{self, IsTerminal, Read, Write};

use dialoguer::{Confirm, Password};
use tracing::info;

use crate::cli::{output, Context};
use crate::core::plan::{Report, Unit};
use crate::core::tree::{Kind, INF};
use crate::error::{Error, Result};

/// List secrets, or directories with `folders`.
pub fn ls(
    ctx: &Context,
    prefix: Option<&str>,
    depth: Option<usize>,
    folders: bool,
    json: bool,
) -> Result<()> {
    let ns = ctx.namespace()?;
    let depth = depth.unwrap_or(INF);
    let opts = &ctx.options;

    let entries = match (prefix, folders) {
        (None, false) => ns.list(opts, depth)?,
        (Some(prefix), false) => ns.list_under(opts, prefix, depth)?,
        (None, true) => ns.folders(opts, depth)?,
        (Some(prefix), true) => ns.folders_under(opts, prefix, depth)?,
    };
    let noun = if folders { "folders" } else { "secrets" };

    if json {
        let count = entries.len();
        let output = if folders {
            serde_json::json!({ "folders": entries, "count": count })
        } else {
            serde_json::json!({ "keys": entries, "count": count })
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if entries.is_empty() {
        output::dimmed(&format!("no {} stored", noun));
    } else {
        println!("{} {}:", entries.len(), noun);
        for entry in entries {
            println!("  {}", entry);
        }
    }
    Ok(())
}

/// Print a secret to stdout.
pub fn show(ctx: &Context, key: &str) -> Result<()> {
    let ns = ctx.namespace()?;
    let value = ns.get(key)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&value)?;
    if !value.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

/// Store a secret.
///
/// Without a value on the command line the value is read from stdin when it
/// is piped, or prompted for with hidden input.
pub fn insert(ctx: &Context, key: &str, value: Option<String>) -> Result<()> {
    let mut ns = ctx.namespace()?;

    let value = match value {
        Some(value) => value,
        None if !io::stdin().is_terminal() => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
        None => Password::new()
            .with_prompt(format!("Value for {}", output::key(key)))
            .interact()?,
    };

    let mut opts = ctx.options;
    if !opts.always_yes && ns.classify(key)? == Kind::Leaf && io::stdin().is_terminal() {
        output::warn(&format!("{} already exists", output::key(key)));
        let overwrite = Confirm::new()
            .with_prompt("Overwrite?")
            .default(false)
            .interact()?;
        opts = opts.with_always_yes(overwrite);
    }

    ns.set(&opts, key, value.as_bytes())?;
    info!(key, "secret stored");
    output::success(&format!("stored {}", output::key(key)));
    Ok(())
}

/// Delete a secret, or a directory with `recursive`.
pub fn rm(ctx: &Context, target: &str, recursive: bool) -> Result<()> {
    let mut ns = ctx.namespace()?;

    if recursive && !ctx.options.always_yes && ns.classify(target)? == Kind::Directory {
        let count = ns.list_under(&ctx.options.with_hidden(true), target, INF)?.len();
        let prompt = format!("Delete {} and {} secrets under it?", target, count);
        if !io::stdin().is_terminal() {
            return Err(Error::Aborted(format!(
                "{} (no terminal to confirm; pass --yes)",
                prompt
            )));
        }
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            return Err(Error::Aborted("nothing deleted".to_string()));
        }
    }

    let report = ns.delete(&ctx.options, target, recursive)?;
    summarize(&report);
    Ok(())
}

/// Move a secret or directory.
pub fn mv(ctx: &Context, source: &str, destination: &str) -> Result<()> {
    let mut ns = ctx.namespace()?;
    let report = ns.move_path(&ctx.options, source, destination)?;
    summarize(&report);
    Ok(())
}

/// Copy a secret or directory.
pub fn cp(ctx: &Context, source: &str, destination: &str) -> Result<()> {
    let mut ns = ctx.namespace()?;
    let report = ns.copy_path(&ctx.options, source, destination)?;
    summarize(&report);
    Ok(())
}

fn summarize(report: &Report) {
    let operation = report.operation();
    if report.is_empty() {
        output::dimmed(&format!("nothing to {}", operation));
        return;
    }

    let verb = match operation {
        "copy" => "copied",
        "move" => "moved",
        _ => "deleted",
    };
    let count = report.completed();
    let noun = if count == 1 { "secret" } else { "secrets" };
    output::success(&format!("{} {} {}", verb, count, noun));
    for (unit, _) in report.entries() {
        match unit {
            Unit::Relocate(relocation) => output::list_item(&relocation.to_string()),
            Unit::Remove(key) => output::list_item(key),
        }
    }
}
