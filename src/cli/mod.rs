//! Command-line interface.

pub mod completions;
pub mod init;
pub mod mounts;
pub mod output;
pub mod secrets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::namespace::Namespace;
use crate::core::options::Options;
use crate::error::Result;

/// Warren - a mountable secret namespace.
#[derive(Parser)]
#[command(
    name = "warren",
    about = "Route, move, copy and delete secrets across mounted stores",
    version
)]
pub struct Cli {
    /// Path to config.toml
    #[arg(long, global = true, env = "WARREN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every confirmation (overwrite, recursive delete)
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Include hidden entries (segments starting with '.') in listings
    #[arg(long, global = true)]
    pub hidden: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a config and an empty root store
    Init {
        /// Root store directory (default: platform data dir)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List secrets
    #[command(alias = "list")]
    Ls {
        /// Only list below this path
        prefix: Option<String>,
        /// Maximum depth, counted from the prefix
        #[arg(short, long)]
        depth: Option<usize>,
        /// List directories instead of secrets
        #[arg(long)]
        folders: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a secret
    Show {
        /// Secret key
        key: String,
    },

    /// Store a secret (value read from stdin or a prompt when omitted)
    Insert {
        /// Secret key
        key: String,
        /// Secret value
        value: Option<String>,
    },

    /// Delete a secret or directory
    Rm {
        /// Secret key or directory
        path: String,
        /// Delete directories and everything under them
        #[arg(short, long)]
        recursive: bool,
    },

    /// Move or rename a secret or directory
    Mv {
        /// Source path; a trailing '/' moves only the directory's contents
        source: String,
        /// Destination path; a trailing '/' means "into this directory"
        destination: String,
    },

    /// Copy a secret or directory
    Cp {
        /// Source path; a trailing '/' copies only the directory's contents
        source: String,
        /// Destination path; a trailing '/' means "into this directory"
        destination: String,
    },

    /// Manage mounted stores
    Mounts {
        #[command(subcommand)]
        action: MountAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Mount subcommands.
#[derive(Subcommand)]
pub enum MountAction {
    /// Mount a store directory at a prefix
    Add {
        /// Namespace prefix (e.g. work or work/team)
        prefix: String,
        /// Store directory
        path: PathBuf,
        /// Seal the store with age, generating an identity if none is given
        #[arg(long)]
        seal: bool,
        /// age recipient to seal for (repeatable)
        #[arg(long = "recipient")]
        recipients: Vec<String>,
        /// age identity file used to open the store
        #[arg(long)]
        identity: Option<PathBuf>,
    },

    /// Unmount the store at a prefix (its files are kept)
    Rm {
        /// Namespace prefix
        prefix: String,
    },

    /// List mounted stores
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Location of config.toml
    pub config_path: PathBuf,
    /// Per-call options handed to the namespace
    pub options: Options,
}

impl Context {
    /// Build the context from global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        Ok(Self {
            config_path,
            options: Options::new()
                .with_always_yes(cli.yes)
                .with_hidden(cli.hidden),
        })
    }

    /// Load the configuration.
    pub fn config(&self) -> Result<Config> {
        Config::load(&self.config_path)
    }

    /// Load the configuration and open the namespace.
    pub fn namespace(&self) -> Result<Namespace> {
        self.config()?.open()
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli)?;
    use Command::*;

    match cli.command {
        Init { store } => init::execute(&ctx, store),
        Ls {
            prefix,
            depth,
            folders,
            json,
        } => secrets::ls(&ctx, prefix.as_deref(), depth, folders, json),
        Show { key } => secrets::show(&ctx, &key),
        Insert { key, value } => secrets::insert(&ctx, &key, value),
        Rm { path, recursive } => secrets::rm(&ctx, &path, recursive),
        Mv {
            source,
            destination,
        } => secrets::mv(&ctx, &source, &destination),
        Cp {
            source,
            destination,
        } => secrets::cp(&ctx, &source, &destination),
        Mounts { action } => match action {
            MountAction::Add {
                prefix,
                path,
                seal,
                recipients,
                identity,
            } => mounts::add(&ctx, &prefix, path, seal, recipients, identity),
            MountAction::Rm { prefix } => mounts::rm(&ctx, &prefix),
            MountAction::List { json } => mounts::list(&ctx, json),
        },
        Completions { shell } => completions::execute(shell),
    }
}
