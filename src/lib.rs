//! Warren - a mountable secret namespace.
//!
//! Secrets live in independent stores. Warren mounts those stores at key
//! prefixes and presents them as one hierarchical namespace in which
//! secrets can be listed, moved, copied and deleted with `mv`/`cp`/`rm`
//! semantics, across store boundaries.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create config and root store
//! │   ├── secrets       # ls / show / insert / rm / mv / cp
//! │   ├── mounts        # Mount management
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # config.toml management
//!     ├── cipher        # age encryption for sealed stores
//!     ├── store/        # Storage backends
//!     │   ├── mod       # Store trait
//!     │   ├── fs        # One file per secret
//!     │   ├── memory    # In-process map
//!     │   └── sealed    # Encrypting decorator
//!     ├── mount         # Prefix routing
//!     ├── tree          # Merged, ordered key set
//!     ├── plan          # Per-secret units and reports
//!     └── namespace     # list / get / set / mv / cp / rm
//! ```
//!
//! # Example
//!
//! ```
//! use warren::core::namespace::Namespace;
//! use warren::core::options::Options;
//! use warren::core::store::Memory;
//! use warren::core::tree::INF;
//!
//! let mut ns = Namespace::with_root(Memory::with_entries([("foo/bar", "1"), ("misc/zab", "2")]))?;
//! let opts = Options::new();
//!
//! ns.move_path(&opts, "foo", "misc")?;
//! assert_eq!(ns.list(&opts, INF)?, vec!["misc/foo/bar", "misc/zab"]);
//! # Ok::<(), warren::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
