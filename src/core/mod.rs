//! Core library components.
//!
//! Everything that does not touch the terminal: stores, mount routing, the
//! merged namespace view and the path operations on top of it.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod mount;
pub mod namespace;
pub mod options;
pub mod path;
pub mod plan;
pub mod store;
pub mod tree;
pub mod types;
pub mod validation;
