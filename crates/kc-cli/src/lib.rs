//! # kc-cli
//!
//! Command-line administration of Keycloak users.
//!
//! This crate provides:
//! - User management (create, get, list, update, delete) over the admin API
//! - Configuration of the server, realm and service-account credentials

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
