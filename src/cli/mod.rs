//! Command line interface support for `xmi-schema-cli`

pub mod commands;
pub mod error;

pub use error::CliError;
