//! Sanitize command implementation

use crate::cli::error::CliError;
use crate::validation::input::sanitize_class_name;

/// Handle the sanitize command: print the schema file name for a class name
pub fn handle_sanitize(name: &str) -> Result<(), CliError> {
    println!("{}.json", sanitize_class_name(name));
    Ok(())
}
