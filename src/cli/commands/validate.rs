//! Validate command implementation

use crate::cli::error::CliError;
use crate::import::{XMIImporter, decode_xmi_bytes};
use crate::validation::input::validate_xmi_file_size;
use crate::validation::xmi::{XmiValidation, validate_xmi};
use std::path::Path;

/// Handle the validate command: check one XMI file and list its classes
pub fn handle_validate(input: &Path) -> Result<(), CliError> {
    if !input.is_file() {
        return Err(CliError::FileNotFound(input.to_path_buf()));
    }
    let bytes =
        std::fs::read(input).map_err(|e| CliError::FileReadError(input.to_path_buf(), e.to_string()))?;
    validate_xmi_file_size(bytes.len() as u64)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let decoded = decode_xmi_bytes(&bytes);
    if let XmiValidation::Invalid(reason) = validate_xmi(&decoded.text) {
        return Err(CliError::ValidationError(reason.to_string()));
    }

    let result = XMIImporter::new().import(&decoded.text)?;
    println!("Validation successful");
    println!("{} class(es)", result.classes.len());
    for class in &result.classes {
        println!("  {} ({} attributes)", class.name, class.attributes.len());
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }
    Ok(())
}
