//! OpenAPI command implementation

use crate::cli::commands::load_config;
use crate::cli::error::CliError;
use crate::convert::Converter;
use crate::models::OpenAPIFormat;
use std::path::{Path, PathBuf};

/// Arguments of `xmi-schema-cli openapi`
#[derive(Debug, Clone)]
pub struct OpenApiArgs {
    /// Version folder whose schema directory is read
    pub folder: PathBuf,
    /// Project root holding the config file; the folder's parent by default
    pub root: Option<PathBuf>,
    pub format: Option<OpenAPIFormat>,
}

/// Handle the openapi command: rebuild the OpenAPI document from the schema
/// files already present.
pub fn handle_openapi(args: &OpenApiArgs) -> Result<(), CliError> {
    if !args.folder.is_dir() {
        return Err(CliError::FileNotFound(args.folder.clone()));
    }
    let root = args
        .root
        .clone()
        .or_else(|| args.folder.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = load_config(&root)?;
    if let Some(format) = args.format {
        config.output.openapi_format = format;
    }

    let path = Converter::new(root, config).regenerate_openapi(&args.folder)?;
    println!("OpenAPI document written to {}", path.display());
    Ok(())
}
