//! Convert command implementation

use crate::cli::commands::load_config;
use crate::cli::error::CliError;
use crate::convert::{ConversionReport, Converter};
use crate::models::OpenAPIFormat;
use std::path::PathBuf;

/// Arguments of `xmi-schema-cli convert`
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Version folder name; all version folders when `None`
    pub version: Option<String>,
    /// Project root holding the version folders and the config file
    pub root: PathBuf,
    /// Overrides `run.timeout_secs`
    pub timeout_secs: Option<u64>,
    /// Process files one at a time
    pub sequential: bool,
    /// Overrides `output.openapi_format`
    pub format: Option<OpenAPIFormat>,
    /// Print the report as JSON
    pub json: bool,
    /// Fail when any file-level error was recorded
    pub strict: bool,
}

/// Handle the convert command
pub fn handle_convert(args: &ConvertArgs) -> Result<(), CliError> {
    if !args.root.is_dir() {
        return Err(CliError::FileNotFound(args.root.clone()));
    }

    let mut config = load_config(&args.root)?;
    if let Some(secs) = args.timeout_secs {
        config.run.timeout_secs = Some(secs);
    }
    if args.sequential {
        config.run.parallel = false;
    }
    if let Some(format) = args.format {
        config.output.openapi_format = format;
    }

    let converter = Converter::new(&args.root, config);
    let report = converter.convert(args.version.as_deref())?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize report: {}", e)))?;
        println!("{}", json);
    } else {
        print_summary(&report);
    }

    check_outcome(&report, args.strict)
}

/// Exit status policy: fatal folders always fail, file errors only with `--strict`
pub fn check_outcome(report: &ConversionReport, strict: bool) -> Result<(), CliError> {
    if report.has_fatal() || (strict && report.error_count() > 0) {
        return Err(CliError::ConversionFailed(report.error_count()));
    }
    Ok(())
}

fn print_summary(report: &ConversionReport) {
    for folder in &report.folders {
        println!("{}", folder.folder.display());
        if let Some(fatal) = &folder.fatal {
            println!("  failed: {}", fatal);
        }
        println!(
            "  {} converted, {} skipped, {} schemas",
            folder.processed, folder.skipped, folder.schemas
        );
        for error in &folder.errors {
            println!("  {}: {}", error.file, error.reason);
        }
        if let Some(openapi) = &folder.openapi {
            println!("  OpenAPI: {}", openapi.display());
        }
    }
    println!(
        "{} folder(s), {} schema(s), {} error(s)",
        report.folders.len(),
        report.total_schemas(),
        report.error_count()
    );
}
