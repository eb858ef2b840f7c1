//! CLI binary entry point for xmi-schema-cli

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;
#[cfg(feature = "cli")]
use xmi_schema::cli::commands::convert::{ConvertArgs, handle_convert};
#[cfg(feature = "cli")]
use xmi_schema::cli::commands::openapi::{OpenApiArgs, handle_openapi};
#[cfg(feature = "cli")]
use xmi_schema::cli::commands::sanitize::handle_sanitize;
#[cfg(feature = "cli")]
use xmi_schema::cli::commands::validate::handle_validate;
#[cfg(feature = "cli")]
use xmi_schema::models::OpenAPIFormat;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "xmi-schema-cli")]
#[command(about = "Convert XMI UML class models to JSON Schema and OpenAPI")]
#[command(version)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert one version folder, or all of them
    Convert {
        /// Version folder name (e.g. v2.1.0); all v* folders when omitted
        version: Option<String>,
        /// Project root containing the version folders
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Stop starting new files after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Process files one at a time
        #[arg(long)]
        sequential: bool,
        /// OpenAPI output format (json or yaml)
        #[arg(short, long)]
        format: Option<OpenAPIFormat>,
        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,
        /// Exit with an error when any file was skipped
        #[arg(long)]
        strict: bool,
    },
    /// Validate a single XMI file and list its classes
    Validate {
        /// XMI file
        input: PathBuf,
    },
    /// Print the schema file name for a class name
    Sanitize {
        /// UML class name
        name: String,
    },
    /// Regenerate the OpenAPI document from an existing schema directory
    Openapi {
        /// Version folder
        folder: PathBuf,
        /// Project root containing the config file (defaults to the folder's parent)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// OpenAPI output format (json or yaml)
        #[arg(short, long)]
        format: Option<OpenAPIFormat>,
    },
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            version,
            root,
            timeout,
            sequential,
            format,
            json,
            strict,
        } => handle_convert(&ConvertArgs {
            version,
            root,
            timeout_secs: timeout,
            sequential,
            format,
            json,
            strict,
        }),
        Commands::Validate { input } => handle_validate(&input),
        Commands::Sanitize { name } => handle_sanitize(&name),
        Commands::Openapi {
            folder,
            root,
            format,
        } => handle_openapi(&OpenApiArgs {
            folder,
            root,
            format,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
