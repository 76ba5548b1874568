//! sbom-convert: SPDX to `CycloneDX` conversion tool
//!
//! Reads an SPDX 2.x document (JSON or tag-value) and writes the equivalent
//! `CycloneDX` 1.5 JSON document.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_convert::{
    cli,
    config::{AppConfig, CliOverrides, CONFIG_FILE_NAMES},
    pipeline::exit_codes,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nInput Formats:",
        "\n  SPDX:      2.2, 2.3 (JSON, tag-value)",
        "\n\nOutput Formats:",
        "\n  CycloneDX: 1.5 (JSON)",
    )
}

#[derive(Parser)]
#[command(name = "sbom-convert")]
#[command(author)]
#[command(version, long_version = build_long_version())]
#[command(about = "Convert SPDX SBOMs to CycloneDX", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    3  Error occurred

EXAMPLES:
    # Convert to stdout
    sbom-convert convert app.spdx.json

    # Convert from stdin to a file, validating the result
    cat app.spdx | sbom-convert convert - -O app.cdx.json --validate

    # Reproducible output for CI caches
    sbom-convert convert app.spdx.json --deterministic -O app.cdx.json

    # Check a CycloneDX document
    sbom-convert validate app.cdx.json --fail-on-warning")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `convert` subcommand
#[derive(clap::Args)]
struct ConvertArgs {
    /// SPDX document to convert (`-` reads stdin)
    input: PathBuf,

    /// Write the CycloneDX document to a file instead of stdout
    #[arg(short = 'O', long = "output")]
    output_file: Option<PathBuf>,

    /// Re-parse and structurally check the produced document
    #[arg(long)]
    validate: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Derive the serial number from the input so identical inputs give identical output
    #[arg(long)]
    deterministic: bool,

    /// Only use the RootPackage sentinel to pick the metadata component
    #[arg(long)]
    no_describes_root: bool,
}

/// Arguments for the `validate` subcommand
#[derive(clap::Args)]
struct ValidateArgs {
    /// CycloneDX JSON document to check (`-` reads stdin)
    path: PathBuf,

    /// Treat warnings (dangling or duplicate dependency refs) as errors
    #[arg(long)]
    fail_on_warning: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an SPDX document to CycloneDX
    Convert(ConvertArgs),

    /// Structurally validate a CycloneDX document
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the JSON Schema of the configuration file
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sbom-convert.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the converted document
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_codes::ERROR);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => {
            let overrides = CliOverrides {
                validate: args.validate,
                compact: args.compact,
                deterministic: args.deterministic,
                no_describes_root: args.no_describes_root,
                output_file: args.output_file,
            };
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }
            cli::run_convert(&args.input, &config)?;
            Ok(())
        }

        Commands::Validate(args) => {
            cli::run_validate(&args.path, args.fail_on_warning)?;
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-convert", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = sbom_convert::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    sbom_convert::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    sbom_convert::config::user_config_dir().map(|p| p.display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match sbom_convert::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found (using defaults)"),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".sbom-convert.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = sbom_convert::config::generate_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
