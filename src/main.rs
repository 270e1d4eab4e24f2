//! sbom-graph: consolidated component graphs for SBOMs
//!
//! Builds one graph out of a CycloneDX document and renders it as a tree,
//! a flat table or JSON.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_graph::{
    cli::{self, SchemaKind},
    config::{self, DisplayOptions, FilterOptions, ViewConfig},
    render::OutputFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-graph")]
#[command(author)]
#[command(version)]
#[command(about = "Consolidated component graphs for SBOMs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Error occurred

EXAMPLES:
    # Tree view of a CycloneDX document
    sbom-graph view bom.cdx.json

    # Only components with high or critical vulnerabilities, as a table
    sbom-graph view bom.cdx.json -f flat --min-severity high

    # Complete graph as JSON
    sbom-graph view bom.cdx.json -f json -O graph.json")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `view` subcommand
#[derive(Parser)]
struct ViewArgs {
    /// Path to the SBOM file
    sbom: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Show license blocks
    #[arg(long)]
    show_licenses: bool,

    /// Show hash blocks
    #[arg(long)]
    show_hashes: bool,

    /// Show annotation blocks
    #[arg(long)]
    show_annotations: bool,

    /// Show composition blocks
    #[arg(long)]
    show_compositions: bool,

    /// Show property blocks
    #[arg(long)]
    show_properties: bool,

    /// Hide dependency blocks and dependency subtrees
    #[arg(long)]
    no_dependencies: bool,

    /// Hide vulnerability blocks
    #[arg(long)]
    no_vulnerabilities: bool,

    /// Suppress every detail block except licenses
    #[arg(long)]
    only_licenses: bool,

    /// Maximum tree depth below a root (0 = unlimited)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    max_depth: i64,

    /// Hide islands (components unreachable from the primary component)
    #[arg(long)]
    collapse_islands: bool,

    /// Render only the primary component's tree
    #[arg(long)]
    only_primary: bool,

    /// Show every entry of every block and every island member
    #[arg(long)]
    full: bool,

    /// Keep only these component types (comma-separated)
    #[arg(short = 't', long = "type", value_delimiter = ',')]
    types: Vec<String>,

    /// Keep only components with a vulnerability at or above this severity
    /// (none, low, medium, high, critical)
    #[arg(long)]
    min_severity: Option<String>,

    /// Keep only components with an unresolved vulnerability
    #[arg(long)]
    only_unresolved: bool,
}

impl ViewArgs {
    fn into_config(self, no_color: bool) -> ViewConfig {
        ViewConfig {
            format: self.format.unwrap_or_default(),
            output: self.output_file,
            no_color,
            display: DisplayOptions {
                show_dependencies: !self.no_dependencies,
                show_vulnerabilities: !self.no_vulnerabilities,
                show_annotations: self.show_annotations,
                show_compositions: self.show_compositions,
                show_properties: self.show_properties,
                show_hashes: self.show_hashes,
                show_licenses: self.show_licenses,
                max_depth: self.max_depth,
                collapse_islands: self.collapse_islands,
                verbose: self.full,
                only_primary: self.only_primary,
                show_only_licenses: self.only_licenses,
            },
            filter: FilterOptions {
                types: self.types,
                min_severity: self.min_severity,
                only_unresolved: self.only_unresolved,
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the component graph of an SBOM
    View(ViewArgs),

    /// Print the JSON Schema of the JSON output (or of the config file)
    Schema {
        /// Print the config file schema instead
        #[arg(long)]
        config_file: bool,

        /// Write schema to file instead of stdout
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
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
    /// Generate an example .sbom-graph.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered output on stdout stays clean
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
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

    match cli.command {
        Commands::View(args) => {
            let sbom = args.sbom.clone();
            let overrides = args.into_config(cli.no_color);
            let (mut config, loaded_from) = config::load_or_default(cli.config.as_deref())
                .context("failed to load config file")?;
            if let Some(path) = &loaded_from {
                tracing::debug!("using config file {}", path.display());
            }
            config.merge(&overrides);

            let exit_code = cli::run_view(config, &sbom)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Schema {
            config_file,
            output,
        } => {
            let kind = if config_file {
                SchemaKind::Config
            } else {
                SchemaKind::Output
            };
            cli::run_schema(kind, output)?;
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-graph", &mut io::stdout());
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref())
                    .context("failed to load config file")?;
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
                    ::dirs::config_dir().map(|p| p.join("sbom-graph").display().to_string()),
                    ::dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".sbom-graph.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
