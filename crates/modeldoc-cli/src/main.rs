use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use modeldoc_core::{Config, Diagnostic, DiagnosticCode, Report, Severity};
use modeldoc_vpax::{extract, ContainerLimits, ModelGraph, VpaxContainer};

/// Modeldoc - semantic model documentation extractor for VPAX archives
#[derive(Parser)]
#[command(name = "modeldoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: modeldoc.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables, columns, measures and relationships into report.json
    Extract {
        /// Path to the VPAX archive
        archive: PathBuf,

        /// Archive member holding the model document
        #[arg(short, long)]
        member: Option<String>,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also write a Graphviz DOT diagram of the table graph
        #[arg(short, long)]
        dot: Option<PathBuf>,
    },

    /// List the members of a VPAX archive
    Members {
        /// Path to the VPAX archive
        archive: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("modeldoc.toml").exists() {
        Config::from_file(Path::new("modeldoc.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Extract {
            archive,
            member,
            output,
            dot,
        } => extract_command(
            &config,
            &archive,
            member.as_deref(),
            &output,
            dot.as_deref(),
            cli.verbose,
        ),
        Commands::Members { archive } => members_command(&config, &archive),
    }
}

/// Extract command - run the full extraction pipeline over one archive
fn extract_command(
    config: &Config,
    archive: &Path,
    member: Option<&str>,
    output: &Path,
    dot: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let limits = container_limits(config);
    let mut container = VpaxContainer::open_with_limits(archive, limits)?;

    if verbose {
        eprintln!(
            "{} {} ({} members)",
            "Opened".cyan(),
            archive.display(),
            container.len()
        );
    }

    let member = member.unwrap_or(&config.member);
    let document = container.read_model(member)?;

    if verbose {
        eprintln!("{} {}", "Extracting model from member".cyan(), member);
    }

    let extraction = extract(&document);
    let mut report = Report::from_records(
        archive.display().to_string(),
        extraction.tables,
        extraction.columns,
        extraction.measures,
        extraction.relationships,
    );

    // The diagram is a visualization convenience: a failure to write it is
    // a warning in the report, not a pipeline error.
    if config.graph.enabled {
        let graph = ModelGraph::build(&report.tables, &report.relationships);

        if verbose {
            eprintln!(
                "{} {} nodes, {} edges",
                "Table graph:".cyan(),
                graph.node_count(),
                graph.edge_count()
            );
        }

        if let Some(dot_path) = dot {
            match std::fs::write(dot_path, graph.to_dot()) {
                Ok(()) => {
                    if verbose {
                        eprintln!("{} {}", "Diagram written to".green(), dot_path.display());
                    }
                }
                Err(e) => {
                    eprintln!(
                        "{} could not write diagram {}: {}",
                        "warning:".yellow(),
                        dot_path.display(),
                        e
                    );
                    report.add_diagnostic(
                        Diagnostic::new(
                            DiagnosticCode::GraphRenderFailed,
                            Severity::Warn,
                            format!("could not write diagram: {}", e),
                        )
                        .with_subject(dot_path.display().to_string()),
                    );
                }
            }
        }
    } else if dot.is_some() {
        eprintln!(
            "{} graph output disabled in config, skipping diagram",
            "warning:".yellow()
        );
    }

    report.save_to_file(output)?;

    println!(
        "{} {} tables, {} columns, {} measures, {} relationships -> {}",
        "Extracted".green(),
        report.summary.tables,
        report.summary.columns,
        report.summary.measures,
        report.summary.relationships,
        output.display()
    );

    Ok(())
}

/// Members command - list archive members
fn members_command(config: &Config, archive: &Path) -> Result<()> {
    let container = VpaxContainer::open_with_limits(archive, container_limits(config))?;

    for name in container.member_names() {
        println!("{}", name);
    }

    Ok(())
}

fn container_limits(config: &Config) -> ContainerLimits {
    ContainerLimits {
        max_entries: config.limits.max_entries,
        max_member_bytes: config.limits.max_member_bytes,
    }
}
