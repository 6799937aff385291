use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;

use vless2clash::clash;
use vless2clash::loader::{self, OutputFormat};
use vless2clash::settings::{Settings, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE};

/// Generate a Clash.Meta configuration from a text file of VLESS links
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file containing one VLESS link per line
    #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Output path for the generated Clash.Meta configuration
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Optional YAML file overriding group name, rules and naming
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Load settings, falling back to the built-in defaults
    let settings = match &args.settings {
        Some(path) => loader::load_settings(path)
            .wrap_err_with(|| format!("Failed to load settings '{}'", path.display()))?,
        None => Settings::default(),
    };

    // Read the links
    let lines = loader::read_lines(&args.input)
        .wrap_err_with(|| format!("Failed to read input file '{}'", args.input.display()))?;

    // Parse every link, skipping malformed ones
    let report = clash::aggregate(&lines, &settings);
    if !report.diagnostics().is_empty() {
        warn!(
            "Skipped {} of {} lines",
            report.diagnostics().len(),
            report.total_lines()
        );
    }

    // Nothing to write when no link survived
    let document = match report.document() {
        Ok(document) => document,
        Err(e) => bail!("{}, no configuration written", e),
    };

    // Write the configuration
    loader::write_document(document, &args.output, args.format)
        .wrap_err_with(|| format!("Failed to write '{}'", args.output.display()))?;

    info!("Generated Clash.Meta configuration: {:?}", args.output);
    info!("Total nodes: {}", report.node_count());
    Ok(())
}
