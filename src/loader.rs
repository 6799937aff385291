//! Input and output glue around the converter.
//!
//! Reads link files, loads optional settings files and writes the finished
//! [`ConfigDocument`] as YAML or JSON.

use crate::clash::ConfigDocument;
use crate::settings::{Settings, SettingsError};
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serialization format of the generated configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Errors raised while reading inputs or writing the document
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Input file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),

    #[error("Failed to serialize configuration as YAML: {0}")]
    SerializeYaml(#[source] serde_yaml::Error),

    #[error("Failed to serialize configuration as JSON: {0}")]
    SerializeJson(#[source] serde_json::Error),
}

fn io_error(path: &Path, source: std::io::Error) -> LoaderError {
    if source.kind() == std::io::ErrorKind::NotFound {
        LoaderError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Split text into trimmed, non-blank lines
pub fn collect_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a link file, one link per line
pub fn read_lines(path: &Path) -> Result<Vec<String>, LoaderError> {
    info!("Reading links from: {:?}", path);

    // Read the whole file, a missing file is reported as NotFound
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;

    // Drop blank lines so positions count non-blank links only
    Ok(collect_lines(&content))
}

/// Load and validate a YAML settings file
pub fn load_settings(path: &Path) -> Result<Settings, LoaderError> {
    info!("Loading settings from: {:?}", path);

    // Open the settings file
    let file = File::open(path).map_err(|e| io_error(path, e))?;

    // Parse the YAML content, missing fields keep their defaults
    let settings: Settings =
        serde_yaml::from_reader(file).map_err(|source| LoaderError::Settings {
            path: path.to_path_buf(),
            source,
        })?;

    // Validate the settings
    settings.validate()?;

    Ok(settings)
}

/// Serialize a document to a string in the requested format
pub fn render_document(
    document: &ConfigDocument,
    format: OutputFormat,
) -> Result<String, LoaderError> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(document).map_err(LoaderError::SerializeYaml),
        OutputFormat::Json => serde_json::to_string_pretty(document)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(LoaderError::SerializeJson),
    }
}

/// Write the document to `path`, replacing any existing file
pub fn write_document(
    document: &ConfigDocument,
    path: &Path,
    format: OutputFormat,
) -> Result<(), LoaderError> {
    // Render first so a serialization failure leaves no partial file behind
    let rendered = render_document(document, format)?;

    // Create the output directory if needed
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    // Write the configuration
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(rendered.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| io_error(path, e))?;

    info!("Wrote {} nodes to {:?}", document.proxies().len(), path);
    Ok(())
}
