//! Batch aggregation of VLESS links into a Clash.Meta document.

use log::{info, warn};

use super::types::{ConfigDocument, ProxyGroup};
use crate::settings::Settings;
use crate::vless::{self, MalformedUriError, NodeDescriptor};

/// A rejected input line and the reason it was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based position in the input
    pub line_number: usize,
    pub line: String,
    pub error: MalformedUriError,
}

/// Raised when no line produced a node
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no valid nodes found ({rejected} of {total} lines rejected)")]
pub struct EmptyBatchError {
    pub total: usize,
    pub rejected: usize,
}

/// Outcome of one aggregation run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    document: Option<ConfigDocument>,
    diagnostics: Vec<LineDiagnostic>,
    total_lines: usize,
}

impl BatchReport {
    /// The assembled document, or [`EmptyBatchError`] when nothing parsed
    pub fn document(&self) -> Result<&ConfigDocument, EmptyBatchError> {
        self.document.as_ref().ok_or_else(|| self.empty_batch_error())
    }

    /// Consume the report, keeping the document
    pub fn into_document(self) -> Result<ConfigDocument, EmptyBatchError> {
        let error = self.empty_batch_error();
        self.document.ok_or(error)
    }

    pub fn diagnostics(&self) -> &[LineDiagnostic] {
        &self.diagnostics
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Number of nodes in the document
    pub fn node_count(&self) -> usize {
        self.document.as_ref().map_or(0, |doc| doc.proxies().len())
    }

    fn empty_batch_error(&self) -> EmptyBatchError {
        EmptyBatchError {
            total: self.total_lines,
            rejected: self.diagnostics.len(),
        }
    }
}

/// Parse every line and assemble the configuration document.
///
/// A malformed line never aborts the batch: it is logged, recorded as a
/// [`LineDiagnostic`] and left out. Nodes without any name are labelled
/// from their 1-based input position, so line 7 is always `<prefix>7`
/// no matter how many earlier lines failed.
pub fn aggregate<I, S>(lines: I, settings: &Settings) -> BatchReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut nodes: Vec<NodeDescriptor> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut total_lines = 0;

    for (idx, line) in lines.into_iter().enumerate() {
        let line_number = idx + 1;
        let line = line.as_ref().trim();
        total_lines += 1;

        match vless::parse(line, settings) {
            Ok(mut node) => {
                if !node.has_name() {
                    node.name = settings.fallback_name(line_number);
                }
                nodes.push(node);
            }
            Err(error) => {
                warn!("Skipping invalid link: {}\n   Reason: {}", line, error);
                diagnostics.push(LineDiagnostic {
                    line_number,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }

    if nodes.is_empty() {
        warn!("No valid nodes found in {} lines", total_lines);
        return BatchReport {
            document: None,
            diagnostics,
            total_lines,
        };
    }

    info!(
        "Parsed {} nodes ({} lines skipped)",
        nodes.len(),
        diagnostics.len()
    );

    BatchReport {
        document: Some(assemble(nodes, settings)),
        diagnostics,
        total_lines,
    }
}

fn assemble(nodes: Vec<NodeDescriptor>, settings: &Settings) -> ConfigDocument {
    let group = ProxyGroup {
        name: settings.group_name.clone(),
        kind: settings.group_kind.clone(),
        proxies: nodes.iter().map(|node| node.name.clone()).collect(),
    };
    let rules = vec![settings.direct_rule(), settings.match_rule()];

    ConfigDocument::new(nodes, group, rules)
}
