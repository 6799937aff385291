use serde::{Deserialize, Serialize};

/// Default input file holding one VLESS link per line
pub const DEFAULT_INPUT_FILE: &str = "nodes.txt";

/// Default path of the generated Clash.Meta configuration
pub const DEFAULT_OUTPUT_FILE: &str = "clash_meta_from_txt.yaml";

/// Converter settings shared by the parser and the aggregator.
///
/// Built once at startup (from defaults or a YAML file) and passed by
/// reference afterwards; nothing mutates it during a run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Scheme prefix every accepted line must start with
    pub scheme_prefix: String,
    /// Transport used when the link carries no `type` parameter
    pub default_transport: String,
    /// Name of the selector group collecting every node
    pub group_name: String,
    /// Kind of the selector group
    pub group_kind: String,
    /// Region code routed directly by the GEOIP rule
    pub direct_region: String,
    /// Prefix for positional names given to nodes without any name
    pub fallback_name_prefix: String,
}

impl Settings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.scheme_prefix.is_empty() {
            return Err(SettingsError::InvalidField(
                "scheme_prefix cannot be empty".to_string(),
            ));
        }

        // Link delimiters inside the prefix would be split off before it is stripped
        if self.scheme_prefix.contains(['#', '@', '?']) {
            return Err(SettingsError::InvalidField(format!(
                "scheme_prefix '{}' cannot contain '#', '@' or '?'",
                self.scheme_prefix
            )));
        }

        if self.default_transport.is_empty() {
            return Err(SettingsError::InvalidField(
                "default_transport cannot be empty".to_string(),
            ));
        }

        if self.group_name.is_empty() || self.group_kind.is_empty() {
            return Err(SettingsError::InvalidGroup(
                "group_name and group_kind cannot be empty".to_string(),
            ));
        }

        // Rules are comma separated, a comma here would split the rule
        if self.group_name.contains(',') {
            return Err(SettingsError::InvalidGroup(format!(
                "group_name '{}' cannot contain ','",
                self.group_name
            )));
        }

        if self.direct_region.is_empty() || self.direct_region.contains(',') {
            return Err(SettingsError::InvalidRule(format!(
                "direct_region '{}' must be a non-empty region code",
                self.direct_region
            )));
        }

        Ok(())
    }

    /// GEOIP rule sending the configured region around the proxy
    pub fn direct_rule(&self) -> String {
        format!("GEOIP,{},DIRECT", self.direct_region)
    }

    /// Catch-all rule routing everything else to the selector group
    pub fn match_rule(&self) -> String {
        format!("MATCH,{}", self.group_name)
    }

    /// Positional label for a node whose link carried no usable name
    pub fn fallback_name(&self, line_number: usize) -> String {
        format!("{}{}", self.fallback_name_prefix, line_number)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scheme_prefix: "vless://".to_string(),
            default_transport: "ws".to_string(),
            group_name: "Proxy".to_string(),
            group_kind: "select".to_string(),
            direct_region: "CN".to_string(),
            fallback_name_prefix: "节点_".to_string(),
        }
    }
}

/// Settings validation errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid settings field: {0}")]
    InvalidField(String),
    #[error("Invalid selector group: {0}")]
    InvalidGroup(String),
    #[error("Invalid routing rule: {0}")]
    InvalidRule(String),
}
