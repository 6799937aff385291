//! Clash.Meta configuration document types.
//!
//! [`ConfigDocument`] owns the parsed nodes; [`ProxyEntry`] and friends are
//! the borrowed wire shape used when the document is serialized, so the
//! field names and order match what Clash.Meta expects.

use serde::{Serialize, Serializer};

use crate::vless::{NodeDescriptor, TransportOptions};

/// Selector group referencing nodes by name.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Node names in document order, duplicates kept
    pub proxies: Vec<String>,
}

/// The finished configuration: nodes, one selector group and the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    proxies: Vec<NodeDescriptor>,
    group: ProxyGroup,
    rules: Vec<String>,
}

impl ConfigDocument {
    pub(crate) fn new(proxies: Vec<NodeDescriptor>, group: ProxyGroup, rules: Vec<String>) -> Self {
        Self { proxies, group, rules }
    }

    /// Nodes in original input order
    pub fn proxies(&self) -> &[NodeDescriptor] {
        &self.proxies
    }

    pub fn group(&self) -> &ProxyGroup {
        &self.group
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ClashConfig {
            proxies: self.proxies.iter().map(ProxyEntry::from).collect(),
            proxy_groups: std::slice::from_ref(&self.group),
            rules: &self.rules,
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
struct ClashConfig<'a> {
    proxies: Vec<ProxyEntry<'a>>,
    #[serde(rename = "proxy-groups")]
    proxy_groups: &'a [ProxyGroup],
    rules: &'a [String],
}

/// One entry of the `proxies` list.
#[derive(Serialize, Debug)]
pub struct ProxyEntry<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub node_type: &'a str,
    pub server: &'a str,
    pub port: u16,
    pub uuid: &'a str,
    pub network: &'a str,
    pub tls: bool,
    pub udp: bool,
    pub sni: &'a str,
    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts<'a>>,
    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts<'a>>,
}

#[derive(Serialize, Debug)]
pub struct WsOpts<'a> {
    pub path: &'a str,
    pub headers: WsHeaders<'a>,
}

#[derive(Serialize, Debug)]
pub struct WsHeaders<'a> {
    #[serde(rename = "Host")]
    pub host: &'a str,
}

#[derive(Serialize, Debug)]
pub struct GrpcOpts<'a> {
    #[serde(rename = "grpc-service-name")]
    pub service_name: &'a str,
}

impl<'a> From<&'a NodeDescriptor> for ProxyEntry<'a> {
    fn from(node: &'a NodeDescriptor) -> Self {
        let (ws_opts, grpc_opts) = match &node.transport_options {
            TransportOptions::WebSocket { path, host } => (
                Some(WsOpts {
                    path,
                    headers: WsHeaders { host },
                }),
                None,
            ),
            TransportOptions::Grpc { service_name } => (None, Some(GrpcOpts { service_name })),
            TransportOptions::None => (None, None),
        };

        ProxyEntry {
            name: &node.name,
            node_type: node.node_type,
            server: &node.server,
            port: node.port,
            uuid: &node.identifier,
            network: node.transport.as_str(),
            tls: node.tls_enabled,
            udp: node.udp_enabled,
            sni: &node.sni,
            ws_opts,
            grpc_opts,
        }
    }
}
