//! Node descriptor types produced by the VLESS parser.

use std::fmt;

/// Protocol tag written into every proxy entry
pub const NODE_TYPE_VLESS: &str = "vless";

/// Security parameter value that turns TLS on
pub const SECURITY_TLS: &str = "tls";

/// Transport carrying the VLESS stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// WebSocket (`ws`)
    WebSocket,
    /// gRPC (`grpc`)
    Grpc,
    /// Any other tag, passed through untouched
    Other(String),
}

impl Transport {
    /// Map a `type` query value onto a transport
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ws" => Transport::WebSocket,
            "grpc" => Transport::Grpc,
            other => Transport::Other(other.to_string()),
        }
    }

    /// Tag as written into the `network` field
    pub fn as_str(&self) -> &str {
        match self {
            Transport::WebSocket => "ws",
            Transport::Grpc => "grpc",
            Transport::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-specific options, shaped by the node's [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOptions {
    /// `ws-opts`: request path plus the `Host` header
    WebSocket { path: String, host: String },
    /// `grpc-opts`: service name
    Grpc { service_name: String },
    /// Unrecognized transport, no options emitted
    None,
}

/// A parsed and validated proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Display label; empty until resolved by the aggregator
    pub name: String,
    /// Protocol family tag, always [`NODE_TYPE_VLESS`]
    pub node_type: &'static str,
    /// Hostname or IP address of the endpoint
    pub server: String,
    /// Endpoint port
    pub port: u16,
    /// UUID taken verbatim from the user-info segment
    pub identifier: String,
    pub transport: Transport,
    /// True iff `security=tls`
    pub tls_enabled: bool,
    /// UDP relay capability, always on for VLESS
    pub udp_enabled: bool,
    /// TLS server name; the `host` parameter or the server
    pub sni: String,
    pub transport_options: TransportOptions,
}

impl NodeDescriptor {
    /// Check whether the fallback chain produced a display name
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_tags() {
        assert_eq!(Transport::from_tag("ws"), Transport::WebSocket);
        assert_eq!(Transport::from_tag("grpc"), Transport::Grpc);
        assert_eq!(Transport::from_tag("tcp"), Transport::Other("tcp".to_string()));

        // Matching is exact, unknown casing passes through
        assert_eq!(Transport::from_tag("WS"), Transport::Other("WS".to_string()));

        assert_eq!(Transport::Grpc.to_string(), "grpc");
        assert_eq!(Transport::Other("h2".to_string()).as_str(), "h2");
    }
}
