//! Parser for `vless://` connection strings.

use std::collections::HashMap;

use log::debug;
use percent_encoding::percent_decode_str;

use super::types::{NodeDescriptor, Transport, TransportOptions, NODE_TYPE_VLESS, SECURITY_TLS};
use crate::settings::Settings;

/// Structural problems that make a line unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedUriError {
    #[error("not a valid URI: expected the '{prefix}' prefix")]
    MissingScheme { prefix: String },

    #[error("missing '@' between user id and server address")]
    MissingUserInfo,

    #[error("more than one '@' in the link")]
    AmbiguousUserInfo,

    #[error("missing ':' between server and port in '{address}'")]
    MissingPort { address: String },

    #[error("invalid port '{port}'")]
    InvalidPort { port: String },
}

/// Decoded query parameters, keeping the first non-empty value per key.
///
/// Pairs with an empty value are dropped, so `host=` behaves like a missing
/// `host` and falls back to its default.
#[derive(Debug, Default)]
struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    fn decode(query: &str) -> Self {
        let mut values = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            values.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self { values }
    }

    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// Parse one VLESS link into a node descriptor.
///
/// Steps are checked in order: scheme prefix, fragment name, user id,
/// query string, then `server:port`. The returned descriptor may still have
/// an empty name when the fragment, `host` and server are all empty.
///
/// # Examples
/// ```
/// use vless2clash::settings::Settings;
/// use vless2clash::vless::{parse, Transport};
///
/// let node = parse("vless://id@example.com:443?type=grpc#Edge", &Settings::default()).unwrap();
/// assert_eq!(node.name, "Edge");
/// assert_eq!(node.transport, Transport::Grpc);
/// ```
pub fn parse(line: &str, settings: &Settings) -> Result<NodeDescriptor, MalformedUriError> {
    let link = line
        .strip_prefix(settings.scheme_prefix.as_str())
        .ok_or_else(|| MalformedUriError::MissingScheme {
            prefix: settings.scheme_prefix.clone(),
        })?;

    // Fragment carries the display name
    let (raw, explicit_name) = match link.split_once('#') {
        Some((raw, fragment)) => {
            let name = percent_decode_str(fragment).decode_utf8_lossy().into_owned();
            (raw, name)
        }
        None => (link, String::new()),
    };

    // Exactly one '@' separates the user id from the rest
    let (identifier, rest) = match raw.matches('@').count() {
        0 => return Err(MalformedUriError::MissingUserInfo),
        1 => raw.split_once('@').ok_or(MalformedUriError::MissingUserInfo)?,
        _ => return Err(MalformedUriError::AmbiguousUserInfo),
    };

    let (address, query) = rest.split_once('?').unwrap_or((rest, ""));

    let (server, port_str) = address
        .split_once(':')
        .ok_or_else(|| MalformedUriError::MissingPort {
            address: address.to_string(),
        })?;
    let port = port_str
        .parse::<u16>()
        .map_err(|_| MalformedUriError::InvalidPort {
            port: port_str.to_string(),
        })?;

    let params = QueryParams::decode(query);
    let security = params.get_or("security", "none");
    let transport = Transport::from_tag(params.get_or("type", &settings.default_transport));
    let host = params.get_or("host", server);
    let path = params.get_or("path", "/");

    let name = [explicit_name.as_str(), host, server]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
        .to_string();

    let transport_options = match transport {
        Transport::WebSocket => TransportOptions::WebSocket {
            path: path.to_string(),
            host: host.to_string(),
        },
        Transport::Grpc => TransportOptions::Grpc {
            service_name: params.get_or("serviceName", "").to_string(),
        },
        Transport::Other(_) => TransportOptions::None,
    };

    debug!("Parsed VLESS node '{}' at {}:{} over {}", name, server, port, transport);

    Ok(NodeDescriptor {
        name,
        node_type: NODE_TYPE_VLESS,
        server: server.to_string(),
        port,
        identifier: identifier.to_string(),
        transport,
        tls_enabled: security == SECURITY_TLS,
        udp_enabled: true,
        sni: host.to_string(),
        transport_options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(line: &str) -> Result<NodeDescriptor, MalformedUriError> {
        parse(line, &Settings::default())
    }

    #[test]
    fn test_parse_grpc_node() {
        let node = parse_default(
            "vless://uuid-1@host1.example:443?security=tls&type=grpc&serviceName=svc#Node1",
        )
        .unwrap();

        assert_eq!(node.name, "Node1");
        assert_eq!(node.node_type, "vless");
        assert_eq!(node.server, "host1.example");
        assert_eq!(node.port, 443);
        assert_eq!(node.identifier, "uuid-1");
        assert_eq!(node.transport, Transport::Grpc);
        assert!(node.tls_enabled);
        assert!(node.udp_enabled);
        assert_eq!(node.sni, "host1.example");
        assert_eq!(
            node.transport_options,
            TransportOptions::Grpc {
                service_name: "svc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_defaults_to_websocket() {
        let node = parse_default("vless://abc@1.2.3.4:8080").unwrap();

        assert_eq!(node.name, "1.2.3.4");
        assert_eq!(node.transport, Transport::WebSocket);
        assert!(!node.tls_enabled);
        assert_eq!(node.sni, "1.2.3.4");
        assert_eq!(
            node.transport_options,
            TransportOptions::WebSocket {
                path: "/".to_string(),
                host: "1.2.3.4".to_string(),
            }
        );
    }

    #[test]
    fn test_ws_host_header_and_path() {
        let node = parse_default(
            "vless://abc@1.2.3.4:443?security=tls&type=ws&host=cdn.example.com&path=%2Fws%3Fed%3D2048",
        )
        .unwrap();

        assert_eq!(node.name, "cdn.example.com");
        assert_eq!(node.sni, "cdn.example.com");
        assert_eq!(
            node.transport_options,
            TransportOptions::WebSocket {
                path: "/ws?ed=2048".to_string(),
                host: "cdn.example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_name_precedence() {
        let node = parse_default("vless://abc@srv.example:443?host=example.com#MyNode").unwrap();
        assert_eq!(node.name, "MyNode");

        let node = parse_default("vless://abc@srv.example:443?host=example.com").unwrap();
        assert_eq!(node.name, "example.com");

        let node = parse_default("vless://abc@srv.example:443").unwrap();
        assert_eq!(node.name, "srv.example");

        // Empty fragment falls through to host
        let node = parse_default("vless://abc@srv.example:443?host=example.com#").unwrap();
        assert_eq!(node.name, "example.com");

        // Nothing to fall back on
        let node = parse_default("vless://abc@:443").unwrap();
        assert!(!node.has_name());
    }

    #[test]
    fn test_fragment_is_percent_decoded() {
        let node = parse_default("vless://abc@srv.example:443#%E9%A6%99%E6%B8%AF%2001").unwrap();
        assert_eq!(node.name, "香港 01");

        // '+' is literal inside the fragment
        let node = parse_default("vless://abc@srv.example:443#a+b").unwrap();
        assert_eq!(node.name, "a+b");
    }

    #[test]
    fn test_query_edge_cases() {
        // Blank values are ignored and repeated keys keep the first value
        let node = parse_default(
            "vless://abc@srv.example:443?host=&type=grpc&type=ws&serviceName=",
        )
        .unwrap();
        assert_eq!(node.sni, "srv.example");
        assert_eq!(node.transport, Transport::Grpc);
        assert_eq!(
            node.transport_options,
            TransportOptions::Grpc {
                service_name: String::new()
            }
        );

        // Only the exact marker enables TLS
        let node = parse_default("vless://abc@srv.example:443?security=reality").unwrap();
        assert!(!node.tls_enabled);
    }

    #[test]
    fn test_unknown_transport_passes_through() {
        let node = parse_default("vless://abc@srv.example:443?type=tcp&path=/x").unwrap();
        assert_eq!(node.transport, Transport::Other("tcp".to_string()));
        assert_eq!(node.transport_options, TransportOptions::None);
    }

    #[test]
    fn test_malformed_links() {
        assert!(matches!(
            parse_default("vmess://abc@srv.example:443"),
            Err(MalformedUriError::MissingScheme { .. })
        ));
        assert!(matches!(
            parse_default("vless://srv.example:443"),
            Err(MalformedUriError::MissingUserInfo)
        ));
        assert!(matches!(
            parse_default("vless://a@b@srv.example:443"),
            Err(MalformedUriError::AmbiguousUserInfo)
        ));
        assert!(matches!(
            parse_default("vless://abc@srv.example?type=ws"),
            Err(MalformedUriError::MissingPort { .. })
        ));
        assert_eq!(
            parse_default("vless://abc@srv.example:http"),
            Err(MalformedUriError::InvalidPort {
                port: "http".to_string()
            })
        );
        assert!(matches!(
            parse_default("vless://abc@srv.example:70000"),
            Err(MalformedUriError::InvalidPort { .. })
        ));
        assert!(matches!(
            parse_default("vless://abc@[::1]:443"),
            Err(MalformedUriError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_second_at_sign_is_rejected_anywhere() {
        assert_eq!(
            parse_default("vless://abc@srv.example:443?path=/a@b"),
            Err(MalformedUriError::AmbiguousUserInfo)
        );

        // Encoded '@' in the query is fine
        let node = parse_default("vless://abc@srv.example:443?path=/a%40b").unwrap();
        assert_eq!(
            node.transport_options,
            TransportOptions::WebSocket {
                path: "/a@b".to_string(),
                host: "srv.example".to_string(),
            }
        );

        // '@' after the fragment delimiter belongs to the name
        let node = parse_default("vless://abc@srv.example:443#me@home").unwrap();
        assert_eq!(node.name, "me@home");
    }

    #[test]
    fn test_prefix_containing_delimiters_never_panics() {
        let settings = Settings {
            scheme_prefix: "x#".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            parse("x#abc", &settings),
            Err(MalformedUriError::MissingUserInfo)
        ));
        assert!(matches!(
            parse("x", &settings),
            Err(MalformedUriError::MissingScheme { .. })
        ));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let line = "vless://abc@srv.example:443?security=tls&type=ws&host=h.example&path=/p#N";
        assert_eq!(parse_default(line), parse_default(line));
    }

    #[test]
    fn test_custom_default_transport() {
        let settings = Settings {
            default_transport: "grpc".to_string(),
            ..Settings::default()
        };
        let node = parse("vless://abc@srv.example:443", &settings).unwrap();
        assert_eq!(node.transport, Transport::Grpc);
    }
}
