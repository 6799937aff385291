//! # Clash.Meta document generation
//!
//! Aggregates parsed VLESS nodes into a single Clash.Meta configuration.
//!
//! ## Generated Structure
//!
//! ```yaml
//! proxies:
//!   - name: Node1
//!     type: vless
//!     server: host1.example
//!     port: 443
//!     uuid: uuid-1
//!     network: grpc
//!     tls: true
//!     udp: true
//!     sni: host1.example
//!     grpc-opts:
//!       grpc-service-name: svc
//! proxy-groups:
//!   - name: Proxy
//!     type: select
//!     proxies:
//!       - Node1
//! rules:
//!   - GEOIP,CN,DIRECT
//!   - MATCH,Proxy
//! ```
//!
//! ## Failure Isolation
//!
//! Each line is parsed on its own. Malformed lines become
//! [`LineDiagnostic`] entries and never abort the batch; only a batch with
//! no surviving node is reported as [`EmptyBatchError`].

pub mod aggregate;
pub mod types;

pub use aggregate::{aggregate, BatchReport, EmptyBatchError, LineDiagnostic};
pub use types::{ConfigDocument, ProxyEntry, ProxyGroup};
