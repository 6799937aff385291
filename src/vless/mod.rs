//! # VLESS link parsing
//!
//! Turns a single `vless://` connection string into a typed [`NodeDescriptor`].
//!
//! ## Link Layout
//!
//! ```text
//! vless://<uuid>@<server>:<port>?<query>#<name>
//! ```
//!
//! - **uuid**: copied verbatim into the descriptor's identifier
//! - **server/port**: the endpoint address; the port must be a valid `u16`
//! - **query**: `security`, `type`, `host`, `path` and `serviceName`
//! - **name**: percent-decoded display label (optional)
//!
//! ## Name Resolution
//!
//! The display name is the first non-empty value of the fragment, the `host`
//! query parameter and the server. When all of them are empty the name stays
//! empty here and the aggregator assigns a positional label.
//!
//! ## Transports
//!
//! `ws` and `grpc` links get their transport options shaped for Clash.Meta.
//! Any other `type` value is kept as-is without options, it is never rejected.

pub mod parser;
pub mod types;

pub use parser::{parse, MalformedUriError};
pub use types::{NodeDescriptor, Transport, TransportOptions, NODE_TYPE_VLESS};
