//! # vless2clash - Convert VLESS links into a Clash.Meta configuration
//!
//! This library turns a plaintext list of `vless://` links, one per line,
//! into a ready-to-load Clash.Meta configuration that bundles every node
//! under a single selector group with baseline routing rules.
//!
//! ## Architecture
//!
//! - `settings`: Immutable converter settings (scheme prefix, group, rules)
//! - `vless`: Parser turning one link into a typed node descriptor
//! - `clash`: Batch aggregation and the Clash.Meta document shape
//! - `loader`: Reading link/settings files and writing the document
//!
//! ## Example Usage
//!
//! ```rust
//! use vless2clash::{clash, settings::Settings};
//!
//! let lines = [
//!     "vless://uuid-1@host1.example:443?security=tls&type=grpc&serviceName=svc#Node1",
//!     "not a link",
//! ];
//! let report = clash::aggregate(lines, &Settings::default());
//!
//! assert_eq!(report.diagnostics().len(), 1);
//! let document = report.document()?;
//! assert_eq!(document.group().proxies, vec!["Node1"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Malformed links are reported per line and never abort a batch. The only
//! batch-level failure is [`clash::EmptyBatchError`], returned when no line
//! produced a node. The binary wraps everything in `color_eyre` reports.

pub mod clash;
pub mod loader;
pub mod settings;
pub mod vless;
