//! serval-dna integration
//!
//! Provides:
//! - Running the `servald` CLI against an instance directory
//! - Daemon lifecycle and identity management
//! - The REST client for rhizome and MeshMS
//! - Decoding of tabular REST responses

pub mod daemon;
pub mod process;
pub mod rest;
pub mod table;

pub use daemon::ServalDaemon;
pub use process::{ServalOutput, ServalRunner};
pub use rest::{ServalApi, ServalRestClient};
pub use table::{Bundle, Conversation, Identity, Message, MessageKind, RestTable};

/// Length of a full SID in hex characters
pub const SID_HEX_LEN: usize = 64;

/// Abbreviate a SID or bundle id to its first 8 characters plus `*`
pub fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    format!("{}*", prefix)
}

/// Whether `s` looks like a full SID
pub fn is_full_sid(s: &str) -> bool {
    s.len() == SID_HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}
