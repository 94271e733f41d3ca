//! sdnatui library crate
//!
//! Byte size conversion, serval-dna daemon and REST plumbing, and the
//! dialog-based text UI. Exposed for integration tests and the binary.

pub mod logging;
pub mod serval;
pub mod settings;
pub mod size;
pub mod ui;
