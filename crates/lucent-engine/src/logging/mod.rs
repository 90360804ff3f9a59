//! Logging utilities.
//!
//! This module centralizes logger initialization on top of the `log` facade.
//! Engine lifecycle messages go to the [`SYSTEM_TARGET`] target so they can be
//! filtered independently (`RUST_LOG=lucent::system=info`).

mod init;

pub use init::{init_logging, LoggingConfig, SYSTEM_TARGET};
