//! DGX Spark bridge library: exposes modules for the binary and for
//! integration testing.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod client;
pub mod config;
pub mod server;
pub mod tools;

pub use client::ControllerClient;
pub use config::{BridgeConfig, Transport};
pub use tools::SparkTools;
