//! # archive-gateway
//!
//! Contract RPC gateway for the image-archive client.
//!
//! This crate provides:
//! - Gateway configuration from TOML files or `ARCHIVE_*` environment variables
//! - A JSON-RPC implementation of [`archive_core::ContractGateway`]
//! - A scripted mock gateway (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use archive_core::{methods, ContractGateway};
//! use archive_gateway::JsonRpcGateway;
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = JsonRpcGateway::from_env().unwrap();
//!     let count = gateway.query(methods::COUNT_IMAGES, &[]).await.unwrap();
//!     println!("{}", count);
//! }
//! ```

pub mod config;
pub mod rpc;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::{ConfigError, ConfigResult, GatewayConfig};
pub use rpc::{CallKind, JsonRpcGateway};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockCallKind, MockGateway};
