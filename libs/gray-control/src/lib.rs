//! Control-plane connectivity for the graymesh agent.
//!
//! Two pieces: [`GrayClientConfig`], environment-based configuration with
//! development defaults, and [`HttpGrayInformationClient`], the JSON/HTTP
//! implementation of the query contract the reconciler consumes.
//!
//! No retry or backoff lives here: a failed fetch propagates to the caller,
//! and the transport that triggered it owns redelivery.

mod config;
mod error;
mod http;

pub use config::GrayClientConfig;
pub use error::ConfigError;
pub use http::HttpGrayInformationClient;
