//! HTTP transport module
//!
//! The query layer talks to the backend only through the [`Transport`]
//! trait. [`HttpClient`] is the reqwest implementation.
//!
//! # Features
//!
//! - **Empty-body detection**: 2xx with no body decodes to `None`
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Optional Retries**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{SharedTransport, Transport};

#[cfg(test)]
mod tests;
