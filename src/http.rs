//! Shared HTTP client factory.
//!
//! Provider adapters and the log forwarder build their clients here so
//! timeouts stay consistent.

use reqwest::Client;
use std::time::Duration;

/// Timeout for provider calls (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for forwarding log entries (5 seconds).
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a new HTTP client with the default timeout.
pub fn create_client() -> Client {
    create_client_with_timeout(DEFAULT_TIMEOUT)
}

/// Create a new HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("speedyai/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_client_returns_valid_client() {
        let client = create_client();
        assert!(std::mem::size_of_val(&client) > 0);
    }

    #[test]
    fn default_timeout_is_30_seconds() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn forward_timeout_is_5_seconds() {
        assert_eq!(FORWARD_TIMEOUT, Duration::from_secs(5));
    }
}
