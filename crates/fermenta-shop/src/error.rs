//! # Shell Error Types
//!
//! Errors for the storefront shell's external collaborators. Cart and
//! catalog errors come from `fermenta_core::CoreError`; these cover the
//! key-value store and the price feed.
//!
//! None of these ever reach the customer as a fatal condition: the session
//! degrades to the last known good state (empty cart, current prices) and
//! logs instead.

use thiserror::Error;

/// Key-value store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Price-sheet fetch failures.
///
/// Parsing never fails outright - malformed rows are skipped - so the only
/// failure mode is the transport.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network error or non-success HTTP status.
    #[error("price sheet request failed: {0}")]
    Http(#[from] reqwest::Error),
}
