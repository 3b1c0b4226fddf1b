//! # Fermenta Storefront Shell
//!
//! The stateful layer between the pure pricing core and the presentation
//! UI. The shell owns everything the core is forbidden to touch: session
//! state, persistence, the remote price sheet, and the outbound order
//! channel.
//!
//! ## Module Organization
//! ```text
//! fermenta_shop/
//! ├── lib.rs          ◄─── You are here (exports & tracing setup)
//! ├── session.rs      ◄─── Storefront: commands, views, order flow
//! ├── storage.rs      ◄─── KeyValueStore trait + file/memory stores
//! ├── feed.rs         ◄─── Price-sheet client (CSV over HTTP)
//! ├── share.rs        ◄─── MessageSink trait + contact deep link
//! └── error.rs        ◄─── StorageError, FeedError
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Startup                              │
//! │                                                                     │
//! │  1. init_tracing() ──────────────────────────────────────────────►  │
//! │     • tracing-subscriber with env filter                            │
//! │     • Default: INFO, override with RUST_LOG                         │
//! │                                                                     │
//! │  2. Storefront::new(Catalog::standard(), store) ─────────────────►  │
//! │     • cached price feed applied optimistically                      │
//! │     • cart hydrated from the persisted snapshot                     │
//! │     • one settle pass (bundling + discounts)                        │
//! │                                                                     │
//! │  3. refresh_prices(client) in the background ────────────────────►  │
//! │     • success: sheet applied and cached                             │
//! │     • failure: current prices kept                                  │
//! │     • either way: "prices loading" resolves                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod feed;
pub mod session;
pub mod share;
pub mod storage;

pub use error::{FeedError, StorageError};
pub use feed::PriceSheetClient;
pub use session::{
    CartTotals, CartView, DiscountView, LineView, MutationOutcome, Notice, OrderSnapshot,
    PriceRefresh, Storefront,
};
pub use share::{direct_message_link, MessageSink, RecordingSink};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show debug messages
/// - `RUST_LOG=fermenta_shop=trace` - trace the shell only
/// - Default: INFO level, DEBUG for the fermenta crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fermenta_core=debug,fermenta_shop=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
