//! # fermenta-core: Pure Pricing & Promotion Logic for Fermenta
//!
//! This crate is the **heart** of the Fermenta storefront. It contains all
//! pricing and promotion logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Fermenta Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  Storefront UI (external)                     │  │
//! │  │    Catalog cards ──► Cart drawer ──► Order confirmation       │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │                 fermenta-shop (shell crate)                   │  │
//! │  │    session state, persistence, price feed, order channel      │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │              ★ fermenta-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │  │
//! │  │  │  money  │ │ catalog │ │ pricing │ │ bundler │ │  cart   │  │  │
//! │  │  │  Money  │ │ Product │ │  tiers  │ │ combos  │ │  lines  │  │  │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO NETWORK • NO PLATFORM APIS • PURE FUNCTIONS      │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`]   - Integer money in whole pesos (no floating point!)
//! - [`catalog`] - Product, kit and discount-tier definitions
//! - [`pricing`] - Line totals, tier selection, pooled group discounts
//! - [`bundler`] - The combo auto-bundling cart rewrite
//! - [`cart`]    - Cart lines, mutation operations, the settle pass
//! - [`format`]  - The outbound order-message formatter
//! - [`error`]   - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every derivation is deterministic
//! 2. **No I/O**: network, file system, and platform access are FORBIDDEN
//! 3. **Integer Money**: all monetary values are whole pesos (i64)
//! 4. **Degrade, never fault**: malformed lines price as zero; the engine
//!    cannot produce NaN and does not panic
//!
//! ## Example Usage
//!
//! ```rust
//! use fermenta_core::catalog::Catalog;
//! use fermenta_core::cart::Cart;
//!
//! let catalog = Catalog::standard();
//! let mut cart = Cart::new();
//!
//! // One kombucha and one ginger beer kit...
//! cart.add(&catalog, "kombucha", "kombucha-complete", 1).unwrap();
//! cart.add(&catalog, "ginger-beer", "ginger-beer-complete", 1).unwrap();
//!
//! // ...bundle into the cheaper Brewer's Duo on settle
//! let settlement = cart.settle(&catalog);
//! assert_eq!(settlement.bundled[0].product_id, "combo-duo");
//! assert_eq!(cart.lines()[0].kit_id, "combo-duo-complete");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bundler;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod format;
pub mod money;
pub mod pricing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fermenta_core::Money` instead of
// `use fermenta_core::money::Money`

pub use cart::{AddOutcome, Cart, CartLine, Settlement};
pub use catalog::{Catalog, DiscountTier, Kit, KitRole, PriceFeed, PriceUpdate, Product, ProductKind};
pub use error::{CatalogError, CoreError, CoreResult};
pub use format::{format_order, EMPTY_ORDER_MESSAGE};
pub use money::Money;
pub use pricing::{DiscountEntry, DiscountMap};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest quantity a line can be set to; the decrement control is disabled
/// at 1 instead of allowing a zero-quantity line to linger.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Highest quantity a single line can hold.
///
/// ## Business Reason
/// Kits ship in bulky crates; larger orders go through the contact channel
/// directly rather than the storefront stepper.
pub const MAX_LINE_QUANTITY: u32 = 5;
