//! # Storefront Session
//!
//! The process-wide state object the presentation layer drives. Owns the
//! canonical cart and the derived discount map, and runs the full
//! mutate → bundle → discount → persist cycle for every command.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Commands                             │
//! │                                                                     │
//! │  UI Action               Command                 Cycle              │
//! │  ─────────               ───────                 ─────              │
//! │  Pick a kit ───────────► add_to_cart() ────┐                        │
//! │  Change quantity ──────► set_line_quantity()│    1. mutate cart     │
//! │  Remove line ──────────► remove_line() ─────┼──► 2. settle (bundle  │
//! │  Empty cart ───────────► clear_cart() ──────┘       + discounts)    │
//! │                                                  3. persist lines   │
//! │                                                  4. view + notices  │
//! │                                                                     │
//! │  Send order ───────────► submit_order() ───────► format, deliver,   │
//! │                                                  snapshot, clear    │
//! │                                                                     │
//! │  Startup ──────────────► new() ────────────────► cached prices,     │
//! │                          refresh_prices() ─────► hydrate, settle    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! State lives behind a `Mutex` so shell callbacks may arrive from any
//! thread, but every settle pass runs to completion under the lock: no
//! observer ever sees a cart whose derived discounts are stale.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use fermenta_core::pricing::{combo_promo_total, line_total};
use fermenta_core::{
    format_order, AddOutcome, Cart, CartLine, Catalog, CoreResult, DiscountMap, Money, PriceFeed,
};

use crate::feed::PriceSheetClient;
use crate::share::MessageSink;
use crate::storage::KeyValueStore;

/// Key-value slot holding the serialized cart lines.
pub const CART_SNAPSHOT_KEY: &str = "fermenta.cart";

/// Key-value slot caching the last successfully fetched price feed.
pub const PRICE_CACHE_KEY: &str = "fermenta.prices";

// =============================================================================
// View Types
// =============================================================================

/// One cart line, resolved for display. Lines whose catalog references went
/// stale fall back to their raw ids and a zero total instead of breaking
/// the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub id: String,
    pub product_id: String,
    pub kit_id: String,
    pub kit_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub is_combo: bool,
    pub line_total: Money,
}

/// One product group's active discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountView {
    pub product_id: String,
    pub product_name: String,
    pub percent: u8,
    pub amount: Money,
    /// Charm-rounded promotional total, present only for discounted combos.
    pub promo_total: Option<Money>,
}

/// Cart-wide money summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub subtotal: Money,
    pub discount_total: Money,
    pub total: Money,
}

/// The full cart as the UI renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<LineView>,
    pub discounts: Vec<DiscountView>,
    pub totals: CartTotals,
}

/// One-time user feedback produced by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Notice {
    /// The combo is single-instance and already in the cart.
    #[serde(rename_all = "camelCase")]
    ComboAlreadyInCart { product_name: String },
    /// The bundler rewrote the cart into one or more combos.
    #[serde(rename_all = "camelCase")]
    CombosBundled { product_names: Vec<String> },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ComboAlreadyInCart { product_name } => {
                write!(f, "{product_name} is already in your order")
            }
            Notice::CombosBundled { product_names } => {
                write!(
                    f,
                    "Your kits were bundled into {} at combo pricing",
                    product_names.join(", ")
                )
            }
        }
    }
}

/// What a mutation command hands back to the shell.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub view: CartView,
    pub notices: Vec<Notice>,
}

/// A finalized order, kept for the confirmation screen after the cart
/// clears.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub id: String,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<LineView>,
    pub totals: CartTotals,
    pub message: String,
}

/// Result of a price refresh attempt. Both variants resolve the loading
/// indicator; only the failure modes differ in what the catalog shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRefresh {
    /// The fetched sheet was applied and cached.
    Applied,
    /// The sheet could not be fetched; current prices remain.
    Unavailable,
}

// =============================================================================
// Session State
// =============================================================================

struct SessionState {
    catalog: Catalog,
    cart: Cart,
    discounts: DiscountMap,
    last_order: Option<OrderSnapshot>,
    prices_loading: bool,
}

/// The storefront session. One per process; no explicit teardown.
pub struct Storefront {
    state: Mutex<SessionState>,
    store: Box<dyn KeyValueStore>,
}

impl Storefront {
    /// Starts a session: applies the cached price feed optimistically (the
    /// network refresh comes later and wins if it arrives), hydrates the
    /// cart from the persisted snapshot, and settles once.
    ///
    /// A malformed cache or snapshot is logged and treated as absent - the
    /// customer sees an empty cart, never an error.
    pub fn new(catalog: Catalog, store: Box<dyn KeyValueStore>) -> Self {
        let mut catalog = catalog;

        match store.get(PRICE_CACHE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<PriceFeed>(&raw) {
                Ok(feed) => {
                    debug!(entries = feed.len(), "applying cached price feed");
                    catalog.apply_price_feed(&feed);
                }
                Err(err) => warn!(%err, "cached price feed is malformed; ignoring"),
            },
            Ok(None) => {}
            Err(err) => warn!(%err, "could not read cached price feed"),
        }

        let lines = match store.get(CART_SNAPSHOT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => lines,
                Err(err) => {
                    warn!(%err, "stored cart snapshot is malformed; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not read stored cart; starting empty");
                Vec::new()
            }
        };

        let mut cart = Cart::from_lines(lines);
        // Hydration settles silently: bundling an old snapshot is not news
        let settlement = cart.settle(&catalog);
        persist_snapshot(store.as_ref(), &cart);

        Storefront {
            state: Mutex::new(SessionState {
                catalog,
                cart,
                discounts: settlement.discounts,
                last_order: None,
                prices_loading: true,
            }),
            store,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session mutex poisoned")
    }

    /// Settles the cart, persists the snapshot, and turns any bundling into
    /// a user notice.
    fn resettle(&self, state: &mut SessionState) -> Vec<Notice> {
        let settlement = state.cart.settle(&state.catalog);
        state.discounts = settlement.discounts;
        persist_snapshot(self.store.as_ref(), &state.cart);

        if settlement.bundled.is_empty() {
            return Vec::new();
        }
        let product_names = settlement
            .bundled
            .iter()
            .map(|formed| {
                let name = state
                    .catalog
                    .product(&formed.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| formed.product_id.clone());
                if formed.count > 1 {
                    format!("{}x {}", formed.count, name)
                } else {
                    name
                }
            })
            .collect();
        vec![Notice::CombosBundled { product_names }]
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Adds a kit to the cart.
    pub fn add_to_cart(
        &self,
        product_id: &str,
        kit_id: &str,
        quantity: u32,
    ) -> CoreResult<MutationOutcome> {
        debug!(product_id, kit_id, quantity, "add_to_cart");
        let mut guard = self.lock();
        let state = &mut *guard;

        let outcome = state.cart.add(&state.catalog, product_id, kit_id, quantity)?;
        if outcome == AddOutcome::ComboAlreadyPresent {
            debug!(product_id, "combo already in cart");
            let product_name = state
                .catalog
                .product(product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| product_id.to_string());
            return Ok(MutationOutcome {
                view: build_view(state),
                notices: vec![Notice::ComboAlreadyInCart { product_name }],
            });
        }

        let notices = self.resettle(state);
        Ok(MutationOutcome {
            view: build_view(state),
            notices,
        })
    }

    /// Sets a line's quantity (clamped to the storefront's 1..=5 stepper).
    pub fn set_line_quantity(&self, line_id: &str, quantity: u32) -> CoreResult<MutationOutcome> {
        debug!(line_id, quantity, "set_line_quantity");
        let mut guard = self.lock();
        let state = &mut *guard;

        state.cart.update_quantity(&state.catalog, line_id, quantity)?;
        let notices = self.resettle(state);
        Ok(MutationOutcome {
            view: build_view(state),
            notices,
        })
    }

    /// Removes a line.
    pub fn remove_line(&self, line_id: &str) -> CoreResult<MutationOutcome> {
        debug!(line_id, "remove_line");
        let mut guard = self.lock();
        let state = &mut *guard;

        state.cart.remove(line_id)?;
        let notices = self.resettle(state);
        Ok(MutationOutcome {
            view: build_view(state),
            notices,
        })
    }

    /// Empties the cart.
    pub fn clear_cart(&self) -> MutationOutcome {
        debug!("clear_cart");
        let mut guard = self.lock();
        let state = &mut *guard;

        state.cart.clear();
        let notices = self.resettle(state);
        MutationOutcome {
            view: build_view(state),
            notices,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The current cart, resolved for display.
    pub fn cart(&self) -> CartView {
        build_view(&self.lock())
    }

    /// The catalog with whatever prices are currently in effect.
    pub fn catalog(&self) -> Catalog {
        self.lock().catalog.clone()
    }

    /// The order message for the current cart, without submitting.
    pub fn order_message(&self) -> String {
        let state = self.lock();
        format_order(&state.catalog, state.cart.lines(), &state.discounts)
    }

    /// Whether the initial price refresh is still outstanding.
    pub fn prices_loading(&self) -> bool {
        self.lock().prices_loading
    }

    /// The last submitted order, for the confirmation screen.
    pub fn last_order(&self) -> Option<OrderSnapshot> {
        self.lock().last_order.clone()
    }

    // -------------------------------------------------------------------------
    // Price Feed
    // -------------------------------------------------------------------------

    /// Fetches the remote price sheet and applies it.
    ///
    /// Fire-and-forget from the shell's point of view: every outcome -
    /// success, network failure, malformed sheet - resolves the loading
    /// indicator, and failure keeps whatever prices are already in effect.
    pub async fn refresh_prices(&self, client: &PriceSheetClient) -> PriceRefresh {
        match client.fetch().await {
            Ok(feed) => {
                match serde_json::to_string(&feed) {
                    Ok(raw) => {
                        if let Err(err) = self.store.put(PRICE_CACHE_KEY, &raw) {
                            warn!(%err, "failed to cache price feed");
                        }
                    }
                    Err(err) => warn!(%err, "failed to serialize price feed cache"),
                }

                let mut guard = self.lock();
                let state = &mut *guard;
                state.catalog.apply_price_feed(&feed);
                // Discount amounts depend on prices; rebuild them
                let settlement = state.cart.settle(&state.catalog);
                state.discounts = settlement.discounts;
                state.prices_loading = false;
                info!(entries = feed.len(), "price sheet applied");
                PriceRefresh::Applied
            }
            Err(err) => {
                warn!(%err, "price sheet unavailable; keeping current prices");
                self.lock().prices_loading = false;
                PriceRefresh::Unavailable
            }
        }
    }

    // -------------------------------------------------------------------------
    // Order Submission
    // -------------------------------------------------------------------------

    /// Formats the order, hands it to the sink, and finalizes: the cart
    /// contents move into the last-order snapshot and the cart clears.
    ///
    /// An empty cart still delivers the fixed inquiry message but finalizes
    /// nothing and returns `None`.
    pub fn submit_order(&self, sink: &mut dyn MessageSink) -> Option<OrderSnapshot> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let message = format_order(&state.catalog, state.cart.lines(), &state.discounts);
        sink.deliver(&message);

        if state.cart.is_empty() {
            info!("inquiry sent for empty cart");
            return None;
        }

        let view = build_view(state);
        let snapshot = OrderSnapshot {
            id: Uuid::new_v4().to_string(),
            placed_at: Utc::now(),
            lines: view.lines,
            totals: view.totals,
            message,
        };

        state.cart.clear();
        state.discounts = DiscountMap::new();
        persist_snapshot(self.store.as_ref(), &state.cart);
        state.last_order = Some(snapshot.clone());

        info!(order_id = %snapshot.id, total = %snapshot.totals.total, "order submitted");
        Some(snapshot)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Writes the cart lines to the snapshot slot. Failures are logged and
/// swallowed: a broken disk never fails a cart mutation.
fn persist_snapshot(store: &dyn KeyValueStore, cart: &Cart) {
    match serde_json::to_string(cart.lines()) {
        Ok(raw) => {
            if let Err(err) = store.put(CART_SNAPSHOT_KEY, &raw) {
                warn!(%err, "failed to persist cart snapshot");
            }
        }
        Err(err) => warn!(%err, "failed to serialize cart snapshot"),
    }
}

fn line_view(catalog: &Catalog, line: &CartLine) -> LineView {
    let resolved = catalog.kit(&line.product_id, &line.kit_id);
    LineView {
        id: line.id.clone(),
        product_id: line.product_id.clone(),
        kit_id: line.kit_id.clone(),
        kit_name: resolved
            .map(|(_, kit)| kit.name.clone())
            .unwrap_or_else(|| line.kit_id.clone()),
        product_name: resolved
            .map(|(product, _)| product.name.clone())
            .unwrap_or_else(|| line.product_id.clone()),
        quantity: line.quantity,
        is_combo: resolved.map(|(product, _)| product.is_combo()).unwrap_or(false),
        line_total: line_total(catalog, line),
    }
}

fn build_view(state: &SessionState) -> CartView {
    let lines: Vec<LineView> = state
        .cart
        .lines()
        .iter()
        .map(|line| line_view(&state.catalog, line))
        .collect();

    let mut discounts: Vec<DiscountView> = state
        .discounts
        .iter()
        .map(|(product_id, entry)| DiscountView {
            product_id: product_id.clone(),
            product_name: state
                .catalog
                .product(product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| product_id.clone()),
            percent: entry.percent,
            amount: entry.amount,
            promo_total: combo_promo_total(
                &state.catalog,
                state.cart.lines(),
                product_id,
                &state.discounts,
            ),
        })
        .collect();
    // The discount map is unordered; present groups deterministically
    discounts.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    let subtotal = state.cart.subtotal(&state.catalog);
    let discount_total: Money = state.discounts.values().map(|entry| entry.amount).sum();

    CartView {
        totals: CartTotals {
            line_count: lines.len(),
            subtotal,
            discount_total,
            total: subtotal - discount_total,
        },
        lines,
        discounts,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::RecordingSink;
    use crate::storage::MemoryStore;
    use fermenta_core::EMPTY_ORDER_MESSAGE;
    use std::sync::Arc;

    fn storefront() -> Storefront {
        Storefront::new(Catalog::standard(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_derives_discounts_and_totals() {
        let shop = storefront();

        let outcome = shop.add_to_cart("cold-brew", "cold-brew-complete", 3).unwrap();

        let view = outcome.view;
        assert_eq!(view.totals.line_count, 1);
        assert_eq!(view.totals.subtotal.pesos(), 42_000);
        assert_eq!(view.totals.discount_total.pesos(), 4_200);
        assert_eq!(view.totals.total.pesos(), 37_800);
        assert_eq!(view.discounts.len(), 1);
        assert_eq!(view.discounts[0].percent, 10);
        // Individual products never get a charm-rounded promo price
        assert!(view.discounts[0].promo_total.is_none());
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn test_add_same_kit_merges() {
        let shop = storefront();
        shop.add_to_cart("cold-brew", "cold-brew-complete", 1).unwrap();
        let outcome = shop.add_to_cart("cold-brew", "cold-brew-complete", 1).unwrap();

        assert_eq!(outcome.view.lines.len(), 1);
        assert_eq!(outcome.view.lines[0].quantity, 2);
        // Two units cross the 5% tier: 28 000 × 5% = 1 400
        assert_eq!(outcome.view.totals.discount_total.pesos(), 1_400);
    }

    #[test]
    fn test_combo_readd_notice_leaves_cart_unchanged() {
        let shop = storefront();
        shop.add_to_cart("combo-duo", "combo-duo-complete", 1).unwrap();

        let outcome = shop.add_to_cart("combo-duo", "combo-duo-complete", 1).unwrap();

        assert_eq!(
            outcome.notices,
            vec![Notice::ComboAlreadyInCart {
                product_name: "Brewer's Duo".to_string()
            }]
        );
        assert_eq!(outcome.view.lines.len(), 1);
        assert_eq!(outcome.view.lines[0].quantity, 1);
    }

    #[test]
    fn test_bundling_surfaces_notice_once() {
        let shop = storefront();
        let first = shop.add_to_cart("kombucha", "kombucha-complete", 1).unwrap();
        assert!(first.notices.is_empty());

        let second = shop
            .add_to_cart("ginger-beer", "ginger-beer-complete", 1)
            .unwrap();

        assert_eq!(
            second.notices,
            vec![Notice::CombosBundled {
                product_names: vec!["Brewer's Duo".to_string()]
            }]
        );
        assert_eq!(second.view.lines.len(), 1);
        assert!(second.view.lines[0].is_combo);
        assert_eq!(second.view.lines[0].kit_id, "combo-duo-complete");

        // A later no-op mutation must not repeat the notification
        let id = second.view.lines[0].id.clone();
        let third = shop.set_line_quantity(&id, 1).unwrap();
        assert!(third.notices.is_empty());
    }

    #[test]
    fn test_update_and_remove_by_line_id() {
        let shop = storefront();
        let view = shop
            .add_to_cart("cold-brew", "cold-brew-complete", 1)
            .unwrap()
            .view;
        let line_id = view.lines[0].id.clone();

        let updated = shop.set_line_quantity(&line_id, 99).unwrap();
        assert_eq!(updated.view.lines[0].quantity, 5);

        let removed = shop.remove_line(&line_id).unwrap();
        assert!(removed.view.lines.is_empty());
        assert!(shop.remove_line(&line_id).is_err());
    }

    #[test]
    fn test_clear_cart_resets_everything() {
        let shop = storefront();
        shop.add_to_cart("cold-brew", "cold-brew-complete", 3).unwrap();

        let outcome = shop.clear_cart();

        assert!(outcome.view.lines.is_empty());
        assert!(outcome.view.discounts.is_empty());
        assert_eq!(outcome.view.totals.total.pesos(), 0);
    }

    #[test]
    fn test_persisted_cart_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        {
            let shop = Storefront::new(Catalog::standard(), Box::new(store.clone()));
            shop.add_to_cart("cold-brew", "cold-brew-complete", 2).unwrap();
        }

        let reopened = Storefront::new(Catalog::standard(), Box::new(store));
        let view = reopened.cart();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.totals.subtotal.pesos(), 28_000);
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let store = MemoryStore::new();
        store.put(CART_SNAPSHOT_KEY, "{definitely not an array").unwrap();

        let shop = Storefront::new(Catalog::standard(), Box::new(store));
        assert!(shop.cart().lines.is_empty());
    }

    #[test]
    fn test_hydration_bundles_silently_and_repersists() {
        let store = Arc::new(MemoryStore::new());
        let lines = vec![
            CartLine::new("kombucha", "kombucha-complete", 1),
            CartLine::new("ginger-beer", "ginger-beer-complete", 1),
        ];
        store
            .put(CART_SNAPSHOT_KEY, &serde_json::to_string(&lines).unwrap())
            .unwrap();

        let shop = Storefront::new(Catalog::standard(), Box::new(store.clone()));

        let view = shop.cart();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].kit_id, "combo-duo-complete");
        // The rewritten cart is what got persisted back
        let raw = store.get(CART_SNAPSHOT_KEY).unwrap().unwrap();
        assert!(raw.contains("combo-duo-complete"));
    }

    #[test]
    fn test_cached_price_feed_applies_at_startup() {
        let store = MemoryStore::new();
        let mut feed = PriceFeed::new();
        feed.insert(
            "cold-brew".to_string(),
            fermenta_core::PriceUpdate {
                unit_price: None,
                complete_kit_price: Some(Money::from_pesos(15_000)),
            },
        );
        store
            .put(PRICE_CACHE_KEY, &serde_json::to_string(&feed).unwrap())
            .unwrap();

        let shop = Storefront::new(Catalog::standard(), Box::new(store));
        let view = shop
            .add_to_cart("cold-brew", "cold-brew-complete", 1)
            .unwrap()
            .view;
        assert_eq!(view.totals.subtotal.pesos(), 15_000);
    }

    #[test]
    fn test_submit_order_finalizes() {
        let shop = storefront();
        shop.add_to_cart("cold-brew", "cold-brew-complete", 3).unwrap();
        let before = shop.cart();

        let mut sink = RecordingSink::new();
        let snapshot = shop.submit_order(&mut sink).unwrap();

        assert_eq!(snapshot.totals.total.pesos(), before.totals.total.pesos());
        assert_eq!(sink.delivered.len(), 1);
        assert_eq!(sink.delivered[0], snapshot.message);
        assert!(snapshot.message.contains("Total: $37.800"));

        // Cart cleared, snapshot retained, empty cart persisted
        assert!(shop.cart().lines.is_empty());
        assert_eq!(shop.last_order().unwrap().id, snapshot.id);
    }

    #[test]
    fn test_submit_empty_cart_sends_inquiry_only() {
        let shop = storefront();
        let mut sink = RecordingSink::new();

        let snapshot = shop.submit_order(&mut sink);

        assert!(snapshot.is_none());
        assert_eq!(sink.delivered, vec![EMPTY_ORDER_MESSAGE.to_string()]);
        assert!(shop.last_order().is_none());
    }

    #[tokio::test]
    async fn test_price_refresh_failure_resolves_loading() {
        let shop = storefront();
        shop.add_to_cart("cold-brew", "cold-brew-complete", 1).unwrap();
        assert!(shop.prices_loading());

        let client = PriceSheetClient::new("http://127.0.0.1:9/prices.csv");
        let outcome = shop.refresh_prices(&client).await;

        assert_eq!(outcome, PriceRefresh::Unavailable);
        assert!(!shop.prices_loading());
        // Prices untouched
        assert_eq!(shop.cart().totals.subtotal.pesos(), 14_000);
    }

    #[test]
    fn test_combo_discount_shows_promo_total() {
        let shop = storefront();
        // Two duos' worth of kits: the bundler forms both, the combo group
        // reaches the 5% tier, and the promo price charm-rounds
        shop.add_to_cart("kombucha", "kombucha-complete", 2).unwrap();
        let outcome = shop
            .add_to_cart("ginger-beer", "ginger-beer-complete", 2)
            .unwrap();

        let view = outcome.view;
        assert_eq!(view.discounts.len(), 1);
        let discount = &view.discounts[0];
        assert_eq!(discount.product_id, "combo-duo");
        assert_eq!(discount.percent, 5);
        // 2 × 31 500 = 63 000, 5% off → 59 850, charm-rounded → 59 990
        assert_eq!(discount.amount.pesos(), 3_150);
        assert_eq!(discount.promo_total.unwrap().pesos(), 59_990);
    }
}
