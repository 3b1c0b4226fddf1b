//! # Cart
//!
//! The canonical list of selected kit lines, mutated only through the
//! operations defined here.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Cart State Operations                          │
//! │                                                                     │
//! │  User Action              Operation               State Change      │
//! │  ───────────              ─────────               ────────────      │
//! │                                                                     │
//! │  Pick a kit ────────────► add() ────────────────► merge or append   │
//! │                                                                     │
//! │  Change quantity ───────► update_quantity() ────► clamp to [1, 5]   │
//! │                                                                     │
//! │  Remove line ───────────► remove() ─────────────► delete line       │
//! │                                                                     │
//! │  Order sent / cancel ───► clear() ──────────────► empty cart        │
//! │                                                                     │
//! │  After EVERY mutation the caller runs settle(): the combo bundler   │
//! │  to a fixed point, then one full discount-map rebuild.              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::bundler::{bundle_pass, FormedCombo};
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{line_total, recompute_discounts, DiscountMap};
use crate::{MAX_LINE_QUANTITY, MIN_LINE_QUANTITY};

/// Upper bound on bundler iterations inside one settle pass. The pass is
/// idempotent, so the loop normally exits on the second iteration; the bound
/// only guards against a future non-idempotent regression.
const MAX_BUNDLE_PASSES: usize = 8;

// =============================================================================
// Cart Line
// =============================================================================

/// One entry in the cart: a kit of a product, with a quantity.
///
/// ## Identity
/// Lines are addressed by an opaque UUID generated at creation, unique by
/// construction even for lines added in the same instant. `added_at` is
/// display metadata only and never participates in identity or bookkeeping.
///
/// ## Quantity semantics
/// For `ExtraBarrels` kits the quantity counts extra barrels beyond the one
/// included base unit (and may legitimately be 0); for every other kit it is
/// an independent unit count. Combo lines are always quantity 1.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Opaque line identifier.
    pub id: String,

    /// The owning product.
    pub product_id: String,

    /// The selected kit variant.
    pub kit_id: String,

    /// Unit count or extra-barrel count, depending on the kit's role.
    /// Defaulted on deserialization so a snapshot with a missing or null
    /// quantity hydrates as 0 instead of failing.
    #[serde(default)]
    pub quantity: u32,

    /// When the line was added. Display only.
    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line with a fresh opaque id.
    pub fn new(product_id: &str, kit_id: &str, quantity: u32) -> Self {
        CartLine {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            kit_id: kit_id.to_string(),
            quantity,
            added_at: Utc::now(),
        }
    }
}

// =============================================================================
// Operation Results
// =============================================================================

/// What an `add` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new line was appended.
    Added,
    /// An existing line of the same kit absorbed the quantity.
    Merged,
    /// The combo is already in the cart; nothing changed. Informational,
    /// not an error - the shell surfaces it as user feedback.
    ComboAlreadyPresent,
}

/// The derived state produced by a settle pass.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Product id → applicable discount, fully rebuilt.
    pub discounts: DiscountMap,
    /// Combos the bundler assembled during this pass, if any. Non-empty
    /// exactly when the cart was rewritten; drives the one-time user
    /// notification.
    pub bundled: Vec<FormedCombo>,
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered sequence of cart lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Rebuilds a cart from persisted line records. Quantities the snapshot
    /// omitted have already been coerced to 0 by deserialization; callers
    /// treat an unparsable snapshot as an empty cart before ever reaching
    /// this constructor.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }

    /// The current lines, in cart order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines (not units).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of raw line totals, before any discount.
    pub fn subtotal(&self, catalog: &Catalog) -> Money {
        self.lines.iter().map(|line| line_total(catalog, line)).sum()
    }

    /// Adds a kit to the cart.
    ///
    /// ## Behavior
    /// - Individual product, kit already present: the existing line absorbs
    ///   the quantity (capped at the per-line maximum).
    /// - Combo product, kit already present: rejected as a no-op; combos
    ///   are single-instance per cart.
    /// - Otherwise: a new line is appended. Combo lines are pinned to
    ///   quantity 1; other lines keep the requested quantity capped at the
    ///   maximum (an `ExtraBarrels` line may start at 0 extras).
    pub fn add(
        &mut self,
        catalog: &Catalog,
        product_id: &str,
        kit_id: &str,
        quantity: u32,
    ) -> CoreResult<AddOutcome> {
        let product = catalog
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        if product.kit(kit_id).is_none() {
            return Err(CoreError::KitNotFound {
                product_id: product_id.to_string(),
                kit_id: kit_id.to_string(),
            });
        }

        let existing = self.lines.iter().position(|line| line.kit_id == kit_id);

        if product.is_combo() {
            if existing.is_some() {
                return Ok(AddOutcome::ComboAlreadyPresent);
            }
            self.lines.push(CartLine::new(product_id, kit_id, 1));
            return Ok(AddOutcome::Added);
        }

        if let Some(idx) = existing {
            let line = &mut self.lines[idx];
            line.quantity = (line.quantity + quantity).min(MAX_LINE_QUANTITY);
            return Ok(AddOutcome::Merged);
        }

        self.lines
            .push(CartLine::new(product_id, kit_id, quantity.min(MAX_LINE_QUANTITY)));
        Ok(AddOutcome::Added)
    }

    /// Sets a line's quantity, clamped to `[1, 5]`.
    ///
    /// Combo line quantities are fixed at 1; the call is an acknowledged
    /// no-op for them (their quantity controls are never exposed).
    pub fn update_quantity(
        &mut self,
        catalog: &Catalog,
        line_id: &str,
        quantity: u32,
    ) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;

        let is_combo = catalog
            .product(&line.product_id)
            .map(|p| p.is_combo())
            .unwrap_or(false);
        if is_combo {
            return Ok(());
        }

        line.quantity = quantity.clamp(MIN_LINE_QUANTITY, MAX_LINE_QUANTITY);
        Ok(())
    }

    /// Deletes a line unconditionally.
    pub fn remove(&mut self, line_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != line_id);
        if self.lines.len() == before {
            return Err(CoreError::LineNotFound(line_id.to_string()));
        }
        Ok(())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Re-derives everything that depends on the cart contents: runs the
    /// combo bundler to a fixed point, then rebuilds the discount map once
    /// against the final lines.
    ///
    /// Invoked exactly once after every mutation; the discount map is never
    /// patched incrementally.
    pub fn settle(&mut self, catalog: &Catalog) -> Settlement {
        let mut bundled: Vec<FormedCombo> = Vec::new();

        for _ in 0..MAX_BUNDLE_PASSES {
            let pass = bundle_pass(catalog, &self.lines);
            if !pass.changed {
                break;
            }
            self.lines = pass.lines;
            for formed in pass.formed {
                match bundled.iter_mut().find(|b| b.product_id == formed.product_id) {
                    Some(existing) => existing.count += formed.count,
                    None => bundled.push(formed),
                }
            }
        }

        Settlement {
            discounts: recompute_discounts(catalog, &self.lines),
            bundled,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
