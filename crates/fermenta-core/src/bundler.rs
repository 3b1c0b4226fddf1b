//! # Combo Auto-Bundler
//!
//! After every cart mutation, detects whether the individual-product lines
//! hold enough complete-kit units to assemble one or more predefined combos,
//! and if so rewrites the cart: the consumed units disappear and combo lines
//! appear in their place. The rewrite either saves the customer money or is
//! neutral; it never removes value without the bundled item compensating.
//!
//! ## Algorithm
//! 1. Expand every complete-kit line of an individual product into abstract
//!    unit tokens, each tagged with its source line.
//! 2. Rank combos by component count, largest first (larger bundles carry
//!    the larger savings); catalog order breaks ties.
//! 3. Greedily assemble each combo while one unconsumed token exists per
//!    required component occurrence. A combo needing two units of one
//!    component consumes two distinct tokens from that product's pool.
//! 4. Rebuild the cart: subtract per-line consumed counts, drop emptied
//!    lines, append one quantity-1 combo line per assembled instance.
//! 5. Compare order-independent signatures of the old and new carts; report
//!    a change only when they differ, so a no-op pass never triggers another
//!    update cycle or a redundant notification.
//!
//! The pass is idempotent: its output contains no complete individual-kit
//! units satisfying any combo's full requirement set, so running it again is
//! always a no-op. Consumption is tracked with explicit per-line counters.
//!
//! Greedy priority is deterministic and accepted behavior: a large combo may
//! starve a smaller one that would otherwise have formed.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::cart::CartLine;
use crate::catalog::{Catalog, KitRole, ProductKind};

// =============================================================================
// Results
// =============================================================================

/// One combo the bundler assembled, with how many instances formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormedCombo {
    pub product_id: String,
    pub count: u32,
}

/// The outcome of one bundler pass.
#[derive(Debug, Clone)]
pub struct BundlePass {
    /// The rewritten lines (identical to the input when `changed` is false).
    pub lines: Vec<CartLine>,
    /// Combos assembled in this pass.
    pub formed: Vec<FormedCombo>,
    /// Whether the cart signature actually changed. The caller applies the
    /// rewrite and surfaces a notification only when it did.
    pub changed: bool,
}

// =============================================================================
// Signature
// =============================================================================

/// Canonical order-independent cart signature: kit id → total quantity.
pub(crate) fn signature(lines: &[CartLine]) -> BTreeMap<String, u64> {
    let mut sig = BTreeMap::new();
    for line in lines {
        *sig.entry(line.kit_id.clone()).or_insert(0u64) += u64::from(line.quantity);
    }
    sig
}

// =============================================================================
// Bundling Pass
// =============================================================================

/// Runs one bundling pass over the given lines. Pure: the caller decides
/// whether to adopt the rewritten lines (and does so only when `changed`).
pub fn bundle_pass(catalog: &Catalog, lines: &[CartLine]) -> BundlePass {
    // Availability table: one token per complete individual-kit unit,
    // tagged with the index of its source line. Accessory and extra-barrel
    // variants never count toward combo assembly.
    let mut pool: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (idx, line) in lines.iter().enumerate() {
        let Some((product, kit)) = catalog.kit(&line.product_id, &line.kit_id) else {
            continue;
        };
        if product.kind == ProductKind::Individual && kit.role == KitRole::Complete {
            let tokens = pool.entry(product.id.as_str()).or_default();
            for _ in 0..line.quantity {
                tokens.push_back(idx);
            }
        }
    }

    let mut ranked: Vec<_> = catalog.combos().collect();
    ranked.sort_by(|a, b| b.components.len().cmp(&a.components.len()));

    let mut consumed = vec![0u32; lines.len()];
    let mut formed: Vec<(&str, &str, u32)> = Vec::new();

    for combo in ranked {
        let Some(kit) = combo.complete_kit() else {
            continue;
        };
        if combo.components.is_empty() {
            continue;
        }

        // Component multiplicity: a combo may require the same product twice
        let mut required: HashMap<&str, usize> = HashMap::new();
        for component_id in &combo.components {
            *required.entry(component_id.as_str()).or_insert(0) += 1;
        }

        let mut count = 0u32;
        while required
            .iter()
            .all(|(product_id, needed)| pool.get(product_id).map_or(0, VecDeque::len) >= *needed)
        {
            for component_id in &combo.components {
                if let Some(tokens) = pool.get_mut(component_id.as_str()) {
                    if let Some(idx) = tokens.pop_front() {
                        consumed[idx] += 1;
                    }
                }
            }
            count += 1;
        }

        if count > 0 {
            formed.push((combo.id.as_str(), kit.id.as_str(), count));
        }
    }

    if formed.is_empty() {
        return BundlePass {
            lines: lines.to_vec(),
            formed: Vec::new(),
            changed: false,
        };
    }

    // Rebuild: shrink or drop consumed source lines, then append the combos
    let mut next: Vec<CartLine> = Vec::with_capacity(lines.len() + formed.len());
    for (idx, line) in lines.iter().enumerate() {
        if consumed[idx] == 0 {
            next.push(line.clone());
        } else if line.quantity > consumed[idx] {
            let mut kept = line.clone();
            kept.quantity -= consumed[idx];
            next.push(kept);
        }
    }
    let mut formed_summary = Vec::with_capacity(formed.len());
    for (product_id, kit_id, count) in formed {
        for _ in 0..count {
            next.push(CartLine::new(product_id, kit_id, 1));
        }
        formed_summary.push(FormedCombo {
            product_id: product_id.to_string(),
            count,
        });
    }

    let changed = signature(lines) != signature(&next);
    BundlePass {
        lines: next,
        formed: formed_summary,
        changed,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
