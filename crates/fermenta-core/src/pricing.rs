//! # Pricing Engine
//!
//! Pure price derivations over the catalog and cart: raw line totals,
//! effective unit counts, quantity-discount tiers pooled per product group,
//! and the promotional display price for discounted combos.
//!
//! ## Derivation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Discount Recomputation                            │
//! │                                                                     │
//! │  cart lines ──► group by product id                                 │
//! │                     │                                               │
//! │                     ├─► Σ effective units  ──► applicable_tier()    │
//! │                     │                              │                │
//! │                     └─► Σ raw line totals ────────►│                │
//! │                                                    ▼                │
//! │                               amount = subtotal × percent / 100     │
//! │                                                    │                │
//! │                                                    ▼                │
//! │                               DiscountMap[product id]               │
//! │                                                                     │
//! │  Rebuilt from scratch after EVERY cart mutation - never patched     │
//! │  incrementally, so it cannot drift from the cart state.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No faults, ever
//! A line whose product or kit no longer resolves contributes zero pesos and
//! zero units instead of failing: a stale persisted snapshot must never take
//! the pricing pass down.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::cart::CartLine;
use crate::catalog::{Catalog, DiscountTier, KitRole};
use crate::money::Money;

// =============================================================================
// Per-Line Derivations
// =============================================================================

/// Raw, pre-discount total for one line.
///
/// - `ExtraBarrels` kit: `base price + quantity × extra-barrel price`,
///   where quantity counts the extras beyond the included base unit.
/// - Any other kit: `price × quantity`.
pub fn line_total(catalog: &Catalog, line: &CartLine) -> Money {
    let Some((_, kit)) = catalog.kit(&line.product_id, &line.kit_id) else {
        return Money::zero();
    };
    match kit.role {
        KitRole::ExtraBarrels => {
            let per_barrel = kit.extra_barrel_price.unwrap_or_default();
            kit.price + per_barrel.times(line.quantity)
        }
        _ => kit.price.times(line.quantity),
    }
}

/// The physical-unit count a line contributes to discount-tier
/// qualification.
///
/// Tiers are defined in delivered units, not in the kit's internal quantity
/// encoding: an `ExtraBarrels` line delivers its included base unit plus the
/// extras, so it counts `1 + quantity`; every other line counts its quantity
/// directly.
pub fn effective_units(catalog: &Catalog, line: &CartLine) -> u32 {
    let Some((_, kit)) = catalog.kit(&line.product_id, &line.kit_id) else {
        return 0;
    };
    match kit.role {
        KitRole::ExtraBarrels => 1 + line.quantity,
        _ => line.quantity,
    }
}

// =============================================================================
// Tier Selection
// =============================================================================

/// Selects the tier with the highest threshold not exceeding `units`.
///
/// Tiers are a monotonic staircase: the winner is the *maximum* qualifying
/// threshold, whatever order the tiers were authored in. Below every
/// threshold there is no discount.
pub fn applicable_tier(tiers: &[DiscountTier], units: u32) -> Option<&DiscountTier> {
    tiers
        .iter()
        .filter(|tier| tier.min_units <= units)
        .max_by_key(|tier| tier.min_units)
}

// =============================================================================
// Group Discounts
// =============================================================================

/// An applicable discount for one product group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountEntry {
    /// The tier percentage that qualified.
    pub percent: u8,
    /// Absolute discount off the group's pooled subtotal.
    pub amount: Money,
}

/// Product id → applicable discount. Derived state: discarded and rebuilt on
/// every cart mutation.
pub type DiscountMap = HashMap<String, DiscountEntry>;

/// Computes the discount for every line of one product, pooled.
///
/// Effective units and raw subtotals are summed across all the product's kit
/// variants in the cart; the tier threshold is checked against the pooled
/// unit count and the percentage applies to the pooled subtotal. Returns
/// `None` when the product has no lines, no tiers, or no qualifying tier.
pub fn group_discount(
    catalog: &Catalog,
    product_id: &str,
    lines: &[CartLine],
) -> Option<DiscountEntry> {
    let product = catalog.product(product_id)?;

    let group: Vec<&CartLine> = lines
        .iter()
        .filter(|line| line.product_id == product_id)
        .collect();
    if group.is_empty() {
        return None;
    }

    let units: u32 = group.iter().map(|line| effective_units(catalog, line)).sum();
    let subtotal: Money = group.iter().map(|line| line_total(catalog, line)).sum();

    let tier = applicable_tier(&product.tiers, units)?;
    Some(DiscountEntry {
        percent: tier.percent,
        amount: subtotal.percent_of(tier.percent),
    })
}

/// Rebuilds the discount map from scratch for the given cart lines.
pub fn recompute_discounts(catalog: &Catalog, lines: &[CartLine]) -> DiscountMap {
    let mut map = DiscountMap::new();
    for line in lines {
        if map.contains_key(&line.product_id) {
            continue;
        }
        if let Some(entry) = group_discount(catalog, &line.product_id, lines) {
            map.insert(line.product_id.clone(), entry);
        }
    }
    map
}

/// The promotional display total for a discounted combo group: the pooled
/// subtotal minus the discount, charm-rounded to a `…990` ending.
///
/// Returns `None` for individual products and for combos without an active
/// discount - charm rounding is never applied pre-discount or to
/// non-combo prices.
pub fn combo_promo_total(
    catalog: &Catalog,
    lines: &[CartLine],
    product_id: &str,
    discounts: &DiscountMap,
) -> Option<Money> {
    let product = catalog.product(product_id)?;
    if !product.is_combo() {
        return None;
    }
    let entry = discounts.get(product_id)?;

    let subtotal: Money = lines
        .iter()
        .filter(|line| line.product_id == product_id)
        .map(|line| line_total(catalog, line))
        .sum();
    Some((subtotal - entry.amount).charm_rounded())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Kit, Product, ProductKind};

    /// A minimal catalog with hand-picked prices so the arithmetic in the
    /// assertions is easy to follow.
    fn test_catalog() -> Catalog {
        Catalog::new(vec![
            Product {
                id: "brew".to_string(),
                name: "Test Brew".to_string(),
                kind: ProductKind::Individual,
                kits: vec![
                    Kit {
                        id: "brew-complete".to_string(),
                        name: "Complete Kit".to_string(),
                        description: None,
                        price: Money::from_pesos(4_000),
                        extra_barrel_price: None,
                        role: KitRole::Complete,
                    },
                    Kit {
                        id: "brew-extras".to_string(),
                        name: "Kit + Extra Barrels".to_string(),
                        description: None,
                        price: Money::from_pesos(12_000),
                        extra_barrel_price: Some(Money::from_pesos(7_000)),
                        role: KitRole::ExtraBarrels,
                    },
                    Kit {
                        id: "brew-barrel".to_string(),
                        name: "Bare Barrel".to_string(),
                        description: None,
                        price: Money::from_pesos(9_000),
                        extra_barrel_price: None,
                        role: KitRole::BareBarrel,
                    },
                ],
                // Deliberately unsorted: consumers must not rely on order
                tiers: vec![
                    DiscountTier { min_units: 4, percent: 15 },
                    DiscountTier { min_units: 2, percent: 5 },
                    DiscountTier { min_units: 3, percent: 10 },
                ],
                components: vec![],
            },
            Product {
                id: "other".to_string(),
                name: "Other Brew".to_string(),
                kind: ProductKind::Individual,
                kits: vec![Kit {
                    id: "other-complete".to_string(),
                    name: "Complete Kit".to_string(),
                    description: None,
                    price: Money::from_pesos(5_000),
                    extra_barrel_price: None,
                    role: KitRole::Complete,
                }],
                tiers: vec![],
                components: vec![],
            },
            Product {
                id: "pair".to_string(),
                name: "Brew Pair".to_string(),
                kind: ProductKind::Combo,
                kits: vec![Kit {
                    id: "pair-complete".to_string(),
                    name: "Brew Pair Combo".to_string(),
                    description: None,
                    price: Money::from_pesos(31_500),
                    extra_barrel_price: None,
                    role: KitRole::Complete,
                }],
                tiers: vec![
                    DiscountTier { min_units: 2, percent: 5 },
                    DiscountTier { min_units: 3, percent: 10 },
                ],
                components: vec!["brew".to_string(), "other".to_string()],
            },
        ])
        .unwrap()
    }

    fn line(product_id: &str, kit_id: &str, quantity: u32) -> CartLine {
        CartLine::new(product_id, kit_id, quantity)
    }

    #[test]
    fn test_line_total_plain_kit() {
        let catalog = test_catalog();
        let total = line_total(&catalog, &line("brew", "brew-complete", 3));
        assert_eq!(total.pesos(), 12_000);
    }

    #[test]
    fn test_line_total_extra_barrels_kit() {
        let catalog = test_catalog();
        // base 12 000 + 2 extras × 7 000
        let total = line_total(&catalog, &line("brew", "brew-extras", 2));
        assert_eq!(total.pesos(), 26_000);
    }

    #[test]
    fn test_line_total_zero_quantity() {
        let catalog = test_catalog();
        assert_eq!(
            line_total(&catalog, &line("brew", "brew-complete", 0)).pesos(),
            0
        );
        // An extras line with no extras still costs the base kit
        assert_eq!(
            line_total(&catalog, &line("brew", "brew-extras", 0)).pesos(),
            12_000
        );
    }

    #[test]
    fn test_line_total_unresolvable_line_is_zero() {
        let catalog = test_catalog();
        assert_eq!(
            line_total(&catalog, &line("mead", "mead-complete", 3)).pesos(),
            0
        );
        assert_eq!(effective_units(&catalog, &line("mead", "mead-complete", 3)), 0);
    }

    #[test]
    fn test_effective_units() {
        let catalog = test_catalog();
        // 1 included base unit + 2 extras
        assert_eq!(effective_units(&catalog, &line("brew", "brew-extras", 2)), 3);
        assert_eq!(effective_units(&catalog, &line("brew", "brew-complete", 3)), 3);
    }

    #[test]
    fn test_applicable_tier_picks_highest_qualifying() {
        let tiers = vec![
            DiscountTier { min_units: 2, percent: 5 },
            DiscountTier { min_units: 3, percent: 10 },
            DiscountTier { min_units: 4, percent: 15 },
        ];
        assert_eq!(applicable_tier(&tiers, 3).unwrap().percent, 10);
        assert_eq!(applicable_tier(&tiers, 5).unwrap().percent, 15);
        assert!(applicable_tier(&tiers, 1).is_none());
        assert!(applicable_tier(&[], 10).is_none());
    }

    #[test]
    fn test_applicable_tier_ignores_authoring_order() {
        let tiers = vec![
            DiscountTier { min_units: 4, percent: 15 },
            DiscountTier { min_units: 2, percent: 5 },
            DiscountTier { min_units: 3, percent: 10 },
        ];
        // Highest qualifying threshold wins, not the first match
        assert_eq!(applicable_tier(&tiers, 3).unwrap().percent, 10);
    }

    #[test]
    fn test_group_discount_pools_kit_variants() {
        let catalog = test_catalog();
        // 2 complete kits (8 000, 2 units) + 1 bare barrel (9 000, 1 unit):
        // pooled 3 units cross the 10% tier on the pooled 17 000 subtotal.
        let lines = vec![
            line("brew", "brew-complete", 2),
            line("brew", "brew-barrel", 1),
        ];

        let entry = group_discount(&catalog, "brew", &lines).unwrap();
        assert_eq!(entry.percent, 10);
        assert_eq!(entry.amount.pesos(), 1_700);
    }

    #[test]
    fn test_group_discount_none_cases() {
        let catalog = test_catalog();
        let lines = vec![line("brew", "brew-complete", 1)];
        // One unit is below every threshold
        assert!(group_discount(&catalog, "brew", &lines).is_none());
        // No lines for the product
        assert!(group_discount(&catalog, "other", &lines).is_none());
        // Unknown product
        assert!(group_discount(&catalog, "mead", &lines).is_none());
        // Product without tiers never discounts
        let lines = vec![line("other", "other-complete", 5)];
        assert!(group_discount(&catalog, "other", &lines).is_none());
    }

    #[test]
    fn test_recompute_discounts_builds_full_map() {
        let catalog = test_catalog();
        let lines = vec![
            line("brew", "brew-complete", 3),
            line("other", "other-complete", 5),
        ];

        let map = recompute_discounts(&catalog, &lines);

        // brew qualifies (3 units → 10% of 12 000), other has no tiers
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("brew").unwrap().amount.pesos(), 1_200);
        assert!(!map.contains_key("other"));
    }

    #[test]
    fn test_combo_promo_total_is_charm_rounded() {
        let catalog = test_catalog();
        // Two bundler-formed combo lines: 2 units → 5% off 63 000 = 3 150,
        // discounted 59 850, charm-rounded up to 59 990.
        let lines = vec![
            line("pair", "pair-complete", 1),
            line("pair", "pair-complete", 1),
        ];
        let discounts = recompute_discounts(&catalog, &lines);

        let promo = combo_promo_total(&catalog, &lines, "pair", &discounts).unwrap();
        assert_eq!(promo.pesos(), 59_990);
    }

    #[test]
    fn test_combo_promo_total_requires_combo_and_discount() {
        let catalog = test_catalog();
        let lines = vec![line("brew", "brew-complete", 3)];
        let discounts = recompute_discounts(&catalog, &lines);

        // Individual products never charm-round, even with a discount
        assert!(discounts.contains_key("brew"));
        assert!(combo_promo_total(&catalog, &lines, "brew", &discounts).is_none());

        // A combo without an active discount shows its exact price
        let lines = vec![line("pair", "pair-complete", 1)];
        let discounts = recompute_discounts(&catalog, &lines);
        assert!(combo_promo_total(&catalog, &lines, "pair", &discounts).is_none());
    }
}
