//! # Catalog Types
//!
//! Product and kit definitions for the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                               │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │    Product      │   │      Kit        │   │  DiscountTier   │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  id             │──►│  id             │   │  min_units      │    │
//! │  │  kind           │   │  role           │   │  percent        │    │
//! │  │  kits[]         │   │  price          │   └─────────────────┘    │
//! │  │  tiers[]        │   │  extra_barrel_  │                          │
//! │  │  components[]   │   │    price        │   Combos list the        │
//! │  └─────────────────┘   └─────────────────┘   individual products    │
//! │                                              they are built from    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Kits carry an explicit [`KitRole`] tag assigned at definition time.
//! Everything downstream (pricing, bundling, price-feed patching) dispatches
//! on the tag, never on the shape of the kit id.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::error::CatalogError;
use crate::money::Money;

// =============================================================================
// Kit
// =============================================================================

/// What a kit variant represents, set once at catalog-definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum KitRole {
    /// One full, ready-to-brew unit of the product.
    Complete,
    /// Container-only accessory variant (no culture, no starter).
    BareBarrel,
    /// One complete kit plus extra fermentation barrels; the cart quantity
    /// counts the extras beyond the included base unit.
    ExtraBarrels,
}

/// A purchasable configuration of a product.
///
/// Kits are immutable once defined, except that an external price feed may
/// overwrite `price` and `extra_barrel_price` in place (identity preserved).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Kit {
    /// Stable identifier, unique within the owning product.
    pub id: String,

    /// Display name shown on cards and in the order message.
    pub name: String,

    /// Optional description for the product detail screen.
    pub description: Option<String>,

    /// Base price. For `ExtraBarrels` kits this covers the included base
    /// unit; extras are priced separately.
    pub price: Money,

    /// Per-extra-barrel price. Present exactly when `role` is
    /// `ExtraBarrels`.
    pub extra_barrel_price: Option<Money>,

    /// What this kit variant represents.
    pub role: KitRole,
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product is sold on its own or as a bundle of others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// A standalone product.
    Individual,
    /// A bundle composed of individual products, priced below their sum.
    Combo,
}

/// A quantity-discount step: `percent`% off once the product group reaches
/// `min_units` effective units.
///
/// Tiers are stored in authoring order, not sorted; consumers must select
/// the highest threshold that qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountTier {
    pub min_units: u32,
    pub percent: u8,
}

/// A sellable item with one or more kit variants.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable identifier, unique across the catalog.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Standalone product or bundled combo.
    pub kind: ProductKind,

    /// The purchasable configurations of this product.
    pub kits: Vec<Kit>,

    /// Quantity-discount tiers, pooled across every kit variant of the
    /// product in the cart. Empty means no automatic discount.
    #[serde(default)]
    pub tiers: Vec<DiscountTier>,

    /// For combos: the individual products this bundle is assembled from,
    /// with multiplicity (a component may appear twice). Empty for
    /// individual products.
    #[serde(default)]
    pub components: Vec<String>,
}

impl Product {
    /// Looks up a kit variant by id.
    pub fn kit(&self, kit_id: &str) -> Option<&Kit> {
        self.kits.iter().find(|k| k.id == kit_id)
    }

    /// The complete-kit variant, if the product defines one. This is the
    /// variant the auto-bundler consumes and emits.
    pub fn complete_kit(&self) -> Option<&Kit> {
        self.kits.iter().find(|k| k.role == KitRole::Complete)
    }

    /// Whether this product is a combo bundle.
    #[inline]
    pub fn is_combo(&self) -> bool {
        self.kind == ProductKind::Combo
    }
}

// =============================================================================
// Price Feed
// =============================================================================

/// A price patch for one product, as supplied by the external price sheet.
/// Either field may be absent; absent fields leave catalog prices unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Price of a single barrel: patches `BareBarrel` kit prices and the
    /// per-extra-barrel price of `ExtraBarrels` kits.
    pub unit_price: Option<Money>,

    /// Price of a complete kit: patches `Complete` kit prices and the base
    /// price of `ExtraBarrels` kits.
    pub complete_kit_price: Option<Money>,
}

/// The injected price mapping, keyed by product id. Partial by design:
/// products missing from the feed keep their current prices.
pub type PriceFeed = HashMap<String, PriceUpdate>;

// =============================================================================
// Catalog
// =============================================================================

/// The full set of product definitions.
///
/// Loaded once at startup and optionally patched in place by the external
/// price feed. Never mutated by cart operations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from product definitions, rejecting invalid data.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let catalog = Catalog { products };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Looks up a product by id.
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Looks up a kit by product id and kit id, returning both.
    pub fn kit(&self, product_id: &str, kit_id: &str) -> Option<(&Product, &Kit)> {
        let product = self.product(product_id)?;
        let kit = product.kit(kit_id)?;
        Some((product, kit))
    }

    /// All products, in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// All combo products, in catalog order.
    pub fn combos(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_combo())
    }

    /// Checks the catalog invariants:
    /// - product and kit ids are unique
    /// - every combo component resolves to an existing individual product
    /// - combos have components and a complete-kit variant
    /// - individual products carry no component list
    /// - every `ExtraBarrels` kit has a per-barrel price
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen_products = HashSet::new();
        for product in &self.products {
            if !seen_products.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }

            let mut seen_kits = HashSet::new();
            for kit in &product.kits {
                if !seen_kits.insert(kit.id.as_str()) {
                    return Err(CatalogError::DuplicateKit {
                        product_id: product.id.clone(),
                        kit_id: kit.id.clone(),
                    });
                }
                if kit.role == KitRole::ExtraBarrels && kit.extra_barrel_price.is_none() {
                    return Err(CatalogError::MissingExtraBarrelPrice {
                        product_id: product.id.clone(),
                        kit_id: kit.id.clone(),
                    });
                }
            }

            match product.kind {
                ProductKind::Individual => {
                    if !product.components.is_empty() {
                        return Err(CatalogError::IndividualWithComponents(product.id.clone()));
                    }
                }
                ProductKind::Combo => {
                    if product.components.is_empty() {
                        return Err(CatalogError::EmptyCombo(product.id.clone()));
                    }
                    if product.complete_kit().is_none() {
                        return Err(CatalogError::ComboWithoutCompleteKit(product.id.clone()));
                    }
                    for component_id in &product.components {
                        match self.product(component_id) {
                            None => {
                                return Err(CatalogError::UnknownComponent {
                                    combo_id: product.id.clone(),
                                    component_id: component_id.clone(),
                                })
                            }
                            Some(component) if component.is_combo() => {
                                return Err(CatalogError::ComponentNotIndividual {
                                    combo_id: product.id.clone(),
                                    component_id: component_id.clone(),
                                })
                            }
                            Some(_) => {}
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies a price feed in place, dispatching on each kit's role:
    ///
    /// | role           | `unit_price`         | `complete_kit_price` |
    /// |----------------|----------------------|----------------------|
    /// | `Complete`     | —                    | base price           |
    /// | `BareBarrel`   | base price           | —                    |
    /// | `ExtraBarrels` | per-extra-barrel     | base price           |
    ///
    /// Products absent from the feed, and fields absent from an entry, leave
    /// the current prices untouched.
    pub fn apply_price_feed(&mut self, feed: &PriceFeed) {
        for product in &mut self.products {
            let Some(update) = feed.get(&product.id) else {
                continue;
            };
            for kit in &mut product.kits {
                match kit.role {
                    KitRole::Complete => {
                        if let Some(price) = update.complete_kit_price {
                            kit.price = price;
                        }
                    }
                    KitRole::BareBarrel => {
                        if let Some(price) = update.unit_price {
                            kit.price = price;
                        }
                    }
                    KitRole::ExtraBarrels => {
                        if let Some(price) = update.complete_kit_price {
                            kit.price = price;
                        }
                        if let Some(price) = update.unit_price {
                            kit.extra_barrel_price = Some(price);
                        }
                    }
                }
            }
        }
    }
}

// =============================================================================
// Standard Catalog Data
// =============================================================================

impl Catalog {
    /// The built-in storefront catalog: three individual brew-kit products
    /// and two combos. Pure data; a unit test asserts it validates.
    pub fn standard() -> Self {
        fn kit(
            id: &str,
            name: &str,
            description: Option<&str>,
            price: i64,
            extra_barrel_price: Option<i64>,
            role: KitRole,
        ) -> Kit {
            Kit {
                id: id.to_string(),
                name: name.to_string(),
                description: description.map(str::to_string),
                price: Money::from_pesos(price),
                extra_barrel_price: extra_barrel_price.map(Money::from_pesos),
                role,
            }
        }

        let tiers = |steps: &[(u32, u8)]| {
            steps
                .iter()
                .map(|&(min_units, percent)| DiscountTier { min_units, percent })
                .collect::<Vec<_>>()
        };

        Catalog {
            products: vec![
                Product {
                    id: "kombucha".to_string(),
                    name: "Kombucha".to_string(),
                    kind: ProductKind::Individual,
                    kits: vec![
                        kit(
                            "kombucha-complete",
                            "Kombucha Complete Kit",
                            Some("5L fermentation barrel, SCOBY culture, starter tea and bottling set"),
                            18_000,
                            None,
                            KitRole::Complete,
                        ),
                        kit(
                            "kombucha-extra-barrels",
                            "Kombucha Kit + Extra Barrels",
                            Some("One complete kit plus additional fermentation barrels"),
                            18_000,
                            Some(12_000),
                            KitRole::ExtraBarrels,
                        ),
                        kit(
                            "kombucha-barrel",
                            "Spare Fermentation Barrel",
                            Some("5L barrel only, no culture"),
                            9_000,
                            None,
                            KitRole::BareBarrel,
                        ),
                    ],
                    tiers: tiers(&[(2, 5), (3, 10), (4, 15)]),
                    components: vec![],
                },
                Product {
                    id: "ginger-beer".to_string(),
                    name: "Ginger Beer".to_string(),
                    kind: ProductKind::Individual,
                    kits: vec![
                        kit(
                            "ginger-beer-complete",
                            "Ginger Beer Complete Kit",
                            Some("5L fermentation barrel, ginger bug starter, spice blend and bottling set"),
                            16_500,
                            None,
                            KitRole::Complete,
                        ),
                        kit(
                            "ginger-beer-extra-barrels",
                            "Ginger Beer Kit + Extra Barrels",
                            Some("One complete kit plus additional fermentation barrels"),
                            16_500,
                            Some(11_000),
                            KitRole::ExtraBarrels,
                        ),
                        kit(
                            "ginger-beer-barrel",
                            "Spare Fermentation Barrel",
                            Some("5L barrel only, no starter"),
                            8_500,
                            None,
                            KitRole::BareBarrel,
                        ),
                    ],
                    tiers: tiers(&[(2, 5), (3, 10), (4, 15)]),
                    components: vec![],
                },
                Product {
                    id: "cold-brew".to_string(),
                    name: "Cold Brew Coffee".to_string(),
                    kind: ProductKind::Individual,
                    kits: vec![
                        kit(
                            "cold-brew-complete",
                            "Cold Brew Complete Kit",
                            Some("3L steeping barrel, reusable filter and single-origin grounds"),
                            14_000,
                            None,
                            KitRole::Complete,
                        ),
                        kit(
                            "cold-brew-barrel",
                            "Spare Steeping Barrel",
                            Some("3L barrel only, no filter"),
                            7_500,
                            None,
                            KitRole::BareBarrel,
                        ),
                    ],
                    tiers: tiers(&[(2, 5), (3, 10)]),
                    components: vec![],
                },
                Product {
                    id: "combo-duo".to_string(),
                    name: "Brewer's Duo".to_string(),
                    kind: ProductKind::Combo,
                    kits: vec![kit(
                        "combo-duo-complete",
                        "Brewer's Duo Combo",
                        Some("Kombucha and Ginger Beer complete kits, bundled"),
                        31_500,
                        None,
                        KitRole::Complete,
                    )],
                    tiers: tiers(&[(2, 5), (3, 10)]),
                    components: vec!["kombucha".to_string(), "ginger-beer".to_string()],
                },
                Product {
                    id: "combo-trio".to_string(),
                    name: "Brewer's Trio".to_string(),
                    kind: ProductKind::Combo,
                    kits: vec![kit(
                        "combo-trio-complete",
                        "Brewer's Trio Combo",
                        Some("Kombucha, Ginger Beer and Cold Brew complete kits, bundled"),
                        43_500,
                        None,
                        KitRole::Complete,
                    )],
                    tiers: tiers(&[(2, 5), (3, 10)]),
                    components: vec![
                        "kombucha".to_string(),
                        "ginger-beer".to_string(),
                        "cold-brew".to_string(),
                    ],
                },
            ],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
