//! # Error Types
//!
//! Domain-specific error types for fermenta-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  fermenta-core errors (this file)                                   │
//! │  ├── CoreError     - Cart/lookup failures                           │
//! │  └── CatalogError  - Catalog definition violations                  │
//! │                                                                     │
//! │  fermenta-shop errors (separate crate)                              │
//! │  ├── StorageError  - Key-value store failures                       │
//! │  └── FeedError     - Price-sheet fetch/parse failures               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, kit id, etc.)
//! 3. Errors are enum variants, never String
//!
//! Note that none of these are reachable from well-formed UI flows: the
//! pricing pass itself degrades unresolvable references to zero instead of
//! failing (see `pricing`), and the storefront shell recovers from every
//! anomaly. These errors exist for callers that pass ids the catalog has
//! never heard of.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and lookup errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced product id does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The referenced kit id does not exist on the given product.
    #[error("Kit not found: {kit_id} (product {product_id})")]
    KitNotFound { product_id: String, kit_id: String },

    /// The referenced cart line id does not exist in the cart.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Catalog definition error (wraps CatalogError).
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Catalog definition violations, caught by `Catalog::validate`.
///
/// These indicate an authoring mistake in the product data (or a broken
/// feed of it), never a runtime user action.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two products share one id.
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Two kits of one product share one id.
    #[error("Duplicate kit id {kit_id} on product {product_id}")]
    DuplicateKit { product_id: String, kit_id: String },

    /// A combo component id resolves to nothing.
    #[error("Combo {combo_id} references unknown component {component_id}")]
    UnknownComponent {
        combo_id: String,
        component_id: String,
    },

    /// A combo component must be an individual product, not another combo.
    #[error("Combo {combo_id} component {component_id} is not an individual product")]
    ComponentNotIndividual {
        combo_id: String,
        component_id: String,
    },

    /// A combo needs at least one component to be assemblable.
    #[error("Combo {0} has no components")]
    EmptyCombo(String),

    /// A combo needs a complete-kit variant for the bundler to emit.
    #[error("Combo {0} has no complete-kit variant")]
    ComboWithoutCompleteKit(String),

    /// An individual product must not carry a component list.
    #[error("Individual product {0} carries combo components")]
    IndividualWithComponents(String),

    /// An extra-barrels kit without a per-barrel price cannot be priced.
    #[error("Kit {kit_id} on product {product_id} has no extra-barrel price")]
    MissingExtraBarrelPrice { product_id: String, kit_id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::KitNotFound {
            product_id: "kombucha".to_string(),
            kit_id: "kombucha-barrel".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Kit not found: kombucha-barrel (product kombucha)"
        );
    }

    #[test]
    fn test_catalog_error_converts_to_core_error() {
        let catalog_err = CatalogError::EmptyCombo("combo-duo".to_string());
        let core_err: CoreError = catalog_err.into();
        assert!(matches!(core_err, CoreError::Catalog(_)));
        assert_eq!(
            core_err.to_string(),
            "Invalid catalog: Combo combo-duo has no components"
        );
    }
}
