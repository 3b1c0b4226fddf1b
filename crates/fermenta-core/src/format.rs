//! # Order Message Formatter
//!
//! Renders a cart plus its derived discounts into the single human-readable
//! order summary handed to the outbound contact channel. The formatter knows
//! nothing about how the text is transmitted.

use crate::cart::CartLine;
use crate::catalog::{Catalog, KitRole};
use crate::money::Money;
use crate::pricing::{line_total, DiscountMap};

/// Sent when the customer taps "order" with nothing in the cart.
pub const EMPTY_ORDER_MESSAGE: &str = "Hi! I'd like to know more about your brewing kits.";

const ORDER_HEADER: &str = "Hi! I'd like to place the following order:";

/// Builds the order summary text.
///
/// One line per cart line: kit name, owning product name, a quantity
/// annotation that depends on the kit ("(with N extra barrels)" only when
/// N > 0, nothing for combos, "(xN)" otherwise), and the raw line total.
/// The footer shows subtotal/discount/total when any discount applies,
/// otherwise just the total. Lines that no longer resolve against the
/// catalog are skipped rather than rendered wrong.
pub fn format_order(catalog: &Catalog, lines: &[CartLine], discounts: &DiscountMap) -> String {
    if lines.is_empty() {
        return EMPTY_ORDER_MESSAGE.to_string();
    }

    let mut message = vec![ORDER_HEADER.to_string(), String::new()];

    for line in lines {
        let Some((product, kit)) = catalog.kit(&line.product_id, &line.kit_id) else {
            continue;
        };
        let annotation = if product.is_combo() {
            String::new()
        } else {
            match kit.role {
                KitRole::ExtraBarrels if line.quantity == 1 => " (with 1 extra barrel)".to_string(),
                KitRole::ExtraBarrels if line.quantity > 1 => {
                    format!(" (with {} extra barrels)", line.quantity)
                }
                KitRole::ExtraBarrels => String::new(),
                _ => format!(" (x{})", line.quantity),
            }
        };
        message.push(format!(
            "- {} ({}){}: {}",
            kit.name,
            product.name,
            annotation,
            line_total(catalog, line)
        ));
    }

    message.push(String::new());

    let subtotal: Money = lines.iter().map(|line| line_total(catalog, line)).sum();
    if discounts.is_empty() {
        message.push(format!("Total: {}", subtotal));
    } else {
        let discount_total: Money = discounts.values().map(|entry| entry.amount).sum();
        message.push(format!("Subtotal: {}", subtotal));
        message.push(format!("Discount: {}", discount_total));
        message.push(format!("Total: {}", subtotal - discount_total));
    }

    message.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::pricing::recompute_discounts;

    #[test]
    fn test_empty_cart_sends_inquiry() {
        let catalog = Catalog::standard();
        assert_eq!(
            format_order(&catalog, &[], &DiscountMap::new()),
            EMPTY_ORDER_MESSAGE
        );
    }

    #[test]
    fn test_order_without_discount() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(&catalog, "cold-brew", "cold-brew-complete", 1).unwrap();

        let text = format_order(&catalog, cart.lines(), &DiscountMap::new());

        assert_eq!(
            text,
            "Hi! I'd like to place the following order:\n\
             \n\
             - Cold Brew Complete Kit (Cold Brew Coffee) (x1): $14.000\n\
             \n\
             Total: $14.000"
        );
    }

    #[test]
    fn test_order_with_discount_footer() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        // 3 cold brew kits cross the 10% tier: 42 000 − 4 200 = 37 800
        cart.add(&catalog, "cold-brew", "cold-brew-complete", 3).unwrap();
        let discounts = recompute_discounts(&catalog, cart.lines());

        let text = format_order(&catalog, cart.lines(), &discounts);

        assert!(text.contains("- Cold Brew Complete Kit (Cold Brew Coffee) (x3): $42.000"));
        assert!(text.contains("Subtotal: $42.000"));
        assert!(text.contains("Discount: $4.200"));
        assert!(text.contains("Total: $37.800"));
    }

    #[test]
    fn test_extra_barrel_annotation_only_when_present() {
        let catalog = Catalog::standard();

        let with_extras = CartLine::new("kombucha", "kombucha-extra-barrels", 2);
        let text = format_order(&catalog, &[with_extras], &DiscountMap::new());
        assert!(text.contains("Kombucha Kit + Extra Barrels (Kombucha) (with 2 extra barrels): $42.000"));

        let single = CartLine::new("kombucha", "kombucha-extra-barrels", 1);
        let text = format_order(&catalog, &[single], &DiscountMap::new());
        assert!(text.contains("(with 1 extra barrel):"));

        let bare = CartLine::new("kombucha", "kombucha-extra-barrels", 0);
        let text = format_order(&catalog, &[bare], &DiscountMap::new());
        assert!(!text.contains("extra barrel"));
        assert!(text.contains("Kombucha Kit + Extra Barrels (Kombucha): $18.000"));
    }

    #[test]
    fn test_combo_line_has_no_quantity_annotation() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(&catalog, "combo-duo", "combo-duo-complete", 1).unwrap();

        let text = format_order(&catalog, cart.lines(), &DiscountMap::new());

        assert!(text.contains("- Brewer's Duo Combo (Brewer's Duo): $31.500"));
        assert!(!text.contains("(x1)"));
    }

    #[test]
    fn test_unresolvable_lines_are_skipped() {
        let catalog = Catalog::standard();
        let stale = CartLine::new("mead", "mead-complete", 2);
        let good = CartLine::new("cold-brew", "cold-brew-complete", 1);

        let text = format_order(&catalog, &[stale, good], &DiscountMap::new());

        assert!(!text.contains("mead"));
        assert!(text.contains("Cold Brew Complete Kit"));
        assert!(text.contains("Total: $14.000"));
    }
}
