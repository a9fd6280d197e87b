//! Success message composition.

use crate::order::OrderLine;
use crate::scan::lookup::ProductMatch;
use crate::scan::result::ScanAcceptance;
use crate::scan::settings::ScanSettings;

pub const MESSAGE_SEPARATOR: &str = " | ";

/// Deterministic message for an accepted scan.
pub fn display_message(
    product: &ProductMatch,
    line: &OrderLine,
    incremented: bool,
    settings: &ScanSettings,
) -> String {
    let mut parts = Vec::with_capacity(2);

    if incremented {
        parts.push(format!("quantity updated to {}", line.quantity));
    } else {
        parts.push("added to order".to_string());
    }

    if settings.show_stock_info && product.is_stock_tracked() {
        let on_hand = product.qty_available.unwrap_or_default();
        parts.push(format!("on hand: {on_hand} {}", product.uom));
    }

    parts.join(MESSAGE_SEPARATOR)
}

pub fn accept(
    product: &ProductMatch,
    line: OrderLine,
    incremented: bool,
    settings: &ScanSettings,
) -> ScanAcceptance {
    ScanAcceptance {
        title: product.display_name.clone(),
        display_message: display_message(product, &line, incremented, settings),
        line,
        incremented,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderscan_core::AggregateId;
    use orderscan_products::{ProductId, ProductType};

    fn product(product_type: ProductType) -> ProductMatch {
        ProductMatch {
            product_id: ProductId::new(AggregateId::new()),
            display_name: "Widget".to_string(),
            product_type,
            qty_available: (product_type == ProductType::Storable).then_some(10),
            uom: "Units".to_string(),
            payload: None,
        }
    }

    fn line(quantity: i64) -> OrderLine {
        OrderLine {
            line_no: 1,
            product_id: None,
            description: "Widget".to_string(),
            quantity,
            unit_price: 0,
            display_type: None,
        }
    }

    #[test]
    fn added_with_stock_info() {
        let msg = display_message(
            &product(ProductType::Storable),
            &line(1),
            false,
            &ScanSettings::default(),
        );
        assert_eq!(msg, "added to order | on hand: 10 Units");
    }

    #[test]
    fn incremented_reports_new_quantity() {
        let msg = display_message(
            &product(ProductType::Storable),
            &line(4),
            true,
            &ScanSettings::default(),
        );
        assert_eq!(msg, "quantity updated to 4 | on hand: 10 Units");
    }

    #[test]
    fn stock_info_hidden_when_disabled() {
        let settings = ScanSettings {
            auto_increment: true,
            show_stock_info: false,
        };
        let msg = display_message(&product(ProductType::Storable), &line(1), false, &settings);
        assert_eq!(msg, "added to order");
    }

    #[test]
    fn stock_info_hidden_for_untracked_products() {
        let msg = display_message(
            &product(ProductType::Consumable),
            &line(2),
            true,
            &ScanSettings::default(),
        );
        assert_eq!(msg, "quantity updated to 2");
    }

    #[test]
    fn accept_uses_display_name_as_title() {
        let acceptance = accept(
            &product(ProductType::Service),
            line(1),
            false,
            &ScanSettings::default(),
        );
        assert_eq!(acceptance.title, "Widget");
        assert!(!acceptance.incremented);
        assert_eq!(acceptance.line.quantity, 1);
    }
}
