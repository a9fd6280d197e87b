//! Increment-vs-insert decision.

use serde::{Deserialize, Serialize};

use orderscan_core::{DomainError, DomainResult};
use orderscan_products::ProductId;

use crate::order::{OrderLine, SalesOrder};
use crate::scan::lookup::ProductMatch;
use crate::scan::settings::ScanSettings;

/// Line mutation chosen for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineChange {
    /// Set an existing line to `quantity` (its previous quantity + 1).
    Increment { line_no: u32, quantity: i64 },
    /// Append a new product line.
    Insert { product_id: ProductId, quantity: i64 },
}

impl LineChange {
    pub fn is_increment(&self) -> bool {
        matches!(self, LineChange::Increment { .. })
    }
}

/// First product line for `product_id` in line order. Section and note lines
/// are never merge targets.
pub fn merge_candidate(order: &SalesOrder, product_id: ProductId) -> Option<&OrderLine> {
    order
        .lines()
        .iter()
        .find(|line| line.is_product_line_for(product_id))
}

/// Decide how a scan of `product` changes `order`.
///
/// Fails only when incrementing the merge target would overflow its quantity.
pub fn decide(
    order: &SalesOrder,
    product: &ProductMatch,
    settings: &ScanSettings,
) -> DomainResult<LineChange> {
    let change = match merge_candidate(order, product.product_id) {
        Some(line) if settings.auto_increment => LineChange::Increment {
            line_no: line.line_no,
            quantity: line.quantity.checked_add(1).ok_or_else(|| {
                DomainError::validation(format!(
                    "quantity of line {} cannot be incremented further",
                    line.line_no
                ))
            })?,
        },
        _ => LineChange::Insert {
            product_id: product.product_id,
            quantity: product.initial_quantity(),
        },
    };
    Ok(change)
}
