//! Scan outcomes: structured rejections and acceptances.

use serde::{Deserialize, Serialize};

use crate::order::OrderLine;

/// Why a scan left the order untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    OrderCancelled,
    OrderLocked,
    ProductNotFound,
    ProductUnresolved,
    OrderNotFound,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::OrderCancelled => "ORDER_CANCELLED",
            RejectReason::OrderLocked => "ORDER_LOCKED",
            RejectReason::ProductNotFound => "PRODUCT_NOT_FOUND",
            RejectReason::ProductUnresolved => "PRODUCT_UNRESOLVED",
            RejectReason::OrderNotFound => "ORDER_NOT_FOUND",
        }
    }

    /// Warning title shown by the UI.
    pub fn title(&self) -> &'static str {
        match self {
            RejectReason::OrderCancelled => "Order Cancelled",
            RejectReason::OrderLocked => "Order Locked",
            RejectReason::ProductNotFound => "Product Not Found",
            RejectReason::ProductUnresolved => "Product Error",
            RejectReason::OrderNotFound => "Order Not Found",
        }
    }
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scan the order did not accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRejection {
    pub reason: RejectReason,
    pub title: String,
    pub message: String,
}

impl ScanRejection {
    pub fn new(reason: RejectReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            title: reason.title().to_string(),
            message: message.into(),
        }
    }

    pub fn order_cancelled() -> Self {
        Self::new(
            RejectReason::OrderCancelled,
            "Cannot add products to a cancelled order.",
        )
    }

    pub fn order_locked() -> Self {
        Self::new(RejectReason::OrderLocked, "Cannot modify a locked order.")
    }

    pub fn product_not_found(message: impl Into<String>) -> Self {
        Self::new(RejectReason::ProductNotFound, message)
    }

    pub fn product_unresolved() -> Self {
        Self::new(RejectReason::ProductUnresolved, "Could not determine product ID")
    }

    pub fn order_not_found() -> Self {
        Self::new(RejectReason::OrderNotFound, "Order not found")
    }
}

/// A scan that mutated the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanAcceptance {
    /// Product display name.
    pub title: String,
    #[serde(rename = "message")]
    pub display_message: String,
    pub line: OrderLine,
    pub incremented: bool,
}

/// Result of one scan. Serializes as `{"warning": {..}}` or `{"success": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanResult {
    #[serde(rename = "warning")]
    Rejected(ScanRejection),
    #[serde(rename = "success")]
    Accepted(ScanAcceptance),
}

impl ScanResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanResult::Accepted(_))
    }

    pub fn rejection(&self) -> Option<&ScanRejection> {
        match self {
            ScanResult::Rejected(r) => Some(r),
            ScanResult::Accepted(_) => None,
        }
    }

    pub fn acceptance(&self) -> Option<&ScanAcceptance> {
        match self {
            ScanResult::Accepted(a) => Some(a),
            ScanResult::Rejected(_) => None,
        }
    }

    pub fn reason(&self) -> Option<RejectReason> {
        self.rejection().map(|r| r.reason)
    }
}

impl From<ScanRejection> for ScanResult {
    fn from(value: ScanRejection) -> Self {
        ScanResult::Rejected(value)
    }
}

impl From<ScanAcceptance> for ScanResult {
    fn from(value: ScanAcceptance) -> Self {
        ScanResult::Accepted(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejection_serializes_as_warning() {
        let result = ScanResult::from(ScanRejection::order_locked());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "warning": {
                    "reason": "ORDER_LOCKED",
                    "title": "Order Locked",
                    "message": "Cannot modify a locked order.",
                }
            })
        );
    }

    #[test]
    fn acceptance_serializes_as_success_with_message() {
        let result = ScanResult::from(ScanAcceptance {
            title: "Widget".to_string(),
            display_message: "added to order".to_string(),
            line: OrderLine {
                line_no: 1,
                product_id: None,
                description: "Widget".to_string(),
                quantity: 1,
                unit_price: 0,
                display_type: None,
            },
            incremented: false,
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"]["title"], "Widget");
        assert_eq!(value["success"]["message"], "added to order");
        assert_eq!(value["success"]["incremented"], false);
    }

    #[test]
    fn reason_codes_match_wire_names() {
        for reason in [
            RejectReason::OrderCancelled,
            RejectReason::OrderLocked,
            RejectReason::ProductNotFound,
            RejectReason::ProductUnresolved,
            RejectReason::OrderNotFound,
        ] {
            let wire = serde_json::to_value(reason).unwrap();
            assert_eq!(wire, json!(reason.as_str()));
        }
    }
}
