use std::sync::Arc;

use thiserror::Error;

use orderscan_core::{DomainError, ExpectedVersion};
use orderscan_products::ProductId;
use orderscan_sales::{OrderLine, SalesOrder, SalesOrderId};

/// Values for a line created from a scan. Description and price are filled
/// in by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("order not found: {0}")]
    OrderNotFound(SalesOrderId),

    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    #[error("line {line_no} not found on order {order_id}")]
    LineNotFound { order_id: SalesOrderId, line_no: u32 },

    /// The order moved past the version the write was decided against.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("order store lock poisoned")]
    LockPoisoned,
}

/// Record store for orders and their lines.
///
/// Line writes carry the order version the caller decided against. A store
/// rejects the write with [`OrderStoreError::Concurrency`] when the order has
/// moved on since; the caller reloads and decides again.
pub trait OrderStore: Send + Sync {
    fn load(&self, order_id: SalesOrderId) -> Result<Option<SalesOrder>, OrderStoreError>;

    /// Append a product line and return it fully defaulted.
    fn create_line(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        line: NewOrderLine,
    ) -> Result<OrderLine, OrderStoreError>;

    /// Overwrite a product line's quantity and return the updated line.
    fn set_line_quantity(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        line_no: u32,
        quantity: i64,
    ) -> Result<OrderLine, OrderStoreError>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn load(&self, order_id: SalesOrderId) -> Result<Option<SalesOrder>, OrderStoreError> {
        (**self).load(order_id)
    }

    fn create_line(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        line: NewOrderLine,
    ) -> Result<OrderLine, OrderStoreError> {
        (**self).create_line(order_id, expected, line)
    }

    fn set_line_quantity(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        line_no: u32,
        quantity: i64,
    ) -> Result<OrderLine, OrderStoreError> {
        (**self).set_line_quantity(order_id, expected, line_no, quantity)
    }
}
