//! Scan resolution pipeline (application-level orchestration).
//!
//! Composes the pure scan stages from `orderscan_sales::scan` with the
//! injected collaborators:
//!
//! ```text
//! barcode
//!   ↓
//! 1. Load order (OrderStore)            → ORDER_NOT_FOUND
//!   ↓
//! 2. Guard (cancelled / locked)         → ORDER_CANCELLED / ORDER_LOCKED
//!   ↓
//! 3. Lookup (CatalogLookup)             → PRODUCT_NOT_FOUND / PRODUCT_UNRESOLVED
//!   ↓
//! 4. Read settings (ConfigStore)
//!   ↓
//! 5. Decide increment vs insert, execute it (OrderStore)
//!   ↓
//! 6. Format the acceptance
//! ```
//!
//! Business rejections come back as `Ok(ScanResult::Rejected)`. Only
//! collaborator failures (store errors, poisoned locks) surface as `Err`.
//!
//! Steps 1-5 decide against one loaded version of the order. The write in
//! step 5 is conditional on that version; if another scan got there first the
//! whole pipeline runs again on a fresh load, up to [`MAX_SCAN_ATTEMPTS`] times.

use tracing::{debug, info, warn};

use orderscan_core::{AggregateRoot, DomainError, ExpectedVersion};
use orderscan_products::CatalogLookup;
use orderscan_sales::scan::{self, LineChange};
use orderscan_sales::{
    ConfigStore, OrderLine, ScanRejection, ScanResult, ScanSettings, SalesOrderId,
};

use crate::order_store::{NewOrderLine, OrderStore, OrderStoreError};

/// Attempts per scan before a concurrency conflict is surfaced.
pub const MAX_SCAN_ATTEMPTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The order store failed to load or mutate the order.
    #[error("order store failure: {0}")]
    Store(#[from] OrderStoreError),

    /// The line change cannot be applied, e.g. a quantity at its maximum.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Scan Resolver over injected order, catalog and configuration collaborators.
///
/// Holds no per-scan state; the same resolver may serve concurrent scans.
/// Concurrent scans on one order are serialized by the order store, not here.
#[derive(Debug)]
pub struct ScanResolver<S, C, K> {
    orders: S,
    catalog: C,
    config: K,
}

impl<S, C, K> ScanResolver<S, C, K>
where
    S: OrderStore,
    C: CatalogLookup,
    K: ConfigStore,
{
    pub fn new(orders: S, catalog: C, config: K) -> Self {
        Self {
            orders,
            catalog,
            config,
        }
    }

    pub fn orders(&self) -> &S {
        &self.orders
    }

    /// Resolve `barcode` against `order_id` and apply the resulting line change.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn scan(&self, order_id: SalesOrderId, barcode: &str) -> Result<ScanResult, ScanError> {
        let mut attempt = 1;
        let outcome = loop {
            match self.try_scan(order_id, barcode) {
                Err(ScanError::Store(OrderStoreError::Concurrency(detail)))
                    if attempt < MAX_SCAN_ATTEMPTS =>
                {
                    debug!(attempt, %detail, "order changed during scan, retrying");
                    attempt += 1;
                }
                other => break other?,
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(rejection) => {
                warn!(
                    order_id = %order_id,
                    reason = rejection.reason.as_str(),
                    detail = %rejection.message,
                    "scan rejected"
                );
                ScanResult::Rejected(rejection)
            }
        };
        Ok(result)
    }

    /// Entry point for line-creation flows. Behaves exactly like [`Self::scan`].
    pub fn create_line_from_scan(
        &self,
        order_id: SalesOrderId,
        barcode: &str,
    ) -> Result<ScanResult, ScanError> {
        self.scan(order_id, barcode)
    }

    /// Whether the order currently accepts scans. `None` when the order is unknown.
    pub fn can_scan(&self, order_id: SalesOrderId) -> Result<Option<bool>, ScanError> {
        let order = self.orders.load(order_id)?;
        Ok(order.as_ref().map(scan::can_scan))
    }

    fn try_scan(
        &self,
        order_id: SalesOrderId,
        barcode: &str,
    ) -> Result<Result<ScanResult, ScanRejection>, ScanError> {
        let Some(order) = self.orders.load(order_id)? else {
            return Ok(Err(ScanRejection::order_not_found()));
        };
        let Some(company_id) = order.company_id() else {
            return Ok(Err(ScanRejection::order_not_found()));
        };
        let expected = ExpectedVersion::Exact(order.version());

        if let Err(rejection) = scan::check_mutable(&order) {
            return Ok(Err(rejection));
        }
        debug!("guard passed");

        let product = match scan::resolve(&self.catalog, barcode, company_id) {
            Ok(product) => product,
            Err(rejection) => return Ok(Err(rejection)),
        };
        debug!(product_id = %product.product_id, "barcode resolved");

        let settings = ScanSettings::load(&self.config);
        let change = scan::decide(&order, &product, &settings)?;
        debug!(?change, auto_increment = settings.auto_increment, "line change decided");

        let line = self.execute(order_id, expected, change)?;
        let incremented = change.is_increment();

        info!(
            order_id = %order_id,
            product_id = %product.product_id,
            line_no = line.line_no,
            quantity = line.quantity,
            incremented,
            "scan accepted"
        );

        Ok(Ok(ScanResult::Accepted(scan::accept(
            &product,
            line,
            incremented,
            &settings,
        ))))
    }

    fn execute(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        change: LineChange,
    ) -> Result<OrderLine, ScanError> {
        let line = match change {
            LineChange::Increment { line_no, quantity } => {
                self.orders
                    .set_line_quantity(order_id, expected, line_no, quantity)?
            }
            LineChange::Insert {
                product_id,
                quantity,
            } => self.orders.create_line(
                order_id,
                expected,
                NewOrderLine {
                    product_id,
                    quantity,
                },
            )?,
        };
        Ok(line)
    }
}
