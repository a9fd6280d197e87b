use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;

use orderscan_core::{Aggregate, AggregateId, AggregateRoot, CompanyId, ExpectedVersion};
use orderscan_events::{Event, RecordedEvent};
use orderscan_products::CatalogLookup;
use orderscan_sales::{
    AddLine, CreateSalesOrder, OrderLine, SalesOrder, SalesOrderCommand, SalesOrderEvent,
    SalesOrderId, SetLineQuantity,
};

use super::r#trait::{NewOrderLine, OrderStore, OrderStoreError};

/// In-memory order store.
///
/// Intended for tests/dev. Each write holds the write lock for its whole
/// version-check-apply cycle, which serializes writes per store.
#[derive(Debug)]
pub struct InMemoryOrderStore<C> {
    orders: RwLock<HashMap<SalesOrderId, OrderEntry>>,
    catalog: C,
}

#[derive(Debug)]
struct OrderEntry {
    order: SalesOrder,
    history: Vec<RecordedEvent>,
}

impl OrderEntry {
    fn record(&mut self, events: &[SalesOrderEvent]) {
        for event in events {
            let sequence = self.history.len() as u64 + 1;
            debug!(
                order_id = %self.order.id_typed(),
                event_type = event.event_type(),
                sequence,
                "order event applied"
            );
            self.history.push(RecordedEvent::from_event(sequence, event));
        }
    }
}

impl<C> InMemoryOrderStore<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            catalog,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Create a draft order for `company_id`.
    pub fn create_order(&self, company_id: CompanyId) -> Result<SalesOrderId, OrderStoreError> {
        let order_id = SalesOrderId::new(AggregateId::new());
        let mut entry = OrderEntry {
            order: SalesOrder::empty(order_id),
            history: Vec::new(),
        };
        let events = entry
            .order
            .execute(&SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                company_id,
                order_id,
                occurred_at: Utc::now(),
            }))?;
        entry.record(&events);

        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderStoreError::LockPoisoned)?;
        orders.insert(order_id, entry);
        Ok(order_id)
    }

    /// Applied events of an order, oldest first.
    pub fn history(&self, order_id: SalesOrderId) -> Result<Vec<RecordedEvent>, OrderStoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| OrderStoreError::LockPoisoned)?;
        orders
            .get(&order_id)
            .map(|entry| entry.history.clone())
            .ok_or(OrderStoreError::OrderNotFound(order_id))
    }

    /// Run an order-management command. `build` receives the order's company.
    pub fn execute(
        &self,
        order_id: SalesOrderId,
        build: impl FnOnce(CompanyId) -> SalesOrderCommand,
    ) -> Result<Vec<SalesOrderEvent>, OrderStoreError> {
        self.with_order_mut(order_id, ExpectedVersion::Any, |order, company_id| {
            let events = order.execute(&build(company_id))?;
            Ok((events.clone(), events))
        })
    }

    /// Run `f` against a copy of the order; commit the copy and its events
    /// only when `f` succeeds and the order is still at `expected`.
    fn with_order_mut<T>(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        f: impl FnOnce(&mut SalesOrder, CompanyId) -> Result<(T, Vec<SalesOrderEvent>), OrderStoreError>,
    ) -> Result<T, OrderStoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderStoreError::LockPoisoned)?;
        let entry = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::OrderNotFound(order_id))?;
        let company_id = entry
            .order
            .company_id()
            .ok_or(OrderStoreError::OrderNotFound(order_id))?;
        expected
            .check(entry.order.version())
            .map_err(|e| OrderStoreError::Concurrency(e.to_string()))?;

        let mut working = entry.order.clone();
        let (out, events) = f(&mut working, company_id)?;
        entry.order = working;
        entry.record(&events);
        Ok(out)
    }
}

impl<C: CatalogLookup> OrderStore for InMemoryOrderStore<C> {
    fn load(&self, order_id: SalesOrderId) -> Result<Option<SalesOrder>, OrderStoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| OrderStoreError::LockPoisoned)?;
        Ok(orders.get(&order_id).map(|entry| entry.order.clone()))
    }

    fn create_line(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        line: NewOrderLine,
    ) -> Result<OrderLine, OrderStoreError> {
        self.with_order_mut(order_id, expected, |order, company_id| {
            // Defaulting: description and list price come from the catalog.
            let product = self
                .catalog
                .product(company_id, line.product_id)
                .ok_or(OrderStoreError::UnknownProduct(line.product_id))?;

            let events = order.execute(&SalesOrderCommand::AddLine(AddLine {
                company_id,
                order_id,
                product_id: line.product_id,
                description: product.display_name(),
                quantity: line.quantity,
                unit_price: product.pricing().base_price.unwrap_or(0),
                occurred_at: Utc::now(),
            }))?;

            let line_no = events
                .iter()
                .find_map(|e| match e {
                    SalesOrderEvent::LineAdded(added) => Some(added.line_no),
                    _ => None,
                })
                .ok_or(OrderStoreError::OrderNotFound(order_id))?;

            let line = order
                .line(line_no)
                .cloned()
                .ok_or(OrderStoreError::LineNotFound { order_id, line_no })?;
            Ok((line, events))
        })
    }

    fn set_line_quantity(
        &self,
        order_id: SalesOrderId,
        expected: ExpectedVersion,
        line_no: u32,
        quantity: i64,
    ) -> Result<OrderLine, OrderStoreError> {
        self.with_order_mut(order_id, expected, |order, company_id| {
            if order.line(line_no).is_none() {
                return Err(OrderStoreError::LineNotFound { order_id, line_no });
            }

            let events = order.execute(&SalesOrderCommand::SetLineQuantity(SetLineQuantity {
                company_id,
                order_id,
                line_no,
                quantity,
                occurred_at: Utc::now(),
            }))?;

            let line = order
                .line(line_no)
                .cloned()
                .ok_or(OrderStoreError::LineNotFound { order_id, line_no })?;
            Ok((line, events))
        })
    }
}
