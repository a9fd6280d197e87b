use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderscan_core::{Aggregate, AggregateId, AggregateRoot, CompanyId, CompanyScoped, DomainError};
use orderscan_events::Event;
use orderscan_products::ProductId;

/// Sales order identifier (company-scoped via `company_id` fields in events/commands).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesOrderId(pub AggregateId);

impl SalesOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SalesOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for SalesOrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Sales order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesOrderStatus {
    Draft,
    Confirmed,
    Done,
    Cancelled,
}

/// Marker for lines that are layout separators rather than products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Section,
    Note,
}

/// Order line: a product entry or a section/note separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: u32,
    pub product_id: Option<ProductId>,
    pub description: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    pub display_type: Option<DisplayType>,
}

impl OrderLine {
    /// Section and note lines carry no product quantity.
    pub fn is_product_line(&self) -> bool {
        self.display_type.is_none()
    }

    pub fn is_product_line_for(&self, product_id: ProductId) -> bool {
        self.is_product_line() && self.product_id == Some(product_id)
    }
}

/// Why an order refuses line mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationBlock {
    Cancelled,
    Locked,
}

impl core::fmt::Display for MutationBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MutationBlock::Cancelled => f.write_str("cannot modify a cancelled order"),
            MutationBlock::Locked => f.write_str("cannot modify a locked order"),
        }
    }
}

/// Aggregate root: SalesOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOrder {
    id: SalesOrderId,
    company_id: Option<CompanyId>,
    status: SalesOrderStatus,
    locked: bool,
    lines: Vec<OrderLine>,
    version: u64,
    created: bool,
}

impl SalesOrder {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: SalesOrderId) -> Self {
        Self {
            id,
            company_id: None,
            status: SalesOrderStatus::Draft,
            locked: false,
            lines: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> SalesOrderId {
        self.id
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn status(&self) -> SalesOrderStatus {
        self.status
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, line_no: u32) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.line_no == line_no)
    }

    /// Returns why lines cannot be added or changed, if they cannot.
    ///
    /// Cancelled orders are always frozen; confirmed and done orders only
    /// while locked.
    pub fn mutation_block(&self) -> Option<MutationBlock> {
        match (self.status, self.locked) {
            (SalesOrderStatus::Cancelled, _) => Some(MutationBlock::Cancelled),
            (SalesOrderStatus::Confirmed | SalesOrderStatus::Done, true) => {
                Some(MutationBlock::Locked)
            }
            _ => None,
        }
    }

    pub fn is_modifiable(&self) -> bool {
        self.mutation_block().is_none()
    }

    fn next_line_no(&self) -> u32 {
        self.lines.last().map(|l| l.line_no + 1).unwrap_or(1)
    }
}

impl AggregateRoot for SalesOrder {
    type Id = SalesOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl CompanyScoped for SalesOrder {
    fn owning_company(&self) -> Option<CompanyId> {
        self.company_id
    }
}

/// Command: CreateSalesOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSalesOrder {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddLine (product line, already defaulted by the caller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLine {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub product_id: ProductId,
    pub description: String,
    pub quantity: i64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddDisplayLine (section or note separator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDisplayLine {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub display_type: DisplayType,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetLineQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLineQuantity {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Payload shared by lifecycle commands and events (confirm, lock, unlock,
/// done, cancel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTransition {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderCommand {
    CreateSalesOrder(CreateSalesOrder),
    AddLine(AddLine),
    AddDisplayLine(AddDisplayLine),
    SetLineQuantity(SetLineQuantity),
    ConfirmOrder(OrderTransition),
    LockOrder(OrderTransition),
    UnlockOrder(OrderTransition),
    MarkDone(OrderTransition),
    CancelOrder(OrderTransition),
}

/// Event: SalesOrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderCreated {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub product_id: ProductId,
    pub description: String,
    pub quantity: i64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DisplayLineAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLineAdded {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub display_type: DisplayType,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineQuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineQuantityChanged {
    pub company_id: CompanyId,
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderEvent {
    SalesOrderCreated(SalesOrderCreated),
    LineAdded(LineAdded),
    DisplayLineAdded(DisplayLineAdded),
    LineQuantityChanged(LineQuantityChanged),
    OrderConfirmed(OrderTransition),
    OrderLocked(OrderTransition),
    OrderUnlocked(OrderTransition),
    OrderDone(OrderTransition),
    OrderCancelled(OrderTransition),
}

impl Event for SalesOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SalesOrderEvent::SalesOrderCreated(_) => "sales.order.created",
            SalesOrderEvent::LineAdded(_) => "sales.order.line_added",
            SalesOrderEvent::DisplayLineAdded(_) => "sales.order.display_line_added",
            SalesOrderEvent::LineQuantityChanged(_) => "sales.order.line_quantity_changed",
            SalesOrderEvent::OrderConfirmed(_) => "sales.order.confirmed",
            SalesOrderEvent::OrderLocked(_) => "sales.order.locked",
            SalesOrderEvent::OrderUnlocked(_) => "sales.order.unlocked",
            SalesOrderEvent::OrderDone(_) => "sales.order.done",
            SalesOrderEvent::OrderCancelled(_) => "sales.order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SalesOrderEvent::SalesOrderCreated(e) => e.occurred_at,
            SalesOrderEvent::LineAdded(e) => e.occurred_at,
            SalesOrderEvent::DisplayLineAdded(e) => e.occurred_at,
            SalesOrderEvent::LineQuantityChanged(e) => e.occurred_at,
            SalesOrderEvent::OrderConfirmed(e)
            | SalesOrderEvent::OrderLocked(e)
            | SalesOrderEvent::OrderUnlocked(e)
            | SalesOrderEvent::OrderDone(e)
            | SalesOrderEvent::OrderCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for SalesOrder {
    type Command = SalesOrderCommand;
    type Event = SalesOrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SalesOrderEvent::SalesOrderCreated(e) => {
                self.id = e.order_id;
                self.company_id = Some(e.company_id);
                self.status = SalesOrderStatus::Draft;
                self.locked = false;
                self.lines.clear();
                self.created = true;
            }
            SalesOrderEvent::LineAdded(e) => {
                self.lines.push(OrderLine {
                    line_no: e.line_no,
                    product_id: Some(e.product_id),
                    description: e.description.clone(),
                    quantity: e.quantity,
                    unit_price: e.unit_price,
                    display_type: None,
                });
            }
            SalesOrderEvent::DisplayLineAdded(e) => {
                self.lines.push(OrderLine {
                    line_no: e.line_no,
                    product_id: None,
                    description: e.description.clone(),
                    quantity: 0,
                    unit_price: 0,
                    display_type: Some(e.display_type),
                });
            }
            SalesOrderEvent::LineQuantityChanged(e) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.line_no == e.line_no) {
                    line.quantity = e.quantity;
                }
            }
            SalesOrderEvent::OrderConfirmed(_) => {
                self.status = SalesOrderStatus::Confirmed;
            }
            SalesOrderEvent::OrderLocked(_) => {
                self.locked = true;
            }
            SalesOrderEvent::OrderUnlocked(_) => {
                self.locked = false;
            }
            SalesOrderEvent::OrderDone(_) => {
                self.status = SalesOrderStatus::Done;
            }
            SalesOrderEvent::OrderCancelled(_) => {
                self.status = SalesOrderStatus::Cancelled;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SalesOrderCommand::CreateSalesOrder(cmd) => self.handle_create(cmd),
            SalesOrderCommand::AddLine(cmd) => self.handle_add_line(cmd),
            SalesOrderCommand::AddDisplayLine(cmd) => self.handle_add_display_line(cmd),
            SalesOrderCommand::SetLineQuantity(cmd) => self.handle_set_line_quantity(cmd),
            SalesOrderCommand::ConfirmOrder(cmd) => self.handle_confirm(cmd),
            SalesOrderCommand::LockOrder(cmd) => self.handle_lock(cmd),
            SalesOrderCommand::UnlockOrder(cmd) => self.handle_unlock(cmd),
            SalesOrderCommand::MarkDone(cmd) => self.handle_mark_done(cmd),
            SalesOrderCommand::CancelOrder(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl SalesOrder {
    fn ensure_exists(&self, company_id: CompanyId, order_id: SalesOrderId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if !self.belongs_to(company_id) {
            return Err(DomainError::invariant("company mismatch"));
        }
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_modifiable(&self) -> Result<(), DomainError> {
        match self.mutation_block() {
            Some(block) => Err(DomainError::invariant(block.to_string())),
            None => Ok(()),
        }
    }

    fn handle_create(&self, cmd: &CreateSalesOrder) -> Result<Vec<SalesOrderEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("sales order already exists"));
        }

        Ok(vec![SalesOrderEvent::SalesOrderCreated(SalesOrderCreated {
            company_id: cmd.company_id,
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_line(&self, cmd: &AddLine) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;
        self.ensure_modifiable()?;

        if cmd.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(vec![SalesOrderEvent::LineAdded(LineAdded {
            company_id: cmd.company_id,
            order_id: cmd.order_id,
            line_no: self.next_line_no(),
            product_id: cmd.product_id,
            description: cmd.description.clone(),
            quantity: cmd.quantity,
            unit_price: cmd.unit_price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_display_line(
        &self,
        cmd: &AddDisplayLine,
    ) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;
        self.ensure_modifiable()?;

        if cmd.description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }

        Ok(vec![SalesOrderEvent::DisplayLineAdded(DisplayLineAdded {
            company_id: cmd.company_id,
            order_id: cmd.order_id,
            line_no: self.next_line_no(),
            display_type: cmd.display_type,
            description: cmd.description.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_line_quantity(
        &self,
        cmd: &SetLineQuantity,
    ) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;
        self.ensure_modifiable()?;

        let line = self.line(cmd.line_no).ok_or_else(DomainError::not_found)?;
        if !line.is_product_line() {
            return Err(DomainError::invariant("display lines carry no quantity"));
        }
        if cmd.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }

        Ok(vec![SalesOrderEvent::LineQuantityChanged(LineQuantityChanged {
            company_id: cmd.company_id,
            order_id: cmd.order_id,
            line_no: cmd.line_no,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm(&self, cmd: &OrderTransition) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;

        if self.status != SalesOrderStatus::Draft {
            return Err(DomainError::invariant("only draft orders can be confirmed"));
        }

        Ok(vec![SalesOrderEvent::OrderConfirmed(cmd.clone())])
    }

    fn handle_lock(&self, cmd: &OrderTransition) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;

        if !matches!(self.status, SalesOrderStatus::Confirmed | SalesOrderStatus::Done) {
            return Err(DomainError::invariant(
                "only confirmed or done orders can be locked",
            ));
        }
        if self.locked {
            return Err(DomainError::conflict("order is already locked"));
        }

        Ok(vec![SalesOrderEvent::OrderLocked(cmd.clone())])
    }

    fn handle_unlock(&self, cmd: &OrderTransition) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;

        if !self.locked {
            return Err(DomainError::conflict("order is not locked"));
        }

        Ok(vec![SalesOrderEvent::OrderUnlocked(cmd.clone())])
    }

    fn handle_mark_done(&self, cmd: &OrderTransition) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;

        if self.status != SalesOrderStatus::Confirmed {
            return Err(DomainError::invariant("only confirmed orders can be done"));
        }

        Ok(vec![SalesOrderEvent::OrderDone(cmd.clone())])
    }

    fn handle_cancel(&self, cmd: &OrderTransition) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_exists(cmd.company_id, cmd.order_id)?;

        match self.status {
            SalesOrderStatus::Cancelled => {
                return Err(DomainError::conflict("order is already cancelled"));
            }
            SalesOrderStatus::Done => {
                return Err(DomainError::invariant("done orders cannot be cancelled"));
            }
            SalesOrderStatus::Draft | SalesOrderStatus::Confirmed => {}
        }
        if self.locked {
            return Err(DomainError::invariant("unlock the order before cancelling"));
        }

        Ok(vec![SalesOrderEvent::OrderCancelled(cmd.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_company_id() -> CompanyId {
        CompanyId::new()
    }

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn created_order() -> (SalesOrder, CompanyId, SalesOrderId) {
        let company_id = test_company_id();
        let order_id = SalesOrderId::new(AggregateId::new());
        let mut order = SalesOrder::empty(order_id);
        order
            .execute(&SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                company_id,
                order_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        (order, company_id, order_id)
    }

    fn transition(company_id: CompanyId, order_id: SalesOrderId) -> OrderTransition {
        OrderTransition {
            company_id,
            order_id,
            occurred_at: test_time(),
        }
    }

    fn add_line_cmd(company_id: CompanyId, order_id: SalesOrderId, quantity: i64) -> AddLine {
        AddLine {
            company_id,
            order_id,
            product_id: test_product_id(),
            description: "Widget".to_string(),
            quantity,
            unit_price: 100,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn create_sales_order_emits_sales_order_created_event() {
        let company_id = test_company_id();
        let order_id = SalesOrderId::new(AggregateId::new());
        let order = SalesOrder::empty(order_id);

        let events = order
            .handle(&SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                company_id,
                order_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            SalesOrderEvent::SalesOrderCreated(e) => {
                assert_eq!(e.company_id, company_id);
                assert_eq!(e.order_id, order_id);
            }
            _ => panic!("Expected SalesOrderCreated event"),
        }
    }

    #[test]
    fn add_line_assigns_sequential_line_numbers() {
        let (mut order, company_id, order_id) = created_order();

        order
            .execute(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 2)))
            .unwrap();
        order
            .execute(&SalesOrderCommand::AddDisplayLine(AddDisplayLine {
                company_id,
                order_id,
                display_type: DisplayType::Section,
                description: "Accessories".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap();
        order
            .execute(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 1)))
            .unwrap();

        let numbers: Vec<u32> = order.lines().iter().map(|l| l.line_no).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(!order.lines()[1].is_product_line());
    }

    #[test]
    fn add_line_rejects_non_positive_quantity() {
        let (order, company_id, order_id) = created_order();
        let err = order
            .handle(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 0)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn add_line_on_missing_order_is_not_found() {
        let order_id = SalesOrderId::new(AggregateId::new());
        let order = SalesOrder::empty(order_id);
        let err = order
            .handle(&SalesOrderCommand::AddLine(add_line_cmd(test_company_id(), order_id, 1)))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn add_line_rejects_foreign_company() {
        let (order, _company_id, order_id) = created_order();
        let err = order
            .handle(&SalesOrderCommand::AddLine(add_line_cmd(test_company_id(), order_id, 1)))
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("company mismatch") => {}
            _ => panic!("Expected InvariantViolation for company mismatch"),
        }
    }

    #[test]
    fn confirmed_unlocked_order_still_accepts_lines() {
        let (mut order, company_id, order_id) = created_order();
        order
            .execute(&SalesOrderCommand::ConfirmOrder(transition(company_id, order_id)))
            .unwrap();

        assert!(order.is_modifiable());
        order
            .execute(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 1)))
            .unwrap();
        assert_eq!(order.lines().len(), 1);
    }

    #[test]
    fn locked_order_rejects_line_changes() {
        let (mut order, company_id, order_id) = created_order();
        order
            .execute(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 1)))
            .unwrap();
        order
            .execute(&SalesOrderCommand::ConfirmOrder(transition(company_id, order_id)))
            .unwrap();
        order
            .execute(&SalesOrderCommand::LockOrder(transition(company_id, order_id)))
            .unwrap();

        assert_eq!(order.mutation_block(), Some(MutationBlock::Locked));

        let err = order
            .handle(&SalesOrderCommand::SetLineQuantity(SetLineQuantity {
                company_id,
                order_id,
                line_no: 1,
                quantity: 5,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("locked") => {}
            _ => panic!("Expected InvariantViolation for locked order"),
        }
    }

    #[test]
    fn cancelled_order_is_frozen_regardless_of_lock() {
        let (mut order, company_id, order_id) = created_order();
        order
            .execute(&SalesOrderCommand::CancelOrder(transition(company_id, order_id)))
            .unwrap();

        assert_eq!(order.status(), SalesOrderStatus::Cancelled);
        assert_eq!(order.mutation_block(), Some(MutationBlock::Cancelled));
    }

    #[test]
    fn lock_requires_confirmed_or_done() {
        let (order, company_id, order_id) = created_order();
        let err = order
            .handle(&SalesOrderCommand::LockOrder(transition(company_id, order_id)))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn set_line_quantity_rejects_display_lines() {
        let (mut order, company_id, order_id) = created_order();
        order
            .execute(&SalesOrderCommand::AddDisplayLine(AddDisplayLine {
                company_id,
                order_id,
                display_type: DisplayType::Note,
                description: "Deliver to back door".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap();

        let err = order
            .handle(&SalesOrderCommand::SetLineQuantity(SetLineQuantity {
                company_id,
                order_id,
                line_no: 1,
                quantity: 2,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn set_line_quantity_updates_line_in_place() {
        let (mut order, company_id, order_id) = created_order();
        order
            .execute(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 3)))
            .unwrap();
        order
            .execute(&SalesOrderCommand::SetLineQuantity(SetLineQuantity {
                company_id,
                order_id,
                line_no: 1,
                quantity: 4,
                occurred_at: test_time(),
            }))
            .unwrap();

        assert_eq!(order.lines().len(), 1);
        assert_eq!(order.line(1).map(|l| l.quantity), Some(4));
    }

    #[test]
    fn full_lifecycle_draft_to_confirmed_to_done() {
        let (mut order, company_id, order_id) = created_order();
        assert_eq!(order.status(), SalesOrderStatus::Draft);

        order
            .execute(&SalesOrderCommand::ConfirmOrder(transition(company_id, order_id)))
            .unwrap();
        order
            .execute(&SalesOrderCommand::MarkDone(transition(company_id, order_id)))
            .unwrap();
        assert_eq!(order.status(), SalesOrderStatus::Done);

        let err = order
            .handle(&SalesOrderCommand::CancelOrder(transition(company_id, order_id)))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let (order, company_id, order_id) = created_order();
        let before = order.clone();
        let cmd = SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 1));

        let events1 = order.handle(&cmd).unwrap();
        let events2 = order.handle(&cmd).unwrap();

        assert_eq!(order, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn version_increments_on_apply() {
        let (mut order, company_id, order_id) = created_order();
        assert_eq!(order.version(), 1);

        order
            .execute(&SalesOrderCommand::AddLine(add_line_cmd(company_id, order_id, 1)))
            .unwrap();
        assert_eq!(order.version(), 2);
    }

    #[test]
    fn event_types_are_namespaced() {
        let (order, company_id, order_id) = created_order();
        let events = order
            .handle(&SalesOrderCommand::ConfirmOrder(transition(company_id, order_id)))
            .unwrap();
        assert_eq!(events[0].event_type(), "sales.order.confirmed");
        assert_eq!(events[0].version(), 1);
    }
}
