//! Sales Orders domain module.
//!
//! Business rules for sales orders and the barcode scan resolution engine,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Collaborators (catalog, configuration) are reached through traits.

pub mod order;
pub mod scan;

pub use order::{
    AddDisplayLine, AddLine, CreateSalesOrder, DisplayLineAdded, DisplayType, LineAdded,
    LineQuantityChanged, MutationBlock, OrderLine, OrderTransition, SalesOrder,
    SalesOrderCommand, SalesOrderCreated, SalesOrderEvent, SalesOrderId, SalesOrderStatus,
    SetLineQuantity,
};
pub use scan::{
    ConfigStore, LineChange, ProductMatch, RejectReason, ScanAcceptance, ScanRejection,
    ScanResult, ScanSettings,
};
