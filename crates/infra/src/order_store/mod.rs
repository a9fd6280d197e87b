//! Order persistence boundary.
//!
//! The scan resolver only reads order state and creates or updates lines.
//! Line creation defaults description and price from the catalog; that rule
//! belongs to the store, not to the resolver.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryOrderStore;
pub use r#trait::{NewOrderLine, OrderStore, OrderStoreError};
