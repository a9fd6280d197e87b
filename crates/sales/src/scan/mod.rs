//! Barcode scan resolution.
//!
//! A scan runs four stages, each of which may short-circuit with a
//! [`ScanRejection`]:
//!
//! ```text
//! guard::check_mutable ─▶ lookup::resolve ─▶ decision::decide ─▶ format::accept
//! ```
//!
//! Every stage here is pure. Executing the chosen [`LineChange`] against a
//! persistent order is the caller's job (see `orderscan_infra::scan_resolver`).

pub mod decision;
pub mod format;
pub mod guard;
pub mod lookup;
pub mod result;
pub mod settings;

pub use decision::{decide, merge_candidate, LineChange};
pub use format::{accept, display_message, MESSAGE_SEPARATOR};
pub use guard::{can_scan, check_mutable};
pub use lookup::{normalize, resolve, ProductMatch};
pub use result::{RejectReason, ScanAcceptance, ScanRejection, ScanResult};
pub use settings::{ConfigStore, ScanSettings, AUTO_INCREMENT_KEY, SHOW_STOCK_INFO_KEY};
