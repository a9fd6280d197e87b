//! Per-scan behaviour flags.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use orderscan_core::ValueObject;

pub const AUTO_INCREMENT_KEY: &str = "autoIncrement";
pub const SHOW_STOCK_INFO_KEY: &str = "showStockInfo";

/// Configuration reader capability.
///
/// Implementations return `default` when no value is stored.
pub trait ConfigStore: Send + Sync {
    fn get_bool(&self, key: &str, default: bool) -> bool;
}

impl<S> ConfigStore for Arc<S>
where
    S: ConfigStore + ?Sized,
{
    fn get_bool(&self, key: &str, default: bool) -> bool {
        (**self).get_bool(key, default)
    }
}

/// Flags read once per scan; never cached across scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Repeated scans raise the existing line's quantity instead of adding a line.
    pub auto_increment: bool,
    /// Surface on-hand quantity for stock-tracked products.
    pub show_stock_info: bool,
}

impl ValueObject for ScanSettings {}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            auto_increment: true,
            show_stock_info: true,
        }
    }
}

impl ScanSettings {
    pub fn load<C: ConfigStore + ?Sized>(config: &C) -> Self {
        let defaults = Self::default();
        Self {
            auto_increment: config.get_bool(AUTO_INCREMENT_KEY, defaults.auto_increment),
            show_stock_info: config.get_bool(SHOW_STOCK_INFO_KEY, defaults.show_stock_info),
        }
    }
}
