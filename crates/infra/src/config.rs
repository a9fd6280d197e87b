//! Configuration stores backing `ConfigStore`.
//!
//! Values are stored as strings. A stored value is `true` when it equals
//! `"true"` (any case) or `"1"`; every other stored value reads as `false`.
//! Keys without a stored value fall back to the caller's default.

use std::collections::HashMap;
use std::sync::RwLock;

use orderscan_sales::ConfigStore;

/// Environment variable prefix used by [`EnvConfigStore`].
pub const ENV_PREFIX: &str = "ORDERSCAN";

pub fn parse_bool(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || raw == "1"
}

/// In-memory key/value configuration for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.into(), value.into());
        }
    }

    pub fn set_bool(&self, key: impl Into<String>, value: bool) {
        self.set(key, value.to_string());
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(key);
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(raw) => parse_bool(&raw),
            None => default,
        }
    }
}

/// Environment-backed configuration.
///
/// `autoIncrement` is read from `ORDERSCAN_AUTO_INCREMENT`, `showStockInfo`
/// from `ORDERSCAN_SHOW_STOCK_INFO`. The environment is read on every call.
#[derive(Debug, Clone)]
pub struct EnvConfigStore {
    prefix: String,
}

impl EnvConfigStore {
    pub fn new() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable name for a camelCase key.
    pub fn env_key(&self, key: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + key.len() + 4);
        out.push_str(&self.prefix);
        out.push('_');
        let mut prev_lower = false;
        for ch in key.chars() {
            if ch.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            if ch == '-' || ch == '.' {
                out.push('_');
            } else {
                out.push(ch.to_ascii_uppercase());
            }
        }
        out
    }
}

impl Default for EnvConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for EnvConfigStore {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match std::env::var(self.env_key(key)) {
            Ok(raw) => parse_bool(&raw),
            Err(_) => default,
        }
    }
}
