//! # Stock Notifications
//!
//! Delivery seam for stock alerts. [`sigev_core::stock`] decides WHAT
//! to say; implementations of [`StockNotifier`] decide WHERE it goes
//! (log line, desktop notification, nothing during tests).

use tracing::warn;

use sigev_core::stock::{alerts_for, StockAlert};
use sigev_core::types::Product;

/// Sink for stock alerts.
pub trait StockNotifier: Send + Sync {
    /// Whether this sink is allowed to deliver anything. When `false`,
    /// [`announce_alerts`] skips delivery entirely.
    fn permission_granted(&self) -> bool {
        true
    }

    fn notify(&self, alert: &StockAlert);
}

/// Emits alerts as warn-level log lines.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl StockNotifier for TracingNotifier {
    fn notify(&self, alert: &StockAlert) {
        warn!(
            product = %alert.product_name,
            stock = alert.stock,
            threshold = alert.min_threshold,
            "{}: {}",
            alert.title(),
            alert.body()
        );
    }
}

/// Swallows alerts. For tests and headless runs.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl StockNotifier for NullNotifier {
    fn permission_granted(&self) -> bool {
        false
    }

    fn notify(&self, _alert: &StockAlert) {}
}

/// Evaluates the inventory and delivers one notification per product
/// in an alert state. Returns how many were delivered; a notifier
/// without permission delivers zero.
pub fn announce_alerts(notifier: &dyn StockNotifier, products: &[Product]) -> usize {
    if !notifier.permission_granted() {
        return 0;
    }
    let alerts = alerts_for(products);
    for alert in &alerts {
        notifier.notify(alert);
    }
    alerts.len()
}
