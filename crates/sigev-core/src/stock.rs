//! # Stock-Alert Evaluator
//!
//! Classifies a product's stock against its configured minimum threshold
//! and builds the alert content a notifier can deliver.
//!
//! ## Classification Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stock Classification                              │
//! │                                                                         │
//! │  stock == 0                    ──► Depleted  ("Comprar urgentemente")  │
//! │  0 < stock ≤ minStockAlert     ──► Low       ("Solo N unidades")       │
//! │  stock > minStockAlert         ──► Normal    (no alert)                │
//! │                                                                         │
//! │  Evaluated once per product immediately after an inventory list        │
//! │  loads. Delivery is best-effort: no permission, no notification,       │
//! │  never an error.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Alert *construction* (pure) lives here; alert *delivery* (side effect)
//! lives in the client crate's notifier.

use serde::{Deserialize, Serialize};

use crate::types::Product;

// =============================================================================
// Stock Level
// =============================================================================

/// Severity classification of a product's stock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Stock is exactly zero.
    Depleted,
    /// Stock is positive but at or below the alert threshold.
    Low,
    /// Stock is above the alert threshold.
    Normal,
}

impl StockLevel {
    /// Classifies a stock quantity against a minimum threshold.
    ///
    /// ## Properties
    /// For all stock ≥ 0 and threshold ≥ 0:
    /// - `classify(0, t)` = Depleted
    /// - `classify(s, t)` = Low iff 1 ≤ s ≤ t
    /// - Normal otherwise
    pub const fn classify(stock: i64, min_threshold: i64) -> Self {
        if stock == 0 {
            StockLevel::Depleted
        } else if stock <= min_threshold {
            StockLevel::Low
        } else {
            StockLevel::Normal
        }
    }

    /// Whether this level warrants a user-visible alert.
    pub const fn needs_alert(&self) -> bool {
        matches!(self, StockLevel::Depleted | StockLevel::Low)
    }
}

/// Inline status message shown next to a product row.
pub fn status_message(stock: i64, min_threshold: i64) -> String {
    match StockLevel::classify(stock, min_threshold) {
        StockLevel::Depleted => "Sin stock - Comprar urgentemente".to_string(),
        StockLevel::Low => format!("Stock bajo - Solo {} unidades", stock),
        StockLevel::Normal => "Stock disponible".to_string(),
    }
}

// =============================================================================
// Stock Alert
// =============================================================================

/// A fully-built alert for one Depleted or Low product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAlert {
    pub product_name: String,
    pub stock: i64,
    pub min_threshold: i64,
    pub level: StockLevel,
}

impl StockAlert {
    /// Builds the alert for a product, or `None` when stock is Normal.
    pub fn evaluate(product: &Product) -> Option<Self> {
        let level = StockLevel::classify(product.stock, product.min_stock_alert);
        level.needs_alert().then(|| StockAlert {
            product_name: product.name.clone(),
            stock: product.stock,
            min_threshold: product.min_stock_alert,
            level,
        })
    }

    /// Notification title, severity-appropriate.
    pub fn title(&self) -> String {
        match self.level {
            StockLevel::Depleted => format!("⚠️ Sin stock: {}", self.product_name),
            StockLevel::Low => format!("⚠️ Stock bajo: {}", self.product_name),
            StockLevel::Normal => unreachable!("Normal stock never builds an alert"),
        }
    }

    /// Notification body text.
    pub fn body(&self) -> String {
        match self.level {
            StockLevel::Depleted => "Comprar urgentemente".to_string(),
            StockLevel::Low => format!("Solo quedan {} unidades disponibles", self.stock),
            StockLevel::Normal => unreachable!("Normal stock never builds an alert"),
        }
    }
}

/// Evaluates a freshly-loaded inventory list, keeping list order.
///
/// Returns one alert per product currently Depleted or Low.
pub fn alerts_for(products: &[Product]) -> Vec<StockAlert> {
    products.iter().filter_map(StockAlert::evaluate).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
