use serde::Serialize;

use crate::model::{InventoryCategory, InventoryOverview};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockAlert {
    pub category: InventoryCategory,
    pub stock: f64,
    pub message: String,
}

/// One alert per category whose stock is under its threshold. Categories the
/// server did not report are skipped rather than treated as empty.
pub fn low_stock_alerts(overview: &InventoryOverview) -> Vec<LowStockAlert> {
    InventoryCategory::all()
        .into_iter()
        .filter_map(|category| {
            let stock = overview.category(category)?.current_stock;
            if stock >= category.low_stock_threshold() {
                return None;
            }
            let severity = match category {
                InventoryCategory::Ghee => "critically low",
                _ => "low",
            };
            Some(LowStockAlert {
                category,
                stock,
                message: format!(
                    "{} stock is {} ({} {} remaining)",
                    category.name(),
                    severity,
                    stock,
                    category.unit()
                ),
            })
        })
        .collect()
}
