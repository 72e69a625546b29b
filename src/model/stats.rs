use serde::{Deserialize, Serialize};

use super::category::InventoryCategory;
use super::de;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStats {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_production: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_sold: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_remaining: f64,
    /// Value of everything produced.
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub avg_daily_production: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_sales: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub avg_sale_packets: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub avg_sale_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_imported: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_consumed: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub current_stock: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_cost: f64,
}

/// `GET /inventory/all/stats`. A missing category reads as all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryOverview {
    #[serde(default)]
    pub maida: Option<CategoryStats>,
    #[serde(default)]
    pub oil: Option<CategoryStats>,
    #[serde(default)]
    pub ghee: Option<CategoryStats>,
}

impl InventoryOverview {
    pub fn category(&self, category: InventoryCategory) -> Option<&CategoryStats> {
        match category {
            InventoryCategory::Maida => self.maida.as_ref(),
            InventoryCategory::Oil => self.oil.as_ref(),
            InventoryCategory::Ghee => self.ghee.as_ref(),
        }
    }

    pub fn current_stock(&self, category: InventoryCategory) -> f64 {
        self.category(category).map(|c| c.current_stock).unwrap_or(0.0)
    }

    pub fn total_cost(&self, category: InventoryCategory) -> f64 {
        self.category(category).map(|c| c.total_cost).unwrap_or(0.0)
    }

    pub fn combined_cost(&self) -> f64 {
        InventoryCategory::all()
            .iter()
            .map(|c| self.total_cost(*c))
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialStats {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_purchased: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_big_tanks: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_small_tanks: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiscellaneousStats {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_spending: f64,
}
