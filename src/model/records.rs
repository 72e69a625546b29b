use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::{EntryType, InventoryCategory, RawMaterial};
use super::de;

/// One day's output. `packets` carries dabba in its fractional part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    #[serde(default, alias = "_id", deserialize_with = "de::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub packets: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub sold: f64,
    /// As reported by the server; see [`ProductionRecord::derived_remaining`].
    #[serde(default, deserialize_with = "de::optional_number", skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}

impl ProductionRecord {
    pub fn derived_remaining(&self) -> f64 {
        self.packets - self.sold
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    #[serde(default, alias = "_id", deserialize_with = "de::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "customerName", deserialize_with = "de::optional_text", skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub packets: f64,
    /// Revenue for this sale.
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    #[serde(default, alias = "_id", deserialize_with = "de::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<InventoryCategory>,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "de::optional_text", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Purchase cost; only imports carry one.
    #[serde(default, alias = "cost", deserialize_with = "de::optional_number")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialPurchase {
    #[serde(default, alias = "_id", deserialize_with = "de::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<RawMaterial>,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "de::optional_number", skip_serializing_if = "Option::is_none")]
    pub big_tanks: Option<f64>,
    #[serde(default, deserialize_with = "de::optional_number", skip_serializing_if = "Option::is_none")]
    pub small_tanks: Option<f64>,
}

impl RawMaterialPurchase {
    pub fn total_tanks(&self) -> f64 {
        self.big_tanks.unwrap_or(0.0) + self.small_tanks.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiscellaneousSpend {
    #[serde(default, alias = "_id", deserialize_with = "de::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de::optional_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The signed-in account. Fields beyond these are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id", deserialize_with = "de::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.mobile.as_deref())
            .unwrap_or("unknown user")
    }
}
