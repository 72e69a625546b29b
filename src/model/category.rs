use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Intermediate stock tracked as imports and daily consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    Maida,
    Oil,
    Ghee,
}

impl InventoryCategory {
    pub fn all() -> [InventoryCategory; 3] {
        [
            InventoryCategory::Maida,
            InventoryCategory::Oil,
            InventoryCategory::Ghee,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryCategory::Maida => "maida",
            InventoryCategory::Oil => "oil",
            InventoryCategory::Ghee => "ghee",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InventoryCategory::Maida => "Maida",
            InventoryCategory::Oil => "Oil",
            InventoryCategory::Ghee => "Ghee",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            InventoryCategory::Maida => "packets",
            InventoryCategory::Oil => "tins",
            InventoryCategory::Ghee => "dabba",
        }
    }

    pub fn unit_size(&self) -> &'static str {
        match self {
            InventoryCategory::Maida => "50kg",
            InventoryCategory::Oil => "25 liter",
            InventoryCategory::Ghee => "25kg",
        }
    }

    /// Unit with its pack size, e.g. `tins (25 liter)`.
    pub fn unit_label(&self) -> String {
        format!("{} ({})", self.unit(), self.unit_size())
    }

    /// Stock strictly below this is reported as low.
    pub fn low_stock_threshold(&self) -> f64 {
        match self {
            InventoryCategory::Maida => 20.0,
            InventoryCategory::Oil => 10.0,
            InventoryCategory::Ghee => 5.0,
        }
    }
}

impl fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maida" => Ok(InventoryCategory::Maida),
            "oil" => Ok(InventoryCategory::Oil),
            "ghee" => Ok(InventoryCategory::Ghee),
            other => anyhow::bail!("unknown inventory category `{}`", other),
        }
    }
}

/// Purchased raw materials. Gas is counted in big and small tanks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawMaterial {
    Suji,
    Sugar,
    Salt,
    Gas,
}

impl RawMaterial {
    pub fn all() -> [RawMaterial; 4] {
        [
            RawMaterial::Suji,
            RawMaterial::Sugar,
            RawMaterial::Salt,
            RawMaterial::Gas,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RawMaterial::Suji => "suji",
            RawMaterial::Sugar => "sugar",
            RawMaterial::Salt => "salt",
            RawMaterial::Gas => "gas",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RawMaterial::Suji => "Suji",
            RawMaterial::Sugar => "Sugar",
            RawMaterial::Salt => "Salt",
            RawMaterial::Gas => "Gas",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            RawMaterial::Gas => "tanks",
            _ => "packets",
        }
    }

    pub fn is_gas(&self) -> bool {
        matches!(self, RawMaterial::Gas)
    }
}

impl fmt::Display for RawMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RawMaterial {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suji" => Ok(RawMaterial::Suji),
            "sugar" => Ok(RawMaterial::Sugar),
            "salt" => Ok(RawMaterial::Salt),
            "gas" => Ok(RawMaterial::Gas),
            other => anyhow::bail!("unknown raw material `{}`", other),
        }
    }
}

/// Direction of an inventory movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Import,
    Consumption,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Import => "import",
            EntryType::Consumption => "consumption",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("Ghee".parse::<InventoryCategory>().unwrap(), InventoryCategory::Ghee);
        assert_eq!(" GAS ".parse::<RawMaterial>().unwrap(), RawMaterial::Gas);
        assert!("butter".parse::<InventoryCategory>().is_err());
    }

    #[test]
    fn unit_labels_carry_pack_size() {
        assert_eq!(InventoryCategory::Maida.unit_label(), "packets (50kg)");
        assert_eq!(InventoryCategory::Ghee.unit_label(), "dabba (25kg)");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&InventoryCategory::Maida).unwrap();
        assert_eq!(json, "\"maida\"");
        let entry: EntryType = serde_json::from_str("\"consumption\"").unwrap();
        assert_eq!(entry, EntryType::Consumption);
    }
}
