// src/resource.rs

use std::{fmt, str::FromStr};

use crate::model::{InventoryCategory, RawMaterial};

/// A REST collection the dashboard reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Production,
    Sales,
    Inventory(InventoryCategory),
    RawMaterial(RawMaterial),
    Miscellaneous,
}

impl Resource {
    pub fn all() -> Vec<Resource> {
        let mut out = vec![Resource::Production, Resource::Sales];
        out.extend(InventoryCategory::all().into_iter().map(Resource::Inventory));
        out.extend(RawMaterial::all().into_iter().map(Resource::RawMaterial));
        out.push(Resource::Miscellaneous);
        out
    }

    /// Path for list / create, relative to the API base.
    pub fn collection_path(&self) -> String {
        match self {
            Resource::Inventory(c) => format!("inventory/{}", c.as_str()),
            Resource::RawMaterial(m) => format!("raw-materials/{}", m.as_str()),
            other => other.item_base().to_string(),
        }
    }

    /// Prefix for single-record update / delete. Inventory and raw materials
    /// address records by id alone, without the category.
    pub fn item_base(&self) -> &'static str {
        match self {
            Resource::Production => "production",
            Resource::Sales => "sales",
            Resource::Inventory(_) => "inventory",
            Resource::RawMaterial(_) => "raw-materials",
            Resource::Miscellaneous => "miscellaneous",
        }
    }

    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.item_base(), id)
    }

    pub fn stats_path(&self) -> String {
        format!("{}/stats", self.collection_path())
    }

    pub fn display_name(&self) -> String {
        match self {
            Resource::Production => "Production".to_string(),
            Resource::Sales => "Sales".to_string(),
            Resource::Inventory(c) => c.name().to_string(),
            Resource::RawMaterial(m) => m.name().to_string(),
            Resource::Miscellaneous => "Miscellaneous Spending".to_string(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection_path())
    }
}

impl FromStr for Resource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_matches('/').to_lowercase();
        let (head, tail) = match lower.split_once('/') {
            Some((h, t)) => (h, Some(t)),
            None => (lower.as_str(), None),
        };

        match (head, tail) {
            ("production", None) => Ok(Resource::Production),
            ("sales" | "sale", None) => Ok(Resource::Sales),
            ("miscellaneous" | "misc", None) => Ok(Resource::Miscellaneous),
            ("inventory", Some(cat)) => Ok(Resource::Inventory(cat.parse()?)),
            ("raw-materials" | "raw-material", Some(kind)) => Ok(Resource::RawMaterial(kind.parse()?)),
            (bare, None) => {
                if let Ok(cat) = bare.parse::<InventoryCategory>() {
                    Ok(Resource::Inventory(cat))
                } else if let Ok(kind) = bare.parse::<RawMaterial>() {
                    Ok(Resource::RawMaterial(kind))
                } else {
                    anyhow::bail!("Unknown resource type: {}", s)
                }
            }
            _ => anyhow::bail!("Unknown resource type: {}", s),
        }
    }
}
