//! Sheet shapes for templates and record exports.

use anyhow::Result;
use serde::Serialize;

use super::Table;
use crate::dates::{format_for_display, CellValue};
use crate::model::{MiscellaneousSpend, RawMaterial, RawMaterialPurchase};
use crate::resource::Resource;

/// Empty one-row workbook users fill in before importing.
pub fn template(resource: Resource) -> Table {
    let (headers, blank): (Vec<&str>, Vec<CellValue>) = match resource {
        Resource::Production => (
            vec!["date", "packets", "amount", "sold"],
            vec![CellValue::Empty, 0.0.into(), 0.0.into(), 0.0.into()],
        ),
        Resource::Sales => (
            vec!["date", "packets", "amount", "customer"],
            vec![CellValue::Empty, 0.0.into(), 0.0.into(), CellValue::Empty],
        ),
        Resource::Inventory(_) => (
            vec!["date", "type", "quantity", "amount"],
            vec![CellValue::Empty, "import".into(), 0.0.into(), CellValue::Empty],
        ),
        Resource::RawMaterial(m) if m.is_gas() => (
            vec!["date", "quantity", "bigTanks", "smallTanks"],
            vec![CellValue::Empty, 0.0.into(), 0.0.into(), 0.0.into()],
        ),
        Resource::RawMaterial(_) => (
            vec!["date", "quantity"],
            vec![CellValue::Empty, 0.0.into()],
        ),
        Resource::Miscellaneous => (
            vec!["date", "amount", "description"],
            vec![CellValue::Empty, 0.0.into(), CellValue::Empty],
        ),
    };

    let mut table = Table::new(format!("{} Template", resource.display_name()), headers);
    table.push_row(blank);
    table
}

pub fn template_file_name(resource: Resource) -> String {
    format!("{}_template.xlsx", file_stem(resource))
}

/// Records exactly as the API returned them.
pub fn records_table<T: Serialize>(resource: Resource, records: &[T]) -> Result<Table> {
    Table::from_records(format!("{} Data", resource.display_name()), records)
}

/// Purchases with display dates; gas rows show tank counts instead of a quantity.
pub fn purchases_table(material: RawMaterial, purchases: &[RawMaterialPurchase]) -> Table {
    let name = format!("{} Purchases", material.name());
    if material.is_gas() {
        let mut table = Table::new(name, ["Date", "Big Tanks", "Small Tanks", "Total Tanks"]);
        for p in purchases {
            table.push_row(vec![
                format_for_display(&p.date).into(),
                p.big_tanks.map(CellValue::Number).unwrap_or(CellValue::Empty),
                p.small_tanks.map(CellValue::Number).unwrap_or(CellValue::Empty),
                p.total_tanks().into(),
            ]);
        }
        table
    } else {
        let mut table = Table::new(name, ["Date", "Quantity", "Unit"]);
        for p in purchases {
            table.push_row(vec![
                format_for_display(&p.date).into(),
                p.quantity.into(),
                material.unit().into(),
            ]);
        }
        table
    }
}

pub fn spending_table(spends: &[MiscellaneousSpend]) -> Table {
    let mut table = Table::new("Miscellaneous Spending", ["Date", "Amount", "Description"]);
    for s in spends {
        let description = match s.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "-",
        };
        table.push_row(vec![
            format_for_display(&s.date).into(),
            s.amount.into(),
            description.into(),
        ]);
    }
    table
}

pub fn export_file_name(resource: Resource) -> String {
    match resource {
        Resource::Inventory(c) => format!("{}_inventory_data.xlsx", c.as_str()),
        Resource::RawMaterial(m) => format!("{}_purchases.xlsx", m.as_str()),
        Resource::Miscellaneous => "miscellaneous_spending.xlsx".to_string(),
        other => format!("{}_data.xlsx", file_stem(other)),
    }
}

fn file_stem(resource: Resource) -> &'static str {
    match resource {
        Resource::Production => "production",
        Resource::Sales => "sales",
        Resource::Inventory(c) => c.as_str(),
        Resource::RawMaterial(m) => m.as_str(),
        Resource::Miscellaneous => "miscellaneous",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{FieldKind, ImportSchema};
    use crate::model::{InventoryCategory, ProductionRecord};

    #[test]
    fn production_template_matches_import_columns() {
        let t = template(Resource::Production);
        assert_eq!(t.headers, vec!["date", "packets", "amount", "sold"]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(template_file_name(Resource::Production), "production_template.xlsx");
    }

    #[test]
    fn templates_carry_every_imported_column() {
        for resource in Resource::all() {
            let headers = template(resource).headers;
            let schema = ImportSchema::for_resource(resource);
            for field in &schema.fields {
                if matches!(field.kind, FieldKind::Constant(_)) {
                    continue;
                }
                assert!(
                    headers.iter().any(|h| h == field.column),
                    "{} template lacks `{}`",
                    resource,
                    field.column
                );
            }
        }
    }

    #[test]
    fn gas_purchases_show_tanks() {
        let purchases = vec![RawMaterialPurchase {
            date: "2024-03-15T00:00:00.000Z".into(),
            big_tanks: Some(2.0),
            small_tanks: Some(1.0),
            ..Default::default()
        }];
        let t = purchases_table(RawMaterial::Gas, &purchases);
        assert_eq!(t.headers[3], "Total Tanks");
        assert_eq!(t.rows[0][0], CellValue::Text("15-03-2024".into()));
        assert_eq!(t.rows[0][3], CellValue::Number(3.0));
    }

    #[test]
    fn other_purchases_show_quantity_and_unit() {
        let purchases = vec![RawMaterialPurchase {
            date: "2024-03-15".into(),
            quantity: 4.0,
            ..Default::default()
        }];
        let t = purchases_table(RawMaterial::Sugar, &purchases);
        assert_eq!(t.rows[0][2], CellValue::Text("packets".into()));
    }

    #[test]
    fn spending_marks_missing_descriptions() {
        let spends = vec![MiscellaneousSpend {
            date: "2024-03-15".into(),
            amount: 10.0,
            ..Default::default()
        }];
        assert_eq!(spending_table(&spends).rows[0][2], CellValue::Text("-".into()));
    }

    #[test]
    fn raw_records_keep_api_fields() -> Result<()> {
        let rows = vec![ProductionRecord {
            id: Some("1".into()),
            date: "2024-03-15".into(),
            packets: 10.0,
            sold: 4.0,
            remaining: None,
        }];
        let t = records_table(Resource::Production, &rows)?;
        assert_eq!(t.name, "Production Data");
        assert_eq!(t.headers, vec!["id", "date", "packets", "sold"]);
        Ok(())
    }

    #[test]
    fn export_names() {
        assert_eq!(
            export_file_name(Resource::Inventory(InventoryCategory::Ghee)),
            "ghee_inventory_data.xlsx"
        );
        assert_eq!(export_file_name(Resource::Sales), "sales_data.xlsx");
    }
}
