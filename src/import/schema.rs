// src/import/schema.rs

use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use super::coerce::{float_or_zero, int_or_zero, parse_float, text_or};
use super::NormalizedRow;
use crate::dates::DateNormalizer;
use crate::resource::Resource;
use crate::sheet::RawRow;

/// How one column is read from a sheet row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Sent through the date normalizer.
    Date,
    /// Leading decimal, 0 on failure.
    Float,
    /// Leading integer, 0 on failure.
    Integer,
    /// Decimal when the cell holds something, `null` otherwise.
    OptionalFloat,
    /// Cell text, or the default when blank.
    Text { default: &'static str },
    /// Written regardless of the sheet.
    Constant(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Sheet header and request key.
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    fn new(column: &'static str, kind: FieldKind) -> Self {
        Self { column, kind }
    }
}

/// The columns a resource accepts from a spreadsheet and how each is coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSchema {
    pub resource: Resource,
    pub fields: Vec<FieldSpec>,
}

impl ImportSchema {
    pub fn for_resource(resource: Resource) -> Self {
        use FieldKind::*;

        let date = FieldSpec::new("date", Date);
        let fields = match resource {
            Resource::Production => vec![
                date,
                FieldSpec::new("packets", Float),
                FieldSpec::new("sold", Float),
            ],
            Resource::Sales => vec![
                date,
                FieldSpec::new("packets", Float),
                FieldSpec::new("amount", Float),
                FieldSpec::new("customer", Text { default: "" }),
            ],
            Resource::Inventory(category) => vec![
                date,
                FieldSpec::new("type", Text { default: "import" }),
                FieldSpec::new("quantity", Integer),
                FieldSpec::new("unit", Constant(category.unit().to_string())),
                FieldSpec::new("amount", OptionalFloat),
            ],
            Resource::RawMaterial(material) if material.is_gas() => vec![
                date,
                FieldSpec::new("quantity", Float),
                FieldSpec::new("bigTanks", Float),
                FieldSpec::new("smallTanks", Float),
            ],
            Resource::RawMaterial(_) => vec![date, FieldSpec::new("quantity", Float)],
            Resource::Miscellaneous => vec![
                date,
                FieldSpec::new("amount", Float),
                FieldSpec::new("description", Text { default: "" }),
            ],
        };

        Self { resource, fields }
    }

    /// Build the request body for one sheet row. Never fails: unreadable dates become
    /// `today`, unreadable numbers become 0.
    pub fn normalize(&self, row: &RawRow, dates: &DateNormalizer, today: NaiveDate) -> NormalizedRow {
        let mut out = Map::with_capacity(self.fields.len());
        for field in &self.fields {
            let cell = row.get(field.column);
            let value = match &field.kind {
                FieldKind::Date => {
                    let cell = cell.cloned().unwrap_or(crate::dates::CellValue::Empty);
                    Value::String(dates.normalize_on(&cell, today))
                }
                FieldKind::Float => number(float_or_zero(cell)),
                FieldKind::Integer => Value::Number(int_or_zero(cell).into()),
                FieldKind::OptionalFloat => match cell {
                    Some(c) if c.is_truthy() => parse_float(c).map(number).unwrap_or(Value::Null),
                    _ => Value::Null,
                },
                FieldKind::Text { default } => Value::String(text_or(cell, default)),
                FieldKind::Constant(v) => Value::String(v.clone()),
            };
            out.insert(field.column.to_string(), value);
        }
        out
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }
}

fn number(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::CellValue;
    use crate::model::{InventoryCategory, RawMaterial};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn row(cells: &[(&str, CellValue)]) -> RawRow {
        cells.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn production_rows_default_bad_numbers() {
        let schema = ImportSchema::for_resource(Resource::Production);
        let out = schema.normalize(
            &row(&[
                ("date", CellValue::Number(45366.0)),
                ("packets", "16.2".into()),
                ("sold", "lots".into()),
                ("ignored", "x".into()),
            ]),
            &DateNormalizer::default(),
            today(),
        );
        assert_eq!(
            Value::Object(out),
            json!({"date": "2024-03-15", "packets": 16.2, "sold": 0.0})
        );
    }

    #[test]
    fn inventory_rows_carry_unit_and_nullable_amount() {
        let schema = ImportSchema::for_resource(Resource::Inventory(InventoryCategory::Oil));
        let out = schema.normalize(
            &row(&[("date", "15/03/2024".into()), ("quantity", CellValue::Number(3.7))]),
            &DateNormalizer::default(),
            today(),
        );
        assert_eq!(
            Value::Object(out),
            json!({"date": "2024-03-15", "type": "import", "quantity": 3, "unit": "tins", "amount": null})
        );
    }

    #[test]
    fn gas_rows_include_tanks() {
        let schema = ImportSchema::for_resource(Resource::RawMaterial(RawMaterial::Gas));
        let cols: Vec<_> = schema.columns().collect();
        assert_eq!(cols, vec!["date", "quantity", "bigTanks", "smallTanks"]);
    }

    #[test]
    fn missing_date_becomes_today() {
        let schema = ImportSchema::for_resource(Resource::Miscellaneous);
        let out = schema.normalize(
            &row(&[("amount", CellValue::Number(120.0))]),
            &DateNormalizer::default(),
            today(),
        );
        assert_eq!(out["date"], json!("2026-10-18"));
        assert_eq!(out["description"], json!(""));
    }
}
