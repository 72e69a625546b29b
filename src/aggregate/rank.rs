use serde::Serialize;
use std::{cmp::Ordering, collections::HashMap};

use crate::model::SalesRecord;

/// Grouping label for sales with no customer name.
pub const WALK_IN: &str = "Walk-in";

/// One group's total under a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotal {
    pub name: String,
    pub packets: f64,
    pub revenue: f64,
}

/// Sum `value` per `key` and keep the `n` largest groups.
///
/// Groups are kept in first-encounter order before a stable descending sort, so ties
/// rank in the order their key first appeared.
pub fn top_n_by<R, K, V>(records: &[R], n: usize, key: K, value: V) -> Vec<RankedGroup>
where
    K: Fn(&R) -> String,
    V: Fn(&R) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<RankedGroup> = Vec::new();

    for record in records {
        let name = key(record);
        let slot = match index.get(&name) {
            Some(&i) => i,
            None => {
                index.insert(name.clone(), groups.len());
                groups.push(RankedGroup { name, value: 0.0 });
                groups.len() - 1
            }
        };
        groups[slot].value += value(record);
    }

    groups.sort_by(|a, b| descending(a.value, b.value));
    groups.truncate(n);
    groups
}

/// Customer label as written; missing or empty names fold into [`WALK_IN`].
pub fn customer_label(sale: &SalesRecord) -> String {
    match sale.customer.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => WALK_IN.to_string(),
    }
}

/// Top customers by revenue, carrying packet totals along.
pub fn top_customers(sales: &[SalesRecord], n: usize) -> Vec<CustomerTotal> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<CustomerTotal> = Vec::new();

    for sale in sales {
        let name = customer_label(sale);
        let slot = match index.get(&name) {
            Some(&i) => i,
            None => {
                index.insert(name.clone(), totals.len());
                totals.push(CustomerTotal {
                    name,
                    packets: 0.0,
                    revenue: 0.0,
                });
                totals.len() - 1
            }
        };
        totals[slot].packets += sale.packets;
        totals[slot].revenue += sale.amount;
    }

    totals.sort_by(|a, b| descending(a.revenue, b.revenue));
    totals.truncate(n);
    totals
}

// NaN compares equal so the sort stays stable and total.
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
