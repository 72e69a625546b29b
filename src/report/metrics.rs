// src/report/metrics.rs

use serde::Serialize;

use crate::aggregate::{top_customers, CustomerTotal, DailyAggregator, DailyBucket};
use crate::model::{
    InventoryCategory, InventoryOverview, ProductionRecord, ProductionStats, SalesRecord,
    SalesStats,
};

pub const TOP_CUSTOMERS: usize = 5;

/// Stock and spend for one inventory category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryShare {
    pub category: InventoryCategory,
    pub stock: f64,
    pub cost: f64,
}

pub fn inventory_distribution(overview: &InventoryOverview) -> Vec<InventoryShare> {
    InventoryCategory::all()
        .into_iter()
        .map(|category| InventoryShare {
            category,
            stock: overview.current_stock(category),
            cost: overview.total_cost(category),
        })
        .collect()
}

/// `part / whole × 100`, or 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub total_production: f64,
    pub total_production_value: f64,
    pub avg_daily_production: f64,
    pub total_sales: f64,
    pub total_revenue: f64,
    pub avg_daily_sales: f64,
    pub avg_order_value: f64,
    pub total_inventory_cost: f64,
    pub sold_percentage: f64,
    pub profit_margin: f64,
    pub inventory: Vec<InventoryShare>,
    /// Days with any production or sales, oldest first.
    pub trend: Vec<DailyBucket>,
    pub top_customers: Vec<CustomerTotal>,
}

impl ReportMetrics {
    pub fn compute(
        production_stats: &ProductionStats,
        sales_stats: &SalesStats,
        inventory: &InventoryOverview,
        production: &[ProductionRecord],
        sales: &[SalesRecord],
    ) -> Self {
        let total_inventory_cost = inventory.combined_cost();
        let total_revenue = sales_stats.total_revenue;

        let mut daily = DailyAggregator::new();
        daily.add(production).add(sales);

        Self {
            total_production: production_stats.total_production,
            total_production_value: production_stats.total_amount,
            avg_daily_production: production_stats.avg_daily_production,
            total_sales: sales_stats.total_sales,
            total_revenue,
            avg_daily_sales: sales_stats.avg_sale_packets,
            avg_order_value: sales_stats.avg_sale_amount,
            total_inventory_cost,
            sold_percentage: percentage(sales_stats.total_sales, production_stats.total_production),
            profit_margin: percentage(
                total_revenue - production_stats.total_amount - total_inventory_cost,
                total_revenue,
            ),
            inventory: inventory_distribution(inventory),
            trend: daily.series(),
            top_customers: top_customers(sales, TOP_CUSTOMERS),
        }
    }

    pub fn stock(&self, category: InventoryCategory) -> f64 {
        self.inventory
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.stock)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryStats;

    fn sale(date: &str, customer: Option<&str>, packets: f64, amount: f64) -> SalesRecord {
        SalesRecord {
            date: date.into(),
            customer: customer.map(Into::into),
            packets,
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn margins_and_trend() {
        let production_stats = ProductionStats {
            total_production: 200.0,
            total_amount: 4000.0,
            ..Default::default()
        };
        let sales_stats = SalesStats {
            total_sales: 150.0,
            total_revenue: 10000.0,
            ..Default::default()
        };
        let inventory = InventoryOverview {
            maida: Some(CategoryStats {
                current_stock: 30.0,
                total_cost: 1000.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        let production = vec![ProductionRecord {
            date: "2024-03-02T00:00:00.000Z".into(),
            packets: 100.0,
            ..Default::default()
        }];
        let sales = vec![
            sale("2024-03-03", Some("Sharma"), 20.0, 2000.0),
            sale("2024-03-02", None, 10.0, 500.0),
            sale("2024-03-03", Some(""), 5.0, 300.0),
        ];

        let m = ReportMetrics::compute(&production_stats, &sales_stats, &inventory, &production, &sales);
        assert_eq!(m.sold_percentage, 75.0);
        assert_eq!(m.profit_margin, 50.0);
        assert_eq!(m.total_inventory_cost, 1000.0);
        assert_eq!(m.stock(InventoryCategory::Maida), 30.0);
        assert_eq!(m.stock(InventoryCategory::Ghee), 0.0);

        let days: Vec<_> = m.trend.iter().map(|b| b.date.as_str()).collect();
        assert_eq!(days, vec!["2024-03-02", "2024-03-03"]);
        assert_eq!(m.trend[0].production, 100.0);
        assert_eq!(m.trend[0].sales, 10.0);
        assert_eq!(m.trend[1].revenue, 2300.0);

        assert_eq!(m.top_customers[0].name, "Sharma");
        assert_eq!(m.top_customers[1].name, "Walk-in");
        assert_eq!(m.top_customers[1].revenue, 800.0);
    }

    #[test]
    fn no_production_or_revenue_means_zero_ratios() {
        let m = ReportMetrics::compute(
            &ProductionStats::default(),
            &SalesStats::default(),
            &InventoryOverview::default(),
            &[],
            &[],
        );
        assert_eq!(m.sold_percentage, 0.0);
        assert_eq!(m.profit_margin, 0.0);
        assert!(m.trend.is_empty());
        assert_eq!(m.inventory.len(), 3);
    }
}
