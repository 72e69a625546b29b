//! Period reports: date ranges, metrics and the exported workbook.

use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, instrument};

use crate::api::{inventory_overview, ApiClient, ApiResult, ResourceClient};
use crate::dates::CellValue;
use crate::model::{
    InventoryCategory, ProductionRecord, ProductionStats, SalesRecord, SalesStats,
};
use crate::resource::Resource;
use crate::sheet::Table;

pub mod alerts;
pub mod metrics;
pub mod range;

pub use alerts::{low_stock_alerts, LowStockAlert};
pub use metrics::{inventory_distribution, percentage, InventoryShare, ReportMetrics};
pub use range::{DateSpan, ReportRange};

/// Record lists for a report are fetched up to this many rows.
pub const REPORT_LIMIT: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Report {
    pub range: ReportRange,
    pub span: DateSpan,
    pub generated_at: DateTime<Local>,
    pub metrics: ReportMetrics,
}

/// Fetch stats and records for the period concurrently and compute metrics.
#[instrument(level = "info", skip(api))]
pub async fn generate_report(
    api: &ApiClient,
    range: ReportRange,
    today: NaiveDate,
) -> ApiResult<Report> {
    let span = range.resolve(today);
    let params = span.query();
    let records = params.clone().with_limit(REPORT_LIMIT);

    let production = ResourceClient::<ProductionRecord>::new(api.clone(), Resource::Production);
    let sales = ResourceClient::<SalesRecord>::new(api.clone(), Resource::Sales);

    let (production_stats, production_page, sales_stats, sales_page, inventory) = tokio::try_join!(
        production.stats::<ProductionStats>(Some(&params)),
        production.list_or_empty(&records),
        sales.stats::<SalesStats>(Some(&params)),
        sales.list_or_empty(&records),
        inventory_overview(api),
    )?;

    let metrics = ReportMetrics::compute(
        &production_stats,
        &sales_stats,
        &inventory,
        &production_page.items,
        &sales_page.items,
    );
    info!(
        %span,
        days = metrics.trend.len(),
        customers = metrics.top_customers.len(),
        "report generated"
    );

    Ok(Report {
        range,
        span,
        generated_at: Local::now(),
        metrics,
    })
}

pub fn report_file_name(today: NaiveDate) -> String {
    format!("MakhanChor_Report_{}.xlsx", today.format("%Y-%m-%d"))
}

impl Report {
    /// Summary, daily trend and (when any) top customers, one sheet each.
    pub fn tables(&self) -> Vec<Table> {
        let mut out = vec![self.summary_table(), self.trend_table()];
        if !self.metrics.top_customers.is_empty() {
            out.push(self.customers_table());
        }
        out
    }

    pub fn summary_table(&self) -> Table {
        let m = &self.metrics;
        let mut t = Table::new("Summary", ["MakhanChor Biscuits - Comprehensive Report"]);

        let mut line = |cells: Vec<CellValue>| t.push_row(cells);
        line(vec![
            "Generated on:".into(),
            self.generated_at.format("%d/%m/%Y, %H:%M:%S").to_string().into(),
        ]);
        line(vec!["Period:".into(), self.range.label().into()]);
        line(vec![]);
        line(vec!["PRODUCTION SUMMARY".into()]);
        line(vec!["Total Production:".into(), m.total_production.into(), "packets".into()]);
        line(vec![
            "Average Daily Production:".into(),
            format!("{:.2}", m.avg_daily_production).into(),
            "packets".into(),
        ]);
        line(vec![]);
        line(vec!["SALES SUMMARY".into()]);
        line(vec!["Total Sales:".into(), m.total_sales.into(), "packets".into()]);
        line(vec!["Total Revenue:".into(), rupees(m.total_revenue).into()]);
        line(vec![
            "Average Daily Sales:".into(),
            format!("{:.2}", m.avg_daily_sales).into(),
            "packets".into(),
        ]);
        line(vec!["Average Order Value:".into(), rupees(m.avg_order_value).into()]);
        line(vec![]);
        line(vec!["INVENTORY SUMMARY".into()]);
        for category in InventoryCategory::all() {
            line(vec![
                format!("{} Stock:", category.name()).into(),
                m.stock(category).into(),
                category.unit().into(),
            ]);
        }
        line(vec!["Total Inventory Cost:".into(), rupees(m.total_inventory_cost).into()]);
        line(vec![]);
        line(vec!["PERFORMANCE METRICS".into()]);
        line(vec!["Sold Percentage:".into(), format!("{:.2}%", m.sold_percentage).into()]);
        line(vec!["Profit Margin:".into(), format!("{:.2}%", m.profit_margin).into()]);
        t
    }

    /// Revenue is shown in thousands, as on the chart.
    pub fn trend_table(&self) -> Table {
        let mut t = Table::new("Daily Trends", ["date", "production", "sales", "revenue"]);
        for b in &self.metrics.trend {
            t.push_row(vec![
                crate::dates::format_for_display(&b.date).into(),
                b.production.into(),
                b.sales.into(),
                (b.revenue / 1000.0).into(),
            ]);
        }
        t
    }

    pub fn customers_table(&self) -> Table {
        let mut t = Table::new("Top Customers", ["name", "packets", "revenue"]);
        for c in &self.metrics.top_customers {
            t.push_row(vec![c.name.as_str().into(), c.packets.into(), c.revenue.into()]);
        }
        t
    }
}

fn rupees(amount: f64) -> String {
    format!("₹{}", CellValue::Number(amount))
}
