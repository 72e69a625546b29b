// src/api/dashboard.rs

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, instrument};

use super::client::{ApiClient, ListQuery};
use super::envelope::Envelope;
use super::error::ApiResult;
use super::resource::ResourceClient;
use crate::aggregate::{DailyAggregator, DailyBucket};
use crate::dates::{day_key, last_n_days};
use crate::model::{InventoryOverview, ProductionRecord, ProductionStats, SalesRecord, SalesStats};
use crate::report::{inventory_distribution, low_stock_alerts, percentage, InventoryShare, LowStockAlert};
use crate::resource::Resource;

/// How many recent records the overview pulls per collection.
pub const RECENT_LIMIT: u32 = 30;
const CHART_DAYS: usize = 7;

/// `GET inventory/all/stats`. An unsuccessful envelope reads as an empty overview.
pub async fn inventory_overview(api: &ApiClient) -> ApiResult<InventoryOverview> {
    let env: Envelope<InventoryOverview> = api.get("inventory/all/stats", None).await?;
    Ok(env.into_data().ok().flatten().unwrap_or_default())
}

/// Everything the overview screen needs, fetched together.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub production_stats: ProductionStats,
    pub sales_stats: SalesStats,
    pub inventory: InventoryOverview,
    pub production: Vec<ProductionRecord>,
    pub sales: Vec<SalesRecord>,
}

/// Five requests in flight at once. A request error fails the whole snapshot;
/// an unsuccessful envelope only leaves its own piece empty.
#[instrument(level = "info", skip_all)]
pub async fn fetch_dashboard(api: &ApiClient) -> ApiResult<DashboardSnapshot> {
    let production = ResourceClient::<ProductionRecord>::new(api.clone(), Resource::Production);
    let sales = ResourceClient::<SalesRecord>::new(api.clone(), Resource::Sales);
    let recent = ListQuery::limit(RECENT_LIMIT);

    let (production_stats, sales_stats, inventory, production_page, sales_page) = tokio::try_join!(
        production.stats::<ProductionStats>(None),
        sales.stats::<SalesStats>(None),
        inventory_overview(api),
        production.list_or_empty(&recent),
        sales.list_or_empty(&recent),
    )?;

    Ok(DashboardSnapshot {
        production_stats,
        sales_stats,
        inventory,
        production: production_page.items,
        sales: sales_page.items,
    })
}

/// Like [`fetch_dashboard`], but a failure is logged and yields an empty snapshot.
pub async fn load_dashboard(api: &ApiClient) -> DashboardSnapshot {
    match fetch_dashboard(api).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "error fetching dashboard data");
            DashboardSnapshot::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_production: f64,
    pub total_sales: f64,
    pub total_revenue: f64,
    pub available_stock: f64,
    /// Revenue less production value, as a share of revenue.
    pub profit_margin: f64,
    pub today_production: Option<f64>,
    /// Last seven days ending today, oldest first, zero-filled.
    pub week: Vec<DailyBucket>,
    pub inventory: Vec<InventoryShare>,
    pub alerts: Vec<LowStockAlert>,
}

impl DashboardSnapshot {
    pub fn summarize(&self, today: NaiveDate) -> DashboardSummary {
        let revenue = self.sales_stats.total_revenue;
        let today_key = today.format("%Y-%m-%d").to_string();

        let mut daily = DailyAggregator::new();
        daily.add(&self.production).add(&self.sales);

        DashboardSummary {
            total_production: self.production_stats.total_production,
            total_sales: self.sales_stats.total_sales,
            total_revenue: revenue,
            available_stock: self.production_stats.total_remaining,
            profit_margin: percentage(revenue - self.production_stats.total_amount, revenue),
            today_production: self
                .production
                .iter()
                .find(|p| day_key(&p.date) == today_key)
                .map(|p| p.packets),
            week: daily.probe(&last_n_days(today, CHART_DAYS)),
            inventory: inventory_distribution(&self.inventory),
            alerts: low_stock_alerts(&self.inventory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::serve;
    use crate::session::Session;
    use serde_json::json;
    use std::sync::Arc;
    use warp::Filter;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ok(data: serde_json::Value) -> warp::reply::Json {
        warp::reply::json(&json!({"success": true, "data": data}))
    }

    #[tokio::test]
    async fn snapshot_joins_all_requests() {
        let prod_stats = warp::path!("api" / "production" / "stats")
            .map(|| ok(json!({"totalProduction": 120, "totalRemaining": 20, "totalAmount": 3000})));
        let sales_stats = warp::path!("api" / "sales" / "stats")
            .map(|| ok(json!({"totalSales": 100, "totalRevenue": 6000})));
        let inv = warp::path!("api" / "inventory" / "all" / "stats")
            .map(|| ok(json!({"maida": {"currentStock": 12, "totalCost": 500}})));
        let prod = warp::path!("api" / "production")
            .map(|| ok(json!([{"date": "2024-03-15T00:00:00.000Z", "packets": 40, "sold": 30}])));
        let sales = warp::path!("api" / "sales")
            .map(|| ok(json!([{"date": "2024-03-14", "packets": 25, "amount": 1500}])));
        let routes = prod_stats.or(sales_stats).or(inv).or(prod).or(sales);

        let api = ApiClient::new(&serve(routes), Arc::new(Session::in_memory())).unwrap();
        let snap = fetch_dashboard(&api).await.unwrap();
        assert_eq!(snap.production.len(), 1);
        assert_eq!(snap.inventory.current_stock(crate::model::InventoryCategory::Maida), 12.0);

        let summary = snap.summarize(d(2024, 3, 15));
        assert_eq!(summary.profit_margin, 50.0);
        assert_eq!(summary.today_production, Some(40.0));
        assert_eq!(summary.week.len(), 7);
        assert_eq!(summary.week[5].sales, 25.0);
        assert_eq!(summary.week[6].production, 40.0);
        assert_eq!(summary.week[0].date, "2024-03-09");
        assert_eq!(summary.alerts.len(), 1);
    }

    #[tokio::test]
    async fn unsuccessful_list_leaves_other_pieces() {
        let prod_stats = warp::path!("api" / "production" / "stats")
            .map(|| ok(json!({"totalProduction": 120, "totalAmount": 3000})));
        let sales_stats = warp::path!("api" / "sales" / "stats")
            .map(|| ok(json!({"totalSales": 10, "totalRevenue": 6000})));
        let inv = warp::path!("api" / "inventory" / "all" / "stats").map(|| ok(json!({})));
        let prod = warp::path!("api" / "production").map(|| ok(json!([])));
        let sales = warp::path!("api" / "sales")
            .map(|| warp::reply::json(&json!({"success": false, "message": "no sales"})));
        let routes = prod_stats.or(sales_stats).or(inv).or(prod).or(sales);

        let api = ApiClient::new(&serve(routes), Arc::new(Session::in_memory())).unwrap();
        let snap = load_dashboard(&api).await;
        assert!(snap.sales.is_empty());

        let summary = snap.summarize(d(2024, 3, 15));
        assert_eq!(summary.total_production, 120.0);
        assert_eq!(summary.total_revenue, 6000.0);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_empty() {
        let routes = warp::path!("api" / "production" / "stats")
            .map(|| warp::reply::with_status("boom", warp::http::StatusCode::INTERNAL_SERVER_ERROR));
        let api = ApiClient::new(&serve(routes), Arc::new(Session::in_memory())).unwrap();

        assert!(fetch_dashboard(&api).await.is_err());
        let snap = load_dashboard(&api).await;
        assert!(snap.production.is_empty());

        let summary = snap.summarize(d(2024, 3, 15));
        assert_eq!(summary.profit_margin, 0.0);
        assert!(summary.alerts.is_empty());
    }
}
