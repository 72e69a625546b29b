// src/api/resource.rs

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{info, instrument, warn};

use super::client::{ApiClient, ListQuery};
use super::envelope::{Envelope, Page};
use super::error::{ApiError, ApiResult};
use crate::import::{NormalizedRow, RecordSink};
use crate::model::{
    CategoryStats, MiscellaneousStats, ProductionStats, RawMaterialStats, SalesStats,
};
use crate::resource::Resource;

/// CRUD and stats for one collection, typed by its record `T`.
#[derive(Debug, Clone)]
pub struct ResourceClient<T> {
    api: ApiClient,
    resource: Resource,
    _record: PhantomData<fn() -> T>,
}

impl<T> ResourceClient<T>
where
    T: DeserializeOwned + Serialize + Send + Sync,
{
    pub fn new(api: ApiClient, resource: Resource) -> Self {
        Self {
            api,
            resource,
            _record: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    #[instrument(level = "debug", skip(self), fields(resource = %self.resource))]
    pub async fn list(&self, query: &ListQuery) -> ApiResult<Page<T>> {
        let env: Envelope<Vec<T>> = self
            .api
            .get(&self.resource.collection_path(), Some(query))
            .await?;
        let pagination = env.pagination.clone();
        let items = env.into_data()?.unwrap_or_default();
        Ok(Page { items, pagination })
    }

    /// Like [`list`](Self::list), but an unsuccessful envelope reads as an empty
    /// page. Network and status errors still fail.
    pub async fn list_or_empty(&self, query: &ListQuery) -> ApiResult<Page<T>> {
        let env: Envelope<Vec<T>> = self
            .api
            .get(&self.resource.collection_path(), Some(query))
            .await?;
        let pagination = env.pagination.clone();
        match env.into_data() {
            Ok(items) => Ok(Page {
                items: items.unwrap_or_default(),
                pagination,
            }),
            Err(e) => {
                warn!(resource = %self.resource, error = %e, "list not successful; skipping");
                Ok(Page::default())
            }
        }
    }

    pub async fn get(&self, id: &str) -> ApiResult<Option<T>> {
        let env: Envelope<T> = self.api.get(&self.resource.item_path(id), None).await?;
        env.into_data()
    }

    pub async fn create<B: Serialize + ?Sized + Sync>(&self, body: &B) -> ApiResult<Option<T>> {
        let env: Envelope<T> = self
            .api
            .post(&self.resource.collection_path(), body)
            .await?;
        env.into_data()
    }

    pub async fn update<B: Serialize + ?Sized + Sync>(
        &self,
        id: &str,
        body: &B,
    ) -> ApiResult<Option<T>> {
        let env: Envelope<T> = self.api.put(&self.resource.item_path(id), body).await?;
        env.into_data()
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let env: Envelope<Value> = self.api.delete(&self.resource.item_path(id)).await?;
        env.into_data()?;
        info!(resource = %self.resource, id, "deleted");
        Ok(())
    }

    /// Aggregates for the collection. An unsuccessful envelope reads as defaults.
    pub async fn stats<S>(&self, query: Option<&ListQuery>) -> ApiResult<S>
    where
        S: DeserializeOwned + Default,
    {
        let env: Envelope<S> = self.api.get(&self.resource.stats_path(), query).await?;
        Ok(env.into_data().ok().flatten().unwrap_or_default())
    }
}

/// `GET {collection}/stats`, decoded into the shape that collection reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceStats {
    Production(ProductionStats),
    Sales(SalesStats),
    Inventory {
        #[serde(flatten)]
        stats: CategoryStats,
        unit: String,
    },
    RawMaterial {
        #[serde(flatten)]
        stats: RawMaterialStats,
        unit: &'static str,
    },
    Miscellaneous(MiscellaneousStats),
}

pub async fn fetch_stats(
    api: &ApiClient,
    resource: Resource,
    query: Option<&ListQuery>,
) -> ApiResult<ResourceStats> {
    let rc = ResourceClient::<Value>::new(api.clone(), resource);
    Ok(match resource {
        Resource::Production => ResourceStats::Production(rc.stats(query).await?),
        Resource::Sales => ResourceStats::Sales(rc.stats(query).await?),
        Resource::Inventory(category) => ResourceStats::Inventory {
            stats: rc.stats(query).await?,
            unit: category.unit_label(),
        },
        Resource::RawMaterial(material) => ResourceStats::RawMaterial {
            stats: rc.stats(query).await?,
            unit: material.unit(),
        },
        Resource::Miscellaneous => ResourceStats::Miscellaneous(rc.stats(query).await?),
    })
}

#[async_trait]
impl<T> RecordSink for ResourceClient<T>
where
    T: DeserializeOwned + Serialize + Send + Sync,
{
    async fn submit(&self, row: NormalizedRow) -> anyhow::Result<()> {
        let env: Envelope<Value> = self
            .api
            .post(&self.resource.collection_path(), &row)
            .await
            .with_context(|| format!("saving {} row", self.resource))?;
        env.into_data()
            .map_err(|e| match e {
                ApiError::Rejected(msg) => anyhow::anyhow!("server rejected row: {}", msg),
                other => other.into(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::serve;
    use crate::dates::{CellValue, DateNormalizer};
    use crate::import::{BulkImporter, ImportError, ImportSchema};
    use crate::model::{ProductionRecord, SalesRecord};
    use crate::session::Session;
    use crate::sheet::RawRow;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use warp::Filter;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(Session::in_memory())).unwrap()
    }

    #[tokio::test]
    async fn list_unwraps_envelope() {
        let routes = warp::path!("api" / "production").and(warp::get()).map(|| {
            warp::reply::json(&json!({
                "success": true,
                "data": [{"_id": "1", "date": "2024-03-15T00:00:00.000Z", "packets": 12.5, "sold": 2}],
                "pagination": {"page": 1, "limit": 30, "total": 1, "totalPages": 1}
            }))
        });
        let rc: ResourceClient<ProductionRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Production);

        let page = rc.list(&ListQuery::limit(30)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_deref(), Some("1"));
        assert_eq!(page.pagination.unwrap().total, 1);
    }

    #[tokio::test]
    async fn create_returns_saved_record() {
        let routes = warp::path!("api" / "production")
            .and(warp::post())
            .and(warp::body::json())
            .map(|mut body: Value| {
                body["_id"] = json!("new-1");
                warp::reply::json(&json!({"success": true, "data": body}))
            });
        let rc: ResourceClient<ProductionRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Production);

        let saved = rc
            .create(&json!({"date": "2024-03-15", "packets": 12.05, "sold": 0}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.id.as_deref(), Some("new-1"));
        assert_eq!(saved.packets, 12.05);
    }

    #[tokio::test]
    async fn create_without_data_is_none() {
        let routes = warp::path!("api" / "sales")
            .and(warp::post())
            .map(|| warp::reply::json(&json!({"success": true, "message": "saved"})));
        let rc: ResourceClient<SalesRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Sales);

        let saved = rc.create(&json!({"date": "2024-03-15", "packets": 3})).await.unwrap();
        assert!(saved.is_none());
    }

    #[tokio::test]
    async fn unsuccessful_list_is_rejected_or_empty() {
        let routes = warp::path!("api" / "sales")
            .map(|| warp::reply::json(&json!({"success": false, "message": "no sales"})));
        let rc: ResourceClient<SalesRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Sales);

        assert!(matches!(
            rc.list(&ListQuery::default()).await,
            Err(ApiError::Rejected(_))
        ));
        let page = rc.list_or_empty(&ListQuery::default()).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn list_or_empty_still_fails_on_status() {
        let routes = warp::path!("api" / "sales").map(|| {
            warp::reply::with_status("down", warp::http::StatusCode::BAD_GATEWAY)
        });
        let rc: ResourceClient<SalesRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Sales);

        assert!(matches!(
            rc.list_or_empty(&ListQuery::default()).await,
            Err(ApiError::Status { .. })
        ));
    }

    #[tokio::test]
    async fn stats_are_typed_per_collection() {
        let gas = warp::path!("api" / "raw-materials" / "gas" / "stats").map(|| {
            warp::reply::json(&json!({
                "success": true,
                "data": {"totalPurchased": 6, "totalBigTanks": 4, "totalSmallTanks": 2}
            }))
        });
        let oil = warp::path!("api" / "inventory" / "oil" / "stats").map(|| {
            warp::reply::json(&json!({"success": true, "data": {"currentStock": 8}}))
        });
        let misc = warp::path!("api" / "miscellaneous" / "stats").map(|| {
            warp::reply::json(&json!({"success": true, "data": {"totalSpending": 450.5}}))
        });
        let api = client(&serve(gas.or(oil).or(misc)));

        let stats = fetch_stats(&api, "gas".parse().unwrap(), None).await.unwrap();
        match &stats {
            ResourceStats::RawMaterial { stats, unit } => {
                assert_eq!(stats.total_big_tanks, 4.0);
                assert_eq!(*unit, "tanks");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(serde_json::to_value(&stats).unwrap()["totalSmallTanks"], 2.0);

        let stats = fetch_stats(&api, "inventory/oil".parse().unwrap(), None).await.unwrap();
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["currentStock"], 8.0);
        assert_eq!(value["unit"], "tins (25 liter)");

        let stats = fetch_stats(&api, Resource::Miscellaneous, None).await.unwrap();
        assert_eq!(
            stats,
            ResourceStats::Miscellaneous(MiscellaneousStats { total_spending: 450.5 })
        );
    }

    #[tokio::test]
    async fn failed_stats_read_as_defaults() {
        let routes = warp::path!("api" / "production" / "stats")
            .map(|| warp::reply::json(&json!({"success": false, "message": "no data"})));
        let rc: ResourceClient<ProductionRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Production);

        let stats: ProductionStats = rc.stats(None).await.unwrap();
        assert_eq!(stats, ProductionStats::default());
    }

    #[tokio::test]
    async fn import_posts_each_row_in_order() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let log = seen.clone();
        let routes = warp::path!("api" / "production")
            .and(warp::post())
            .and(warp::body::json())
            .map(move |body: Value| {
                let mut log = log.lock().unwrap();
                log.push(body);
                if log.len() == 2 {
                    warp::reply::json(&json!({"success": false, "message": "duplicate date"}))
                } else {
                    warp::reply::json(&json!({"success": true, "data": {}}))
                }
            });
        let rc: ResourceClient<ProductionRecord> =
            ResourceClient::new(client(&serve(routes)), Resource::Production);

        let rows: Vec<RawRow> = ["15-03-2024", "16-03-2024", "17-03-2024"]
            .iter()
            .map(|d| {
                [("date".to_string(), CellValue::from(*d)), ("packets".to_string(), 10.0.into())]
                    .into_iter()
                    .collect()
            })
            .collect();
        let importer = BulkImporter::new(
            ImportSchema::for_resource(Resource::Production),
            DateNormalizer::default(),
        );

        let err = importer.import(&rows, &rc).await.unwrap_err();
        let ImportError::Aborted { row, submitted, source } = err;
        assert_eq!((row, submitted), (2, 1));
        assert!(source.to_string().contains("duplicate date"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], json!({"date": "2024-03-15", "packets": 10.0, "sold": 0.0}));
    }
}
