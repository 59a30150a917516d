// Provider trait for series data access
use crate::domain::series::Series;
use crate::domain::time_axis::{SamplingWindow, TimeLabel};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// One series for `entity`, one sample per label, in label order
    async fn fetch_series(&self, entity: &str, labels: &[TimeLabel]) -> anyhow::Result<Series>;

    /// Series for every entity, all aligned to the same labels. Fetches run
    /// concurrently and each entity keeps its own result, so one failure does
    /// not hide the others.
    async fn fetch_all(
        &self,
        entities: &[String],
        labels: &[TimeLabel],
    ) -> HashMap<String, anyhow::Result<Series>> {
        let fetches = entities
            .iter()
            .map(|entity| async move { (entity.clone(), self.fetch_series(entity, labels).await) });
        futures::future::join_all(fetches).await.into_iter().collect()
    }

    /// Series for `entity` over `window` ending at `now`
    async fn fetch_window(
        &self,
        entity: &str,
        window: SamplingWindow,
        now: DateTime<FixedOffset>,
    ) -> anyhow::Result<Series> {
        let labels = window.labels(&now);
        self.fetch_series(entity, &labels).await
    }
}
