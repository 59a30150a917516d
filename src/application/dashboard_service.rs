// Dashboard service - Use cases for building the overview, detail, comparison and regression views
use crate::application::error::{DashboardError, Result};
use crate::application::series_provider::SeriesProvider;
use crate::domain::catalog::{CatalogEntry, EntityCatalog};
use crate::domain::regression::{fit, project};
use crate::domain::series::{merge_for_comparison, Selection, Series};
use crate::domain::time_axis::{DisplayClock, SamplingWindow};
use crate::domain::views::{
    ComparisonView, DashboardCard, DetailView, LegendEntry, Overview, RegressionView,
};
use crate::infrastructure::config::ViewDefaults;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    provider: Arc<dyn SeriesProvider>,
    catalog: Arc<EntityCatalog>,
    defaults: ViewDefaults,
    clock: DisplayClock,
}

impl DashboardService {
    pub fn new(
        provider: Arc<dyn SeriesProvider>,
        catalog: Arc<EntityCatalog>,
        defaults: ViewDefaults,
        clock: DisplayClock,
    ) -> Self {
        Self {
            provider,
            catalog,
            defaults,
            clock,
        }
    }

    /// Validates the requested window, filling in configured defaults.
    pub fn resolve_window(&self, hours: Option<u32>, samples: Option<u32>) -> Result<SamplingWindow> {
        let window = SamplingWindow::new(
            hours.unwrap_or(self.defaults.window_hours),
            samples.unwrap_or(self.defaults.samples_per_hour),
            self.defaults.max_window_hours,
        )?;
        Ok(window)
    }

    pub async fn overview(&self, window: SamplingWindow) -> Result<Overview> {
        let labels = window.labels(&self.clock.now());
        let mut all = self.provider.fetch_all(&self.catalog.names(), &labels).await;
        let mut cards = Vec::with_capacity(self.catalog.len());

        for entry in self.catalog.entries() {
            match all.remove(&entry.name) {
                Some(Ok(series)) => cards.push(card_for(entry, &series)),
                Some(Err(e)) => {
                    tracing::warn!("Skipping card for {}: {:#}", entry.name, e);
                }
                None => {}
            }
        }

        Ok(Overview {
            window_hours: window.hours(),
            cards,
        })
    }

    pub async fn detail(&self, entity: &str, window: SamplingWindow) -> Result<DetailView> {
        self.entry(entity)?;
        let series = self.fetch_window(entity, window).await?;
        Ok(DetailView::new(window.hours(), series))
    }

    pub async fn compare(&self, selection: &Selection, window: SamplingWindow) -> Result<ComparisonView> {
        let legend = selection
            .names()
            .iter()
            .map(|name| {
                self.entry(name).map(|entry| LegendEntry {
                    name: entry.name.clone(),
                    color: entry.display_color(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let labels = window.labels(&self.clock.now());
        let series = if selection.is_empty() {
            HashMap::new()
        } else {
            available(self.provider.fetch_all(selection.names(), &labels).await)
        };
        let rows = merge_for_comparison(selection.names(), &labels, &series);

        tracing::debug!(
            "Merged {} rows for {} selected entities",
            rows.len(),
            selection.names().len()
        );

        Ok(ComparisonView {
            window_hours: window.hours(),
            legend,
            labels,
            rows,
        })
    }

    pub async fn regression(&self, entity: &str, window: SamplingWindow) -> Result<RegressionView> {
        let base_color = self.entry(entity)?.display_color();
        let series = self.fetch_window(entity, window).await?;

        let line = fit(&series);
        let points = project(&series, &line);
        tracing::debug!(
            "Fitted {}: intercept={:.4}, slope={:.4}",
            entity,
            line.intercept,
            line.slope
        );

        Ok(RegressionView::new(window.hours(), base_color, series, line, points))
    }

    fn entry(&self, name: &str) -> Result<&CatalogEntry> {
        self.catalog
            .get(name)
            .ok_or_else(|| DashboardError::UnknownEntity(name.to_string()))
    }

    async fn fetch_window(&self, entity: &str, window: SamplingWindow) -> Result<Series> {
        self.provider
            .fetch_window(entity, window, self.clock.now())
            .await
            .map_err(|source| DashboardError::SeriesUnavailable {
                entity: entity.to_string(),
                source,
            })
    }
}

/// Drops series that could not be fetched, so the merge renders them as gaps.
fn available(all: HashMap<String, anyhow::Result<Series>>) -> HashMap<String, Series> {
    all.into_iter()
        .filter_map(|(name, result)| match result {
            Ok(series) => Some((name, series)),
            Err(e) => {
                tracing::warn!("Series for {} unavailable: {:#}", name, e);
                None
            }
        })
        .collect()
}

pub(crate) fn card_for(entry: &CatalogEntry, series: &Series) -> DashboardCard {
    DashboardCard::new(
        entry.name.clone(),
        entry.display_color(),
        entry.image.clone(),
        series,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::catalog::Rgb;
    use crate::domain::series::{Sample, Trend};
    use crate::domain::time_axis::TimeLabel;
    use crate::infrastructure::random_provider::RandomSeriesProvider;
    use async_trait::async_trait;

    pub(crate) fn test_catalog() -> Arc<EntityCatalog> {
        Arc::new(EntityCatalog::new(vec![
            CatalogEntry::new(
                "Bitcoin".to_string(),
                Some(Rgb::new(0xF7, 0x93, 0x1A)),
                "btc.png".to_string(),
            ),
            CatalogEntry::new(
                "Ethereum".to_string(),
                Some(Rgb::new(0x3C, 0x3C, 0x3D)),
                "eth.svg".to_string(),
            ),
            CatalogEntry::new("XRP".to_string(), None, "xrp.png".to_string()),
        ]))
    }

    /// Returns `value = index + 1` for every entity except `failing`.
    pub(crate) struct LinearProvider {
        pub failing: Option<String>,
    }

    #[async_trait]
    impl SeriesProvider for LinearProvider {
        async fn fetch_series(&self, entity: &str, labels: &[TimeLabel]) -> anyhow::Result<Series> {
            if self.failing.as_deref() == Some(entity) {
                anyhow::bail!("upstream timeout");
            }
            let samples = labels
                .iter()
                .enumerate()
                .map(|(i, label)| Sample::new(label.clone(), i as f64 + 1.0))
                .collect();
            Ok(Series::new(entity.to_string(), samples))
        }
    }

    fn service(provider: Arc<dyn SeriesProvider>) -> DashboardService {
        DashboardService::new(
            provider,
            test_catalog(),
            ViewDefaults::default(),
            DisplayClock::utc(),
        )
    }

    fn random_service() -> DashboardService {
        service(Arc::new(RandomSeriesProvider::new(0.0, 100.0, Some(1)).unwrap()))
    }

    fn linear_service(failing: Option<&str>) -> DashboardService {
        service(Arc::new(LinearProvider {
            failing: failing.map(str::to_string),
        }))
    }

    #[test]
    fn test_resolve_window_defaults_and_validation() {
        let svc = random_service();
        let window = svc.resolve_window(None, None).unwrap();
        assert_eq!((window.hours(), window.samples_per_hour()), (12, 4));

        assert!(matches!(
            svc.resolve_window(Some(0), None),
            Err(DashboardError::InvalidWindow { hours: 0, max: 24 })
        ));
        assert!(matches!(
            svc.resolve_window(Some(25), None),
            Err(DashboardError::InvalidWindow { hours: 25, max: 24 })
        ));
        assert!(matches!(
            svc.resolve_window(Some(2), Some(0)),
            Err(DashboardError::InvalidDensity(0))
        ));
    }

    #[tokio::test]
    async fn test_compare_merge_shape() {
        let svc = random_service();
        let window = svc.resolve_window(Some(1), Some(4)).unwrap();
        let selection = Selection::from_names(["Bitcoin", "Ethereum"]);

        let view = svc.compare(&selection, window).await.unwrap();

        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.labels.len(), 4);
        for row in &view.rows {
            let keys: Vec<&str> = row.values.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, vec!["Bitcoin", "Ethereum"]);
        }
        let legend: Vec<&str> = view.legend.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(legend, vec!["Bitcoin", "Ethereum"]);
    }

    #[tokio::test]
    async fn test_compare_empty_selection() {
        let svc = random_service();
        let window = svc.resolve_window(Some(6), None).unwrap();
        let view = svc.compare(&Selection::new(), window).await.unwrap();
        assert!(view.rows.is_empty());
        assert!(view.legend.is_empty());
    }

    #[tokio::test]
    async fn test_compare_rejects_unknown_entity() {
        let svc = random_service();
        let window = svc.resolve_window(None, None).unwrap();
        let selection = Selection::from_names(["Bitcoin", "Litecoin"]);
        assert!(matches!(
            svc.compare(&selection, window).await,
            Err(DashboardError::UnknownEntity(name)) if name == "Litecoin"
        ));
    }

    #[tokio::test]
    async fn test_compare_unavailable_series_renders_gaps() {
        let svc = linear_service(Some("Ethereum"));
        let window = svc.resolve_window(Some(1), Some(2)).unwrap();
        let selection = Selection::from_names(["Ethereum", "Bitcoin"]);

        let view = svc.compare(&selection, window).await.unwrap();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].get("Ethereum"), Some(None));
        assert_eq!(view.rows[1].get("Bitcoin"), Some(Some(2.0)));
        let legend: Vec<&str> = view.legend.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(legend, vec!["Ethereum", "Bitcoin"]);
    }

    #[tokio::test]
    async fn test_compare_after_toggle() {
        let svc = linear_service(None);
        let window = svc.resolve_window(Some(1), Some(1)).unwrap();
        let mut selection = Selection::from_names(["Bitcoin", "Ethereum"]);
        selection.toggle("Bitcoin");
        selection.toggle("XRP");

        let view = svc.compare(&selection, window).await.unwrap();
        let keys: Vec<&str> = view.rows[0].values.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Ethereum", "XRP"]);
        assert_eq!(view.rows[0].get("XRP"), Some(Some(1.0)));
    }

    #[tokio::test]
    async fn test_detail_view() {
        let svc = linear_service(None);
        let window = svc.resolve_window(Some(3), Some(4)).unwrap();
        let view = svc.detail("Bitcoin", window).await.unwrap();

        assert_eq!(view.entity, "Bitcoin");
        assert_eq!(view.series.len(), 12);
        assert_eq!(view.trend, Trend::Rising);
        assert!(view.series.samples.windows(2).all(|w| w[0].label.time_ms < w[1].label.time_ms));
    }

    #[tokio::test]
    async fn test_detail_errors() {
        let svc = linear_service(Some("XRP"));
        let window = svc.resolve_window(None, None).unwrap();
        assert!(matches!(
            svc.detail("Monero", window).await,
            Err(DashboardError::UnknownEntity(_))
        ));
        assert!(matches!(
            svc.detail("XRP", window).await,
            Err(DashboardError::SeriesUnavailable { entity, .. }) if entity == "XRP"
        ));
    }

    #[tokio::test]
    async fn test_regression_view() {
        let svc = linear_service(None);
        let window = svc.resolve_window(Some(18), Some(1)).unwrap();
        let view = svc.regression("Bitcoin", window).await.unwrap();

        assert!((view.line.slope - 1.0).abs() < 1e-9);
        assert!((view.line.intercept - 1.0).abs() < 1e-9);
        assert_eq!(view.points.len(), view.series.len());
        assert_eq!(view.line_color, Rgb::new(8, 108, 229));
        assert_eq!(view.tick_count, 12);
    }

    #[tokio::test]
    async fn test_regression_uses_fallback_color() {
        let svc = random_service();
        let window = svc.resolve_window(Some(2), None).unwrap();
        let view = svc.regression("XRP", window).await.unwrap();
        assert_eq!(view.base_color.to_hex(), "#8884D8");
        assert_eq!(view.line_color, view.base_color.complementary());
        assert_eq!(view.tick_count, 2);
    }

    #[tokio::test]
    async fn test_overview_skips_unavailable() {
        let svc = linear_service(Some("Ethereum"));
        let window = svc.resolve_window(Some(1), None).unwrap();
        let overview = svc.overview(window).await.unwrap();

        let names: Vec<&str> = overview.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bitcoin", "XRP"]);
        assert!(overview.cards.iter().all(|c| c.trend == Trend::Rising));
        assert_eq!(overview.cards[0].latest, Some(4.0));
    }
}
