// Streaming dashboard service - Progressive loading of overview cards
use crate::application::dashboard_service::card_for;
use crate::application::series_provider::SeriesProvider;
use crate::domain::catalog::{CatalogEntry, EntityCatalog};
use crate::domain::time_axis::{DisplayClock, SamplingWindow};
use crate::domain::views::DashboardCard;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub enum StreamMessage {
    Skeleton {
        window: SamplingWindow,
        label_count: usize,
        entities: Vec<CatalogEntry>,
    },
    Card(DashboardCard),
    Unavailable {
        name: String,
    },
    Complete {
        cards: usize,
        duration_ms: i64,
    },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    provider: Arc<dyn SeriesProvider>,
    catalog: Arc<EntityCatalog>,
    clock: DisplayClock,
}

impl StreamingDashboardService {
    pub fn new(
        provider: Arc<dyn SeriesProvider>,
        catalog: Arc<EntityCatalog>,
        clock: DisplayClock,
    ) -> Self {
        Self {
            provider,
            catalog,
            clock,
        }
    }

    /// Sends a skeleton right away, then one message per entity as its series
    /// resolves, then a completion event. Dropping the receiver aborts any
    /// fetch still in flight. A fetch that panics is reported as unavailable.
    pub async fn stream_overview(&self, window: SamplingWindow) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let start_time = Instant::now();
        let labels = Arc::new(window.labels(&self.clock.now()));

        let skeleton = StreamMessage::Skeleton {
            window,
            label_count: window.sample_count(),
            entities: self.catalog.entries().to_vec(),
        };
        let _ = tx.send(skeleton).await;

        let mut tasks = JoinSet::new();
        for entry in self.catalog.entries().iter().cloned() {
            let provider = self.provider.clone();
            let labels = labels.clone();
            tasks.spawn(async move {
                let result = AssertUnwindSafe(provider.fetch_series(&entry.name, &labels))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("series fetch panicked")));
                (entry, result)
            });
        }

        tokio::spawn(async move {
            let mut cards = 0;
            loop {
                let joined = tokio::select! {
                    _ = tx.closed() => {
                        tracing::debug!("Overview stream closed, aborting {} fetches", tasks.len());
                        return;
                    }
                    joined = tasks.join_next() => joined,
                };
                let Some(joined) = joined else {
                    break;
                };

                let msg = match joined {
                    Ok((entry, Ok(series))) => {
                        cards += 1;
                        StreamMessage::Card(card_for(&entry, &series))
                    }
                    Ok((entry, Err(e))) => {
                        tracing::warn!("Series for {} unavailable: {:#}", entry.name, e);
                        StreamMessage::Unavailable { name: entry.name }
                    }
                    Err(e) => {
                        // Only reachable through cancellation, panics are caught above
                        tracing::warn!("Series task failed: {}", e);
                        continue;
                    }
                };

                if tx.send(msg).await.is_err() {
                    return;
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            let _ = tx.send(StreamMessage::Complete { cards, duration_ms }).await;
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::{test_catalog, LinearProvider};
    use crate::domain::series::Series;
    use crate::domain::time_axis::TimeLabel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    async fn collect(mut rx: mpsc::Receiver<StreamMessage>) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        while let Some(msg) = rx.recv().await {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn test_stream_order() {
        let service = StreamingDashboardService::new(
            Arc::new(LinearProvider { failing: None }),
            test_catalog(),
            DisplayClock::utc(),
        );
        let window = SamplingWindow::new(2, 4, 24).unwrap();
        let messages = collect(service.stream_overview(window).await).await;

        assert_eq!(messages.len(), 5);
        match &messages[0] {
            StreamMessage::Skeleton {
                label_count,
                entities,
                ..
            } => {
                assert_eq!(*label_count, 8);
                assert_eq!(entities.len(), 3);
            }
            other => panic!("expected skeleton, got {:?}", other),
        }
        assert!(messages[1..4].iter().all(|m| matches!(m, StreamMessage::Card(_))));
        assert!(matches!(messages[4], StreamMessage::Complete { cards: 3, .. }));
    }

    #[tokio::test]
    async fn test_stream_reports_unavailable() {
        let service = StreamingDashboardService::new(
            Arc::new(LinearProvider {
                failing: Some("Bitcoin".to_string()),
            }),
            test_catalog(),
            DisplayClock::utc(),
        );
        let window = SamplingWindow::new(1, 4, 24).unwrap();
        let messages = collect(service.stream_overview(window).await).await;

        let unavailable: Vec<&str> = messages
            .iter()
            .filter_map(|m| match m {
                StreamMessage::Unavailable { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(unavailable, vec!["Bitcoin"]);
        assert!(matches!(messages.last(), Some(StreamMessage::Complete { cards: 2, .. })));
    }

    /// Panics while fetching Ethereum
    struct PanickingProvider;

    #[async_trait]
    impl SeriesProvider for PanickingProvider {
        async fn fetch_series(&self, entity: &str, labels: &[TimeLabel]) -> anyhow::Result<Series> {
            if entity == "Ethereum" {
                panic!("decoder blew up");
            }
            LinearProvider { failing: None }.fetch_series(entity, labels).await
        }
    }

    #[tokio::test]
    async fn test_panicking_fetch_is_reported_unavailable() {
        let service = StreamingDashboardService::new(
            Arc::new(PanickingProvider),
            test_catalog(),
            DisplayClock::utc(),
        );
        let window = SamplingWindow::new(1, 4, 24).unwrap();
        let messages = collect(service.stream_overview(window).await).await;

        assert_eq!(messages.len(), 5);
        assert!(messages.iter().any(
            |m| matches!(m, StreamMessage::Unavailable { name } if name == "Ethereum")
        ));
        assert!(matches!(messages.last(), Some(StreamMessage::Complete { cards: 2, .. })));
    }

    struct AbortFlag(Arc<AtomicBool>);

    impl Drop for AbortFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Never answers for XRP
    struct HangingProvider {
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl SeriesProvider for HangingProvider {
        async fn fetch_series(&self, entity: &str, labels: &[TimeLabel]) -> anyhow::Result<Series> {
            if entity == "XRP" {
                let _flag = AbortFlag(self.dropped.clone());
                futures::future::pending::<()>().await;
            }
            LinearProvider { failing: None }.fetch_series(entity, labels).await
        }
    }

    #[tokio::test]
    async fn test_dropping_receiver_aborts_fetches() {
        let dropped = Arc::new(AtomicBool::new(false));
        let service = StreamingDashboardService::new(
            Arc::new(HangingProvider {
                dropped: dropped.clone(),
            }),
            test_catalog(),
            DisplayClock::utc(),
        );
        let window = SamplingWindow::new(1, 4, 24).unwrap();

        let mut rx = service.stream_overview(window).await;
        assert!(matches!(rx.recv().await, Some(StreamMessage::Skeleton { .. })));
        drop(rx);

        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }
}
