// Pseudo-random series provider, stands in for a market data source
use crate::application::series_provider::SeriesProvider;
use crate::domain::series::{Sample, Series};
use crate::domain::time_axis::TimeLabel;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

#[derive(Debug)]
enum RngSource {
    Thread,
    Seeded(Mutex<StdRng>),
}

#[derive(Debug)]
pub struct RandomSeriesProvider {
    min_value: f64,
    max_value: f64,
    source: RngSource,
}

impl RandomSeriesProvider {
    /// Values are drawn uniformly from `[min_value, max_value)`. A seed makes
    /// the sequence of draws reproducible.
    pub fn new(min_value: f64, max_value: f64, seed: Option<u64>) -> Result<Self> {
        if !(min_value >= 0.0 && min_value < max_value && max_value.is_finite()) {
            anyhow::bail!(
                "invalid synthesizer range [{}, {}): expected 0 <= min < max",
                min_value,
                max_value
            );
        }

        let source = match seed {
            Some(seed) => RngSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
            None => RngSource::Thread,
        };

        Ok(Self {
            min_value,
            max_value,
            source,
        })
    }

    fn draw_values(&self, count: usize) -> Vec<f64> {
        let range = self.min_value..self.max_value;
        match &self.source {
            RngSource::Thread => {
                let mut rng = rand::thread_rng();
                (0..count).map(|_| rng.gen_range(range.clone())).collect()
            }
            RngSource::Seeded(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                (0..count).map(|_| rng.gen_range(range.clone())).collect()
            }
        }
    }
}

#[async_trait]
impl SeriesProvider for RandomSeriesProvider {
    async fn fetch_series(&self, entity: &str, labels: &[TimeLabel]) -> Result<Series> {
        let values = self.draw_values(labels.len());
        let samples = labels
            .iter()
            .cloned()
            .zip(values)
            .map(|(label, value)| Sample::new(label, value))
            .collect();

        tracing::debug!("Synthesized {} samples for {}", labels.len(), entity);
        Ok(Series::new(entity.to_string(), samples))
    }
}
