use crate::domain::catalog::{CatalogEntry, EntityCatalog, Rgb};
use crate::domain::time_axis::{DisplayClock, SamplingWindow, DEFAULT_SAMPLES_PER_HOUR};
use anyhow::Context;
use chrono::FixedOffset;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub defaults: ViewDefaults,
    #[serde(default)]
    pub synthesizer: SynthesizerSettings,
    #[serde(default)]
    pub entities: Vec<EntityConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ViewDefaults {
    pub window_hours: u32,
    pub samples_per_hour: u32,
    pub max_window_hours: u32,
    /// Offset from UTC that axis labels are rendered in
    pub utc_offset_minutes: i32,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            window_hours: 12,
            samples_per_hour: DEFAULT_SAMPLES_PER_HOUR,
            max_window_hours: 24,
            utc_offset_minutes: 0,
        }
    }
}

impl ViewDefaults {
    pub fn display_clock(&self) -> anyhow::Result<DisplayClock> {
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("utc offset of {} minutes is out of range", self.utc_offset_minutes))?;
        Ok(DisplayClock::new(offset))
    }

    /// The default window must itself be a window a request could ask for.
    pub fn validate(&self) -> anyhow::Result<()> {
        SamplingWindow::new(self.window_hours, self.samples_per_hour, self.max_window_hours)
            .context("invalid [defaults] window")?;
        self.display_clock()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SynthesizerSettings {
    pub min_value: f64,
    pub max_value: f64,
    pub seed: Option<u64>,
}

impl Default for SynthesizerSettings {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EntityConfig {
    pub name: String,
    pub color: Option<String>,
    pub image: String,
}

impl AppConfig {
    /// Builds the catalog, rejecting malformed colors and duplicate names.
    pub fn catalog(&self) -> anyhow::Result<EntityCatalog> {
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            if entries.iter().any(|e| e.name == entity.name) {
                anyhow::bail!("duplicate entity '{}' in catalog", entity.name);
            }

            let color = entity
                .color
                .as_deref()
                .map(str::parse::<Rgb>)
                .transpose()
                .with_context(|| format!("entity '{}'", entity.name))?;

            entries.push(CatalogEntry::new(
                entity.name.clone(),
                color,
                entity.image.clone(),
            ));
        }
        Ok(EntityCatalog::new(entries))
    }
}

/// Loads `config/dashboard.*` and `DASHBOARD__*` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.defaults.validate()?;
    Ok(config)
}
