// Mapper to convert domain models to JSON transfer types
use crate::application::streaming_service::StreamMessage;
use crate::domain::catalog::CatalogEntry;
use crate::domain::regression::RegressionPoint;
use crate::domain::series::{format_price, MergedRow, Sample};
use crate::domain::views::{ComparisonView, DashboardCard, DetailView, Overview, RegressionView};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub struct EntityDto {
    pub name: String,
    pub color: String,
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct SampleDto {
    pub time: String,
    pub time_ms: i64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct PointDto {
    pub x: usize,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct CardDto {
    pub name: String,
    pub color: String,
    pub image: String,
    pub latest: Option<f64>,
    pub latest_display: Option<String>,
    pub trend: &'static str,
    pub trend_color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OverviewDto {
    pub window_hours: u32,
    pub cards: Vec<CardDto>,
}

#[derive(Debug, Serialize)]
pub struct DetailDto {
    pub entity: String,
    pub window_hours: u32,
    pub trend: &'static str,
    pub trend_color: &'static str,
    pub data: Vec<SampleDto>,
}

#[derive(Debug, Serialize)]
pub struct LegendDto {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct ComparisonDto {
    pub window_hours: u32,
    pub legend: Vec<LegendDto>,
    pub labels: Vec<String>,
    pub data: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct RegressionDto {
    pub entity: String,
    pub window_hours: u32,
    pub base_color: String,
    pub line_color: String,
    pub tick_count: u32,
    pub intercept: f64,
    pub slope: f64,
    pub labels: Vec<String>,
    pub points: Vec<PointDto>,
    pub regression: Vec<PointDto>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessageDto {
    Skeleton {
        window_hours: u32,
        samples_per_hour: u32,
        label_count: usize,
        entities: Vec<EntityDto>,
    },
    Card(CardDto),
    Unavailable {
        name: String,
    },
    Complete {
        cards: usize,
        duration_ms: i64,
    },
}

pub fn entity_to_dto(entry: &CatalogEntry) -> EntityDto {
    EntityDto {
        name: entry.name.clone(),
        color: entry.display_color().to_hex(),
        image: entry.image.clone(),
    }
}

pub fn overview_to_dto(overview: Overview) -> OverviewDto {
    OverviewDto {
        window_hours: overview.window_hours,
        cards: overview.cards.into_iter().map(card_to_dto).collect(),
    }
}

pub fn detail_to_dto(view: DetailView) -> DetailDto {
    DetailDto {
        entity: view.entity,
        window_hours: view.window_hours,
        trend: view.trend.as_str(),
        trend_color: view.trend.color(),
        data: view.series.samples.into_iter().map(sample_to_dto).collect(),
    }
}

pub fn comparison_to_dto(view: ComparisonView) -> ComparisonDto {
    ComparisonDto {
        window_hours: view.window_hours,
        legend: view
            .legend
            .into_iter()
            .map(|l| LegendDto {
                name: l.name,
                color: l.color.to_hex(),
            })
            .collect(),
        labels: view.labels.into_iter().map(|l| l.text).collect(),
        data: view.rows.into_iter().map(row_to_json).collect(),
    }
}

pub fn regression_to_dto(view: RegressionView) -> RegressionDto {
    let (labels, points) = view
        .series
        .samples
        .into_iter()
        .enumerate()
        .map(|(i, s)| (s.label.text, PointDto { x: i, y: s.value }))
        .unzip();

    RegressionDto {
        entity: view.entity,
        window_hours: view.window_hours,
        base_color: view.base_color.to_hex(),
        line_color: view.line_color.to_css_rgb(),
        tick_count: view.tick_count,
        intercept: view.line.intercept,
        slope: view.line.slope,
        labels,
        points,
        regression: view.points.into_iter().map(point_to_dto).collect(),
    }
}

pub fn stream_message_to_dto(msg: StreamMessage) -> StreamMessageDto {
    match msg {
        StreamMessage::Skeleton {
            window,
            label_count,
            entities,
        } => StreamMessageDto::Skeleton {
            window_hours: window.hours(),
            samples_per_hour: window.samples_per_hour(),
            label_count,
            entities: entities.iter().map(entity_to_dto).collect(),
        },
        StreamMessage::Card(card) => StreamMessageDto::Card(card_to_dto(card)),
        StreamMessage::Unavailable { name } => StreamMessageDto::Unavailable { name },
        StreamMessage::Complete { cards, duration_ms } => {
            StreamMessageDto::Complete { cards, duration_ms }
        }
    }
}

fn card_to_dto(card: DashboardCard) -> CardDto {
    CardDto {
        name: card.name,
        color: card.color.to_hex(),
        image: card.image,
        latest: card.latest,
        latest_display: card.latest.map(format_price),
        trend: card.trend.as_str(),
        trend_color: card.trend.color(),
    }
}

fn sample_to_dto(sample: Sample) -> SampleDto {
    SampleDto {
        time: sample.label.text,
        time_ms: sample.label.time_ms,
        value: sample.value,
    }
}

fn point_to_dto(point: RegressionPoint) -> PointDto {
    PointDto {
        x: point.index,
        y: point.value,
    }
}

/// `{"time": label, "<entity>": value-or-null, ...}` in selection order
fn row_to_json(row: MergedRow) -> Map<String, Value> {
    let mut object = Map::with_capacity(row.values.len() + 1);
    object.insert("time".to_string(), Value::String(row.label.text));
    for (name, value) in row.values {
        object.insert(name, value.map(Value::from).unwrap_or(Value::Null));
    }
    object
}
