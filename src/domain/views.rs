// View models handed to the presentation layer
use super::catalog::Rgb;
use super::regression::{RegressionLine, RegressionPoint};
use super::series::{MergedRow, Series, Trend};
use super::time_axis::TimeLabel;

/// Maximum number of x axis ticks on the regression chart
pub const MAX_AXIS_TICKS: u32 = 12;

#[derive(Debug, Clone)]
pub struct DashboardCard {
    pub name: String,
    pub color: Rgb,
    pub image: String,
    pub latest: Option<f64>,
    pub trend: Trend,
}

impl DashboardCard {
    pub fn new(name: String, color: Rgb, image: String, series: &Series) -> Self {
        Self {
            name,
            color,
            image,
            latest: series.latest().map(|s| s.value),
            trend: series.trend(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Overview {
    pub window_hours: u32,
    pub cards: Vec<DashboardCard>,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub entity: String,
    pub window_hours: u32,
    pub trend: Trend,
    pub series: Series,
}

impl DetailView {
    pub fn new(window_hours: u32, series: Series) -> Self {
        Self {
            entity: series.entity.clone(),
            window_hours,
            trend: series.trend(),
            series,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub name: String,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct ComparisonView {
    pub window_hours: u32,
    pub legend: Vec<LegendEntry>,
    pub labels: Vec<TimeLabel>,
    pub rows: Vec<MergedRow>,
}

#[derive(Debug, Clone)]
pub struct RegressionView {
    pub entity: String,
    pub window_hours: u32,
    pub base_color: Rgb,
    pub line_color: Rgb,
    pub tick_count: u32,
    pub line: RegressionLine,
    pub series: Series,
    pub points: Vec<RegressionPoint>,
}

impl RegressionView {
    pub fn new(
        window_hours: u32,
        base_color: Rgb,
        series: Series,
        line: RegressionLine,
        points: Vec<RegressionPoint>,
    ) -> Self {
        Self {
            entity: series.entity.clone(),
            window_hours,
            base_color,
            line_color: base_color.complementary(),
            tick_count: window_hours.min(MAX_AXIS_TICKS),
            line,
            series,
            points,
        }
    }
}
