// Series domain models: samples, trend classification and comparison merge
use super::time_axis::TimeLabel;
use std::collections::HashMap;

pub const RISING_COLOR: &str = "#22c55e";
pub const FALLING_COLOR: &str = "#ef4444";

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: TimeLabel,
    pub value: f64,
}

impl Sample {
    pub fn new(label: TimeLabel, value: f64) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    FallingOrFlat,
}

impl Trend {
    pub fn color(&self) -> &'static str {
        match self {
            Trend::Rising => RISING_COLOR,
            Trend::FallingOrFlat => FALLING_COLOR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::FallingOrFlat => "falling",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub entity: String,
    pub samples: Vec<Sample>,
}

impl Series {
    pub fn new(entity: String, samples: Vec<Sample>) -> Self {
        Self { entity, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.samples.get(index).map(|s| s.value)
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Rising only when there are at least two samples and the last one is
    /// strictly above the first.
    pub fn trend(&self) -> Trend {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) if self.samples.len() >= 2 && last.value > first.value => {
                Trend::Rising
            }
            _ => Trend::FallingOrFlat,
        }
    }
}

/// One row of the comparison table. `values` follows the selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub label: TimeLabel,
    pub values: Vec<(String, Option<f64>)>,
}

#[cfg(test)]
impl MergedRow {
    pub fn get(&self, entity: &str) -> Option<Option<f64>> {
        self.values
            .iter()
            .find(|(name, _)| name == entity)
            .map(|(_, value)| *value)
    }
}

/// Positional merge: row `i` takes sample `i` of every selected series, or
/// `None` when that series is missing or shorter than the label axis.
pub fn merge_for_comparison(
    selected: &[String],
    labels: &[TimeLabel],
    series: &HashMap<String, Series>,
) -> Vec<MergedRow> {
    if selected.is_empty() {
        return Vec::new();
    }

    labels
        .iter()
        .enumerate()
        .map(|(i, label)| MergedRow {
            label: label.clone(),
            values: selected
                .iter()
                .map(|name| (name.clone(), series.get(name).and_then(|s| s.value_at(i))))
                .collect(),
        })
        .collect()
}

/// Ordered set of entity names picked for comparison. Insertion order is the
/// legend order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    names: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection keeping the first occurrence of each name.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for name in names {
            let name = name.into();
            if !selection.contains(&name) {
                selection.names.push(name);
            }
        }
        selection
    }

    /// Removes `name` if selected, appends it otherwise.
    pub fn toggle(&mut self, name: &str) {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
        } else {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Tooltip/card rendering of a price.
pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}
