use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Region identifier shared by the tabular data and the geometry source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two statistics carried by every record, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ObesityRate,
    TrumpVote,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::ObesityRate, Metric::TrumpVote];

    pub const fn index(self) -> usize {
        match self {
            Self::ObesityRate => 0,
            Self::TrumpVote => 1,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, InvalidMetric> {
        match index {
            0 => Ok(Self::ObesityRate),
            1 => Ok(Self::TrumpVote),
            other => Err(InvalidMetric {
                value: other.to_string(),
            }),
        }
    }

    /// Label used inside region tooltips.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ObesityRate => "Obesity Rate",
            Self::TrumpVote => "Trump Vote",
        }
    }

    pub const fn legend_title(self) -> &'static str {
        match self {
            Self::ObesityRate => "Adult obesity (self-reported)",
            Self::TrumpVote => "Trump vote %",
        }
    }
}

impl FromStr for Metric {
    type Err = InvalidMetric;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| InvalidMetric {
                value: value.to_string(),
            })
            .and_then(Self::from_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("metric selection must be 0 or 1, got '{value}'")]
pub struct InvalidMetric {
    pub value: String,
}

/// One joined row: the geometry id, the tabular display name and both metrics as fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRecord {
    pub id: RegionId,
    pub name: String,
    pub metrics: [f64; 2],
}

impl RegionRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        self.metrics[metric.index()]
    }
}

/// Read-only mapping from region id to record, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct RegionDataset {
    records: BTreeMap<RegionId, RegionRecord>,
}

impl RegionDataset {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RegionRecord>,
    {
        let mut map = BTreeMap::new();
        for record in records {
            if let Some(previous) = map.insert(record.id.clone(), record) {
                warn!(id = %previous.id, name = %previous.name, "duplicate region row replaced");
            }
        }
        Self { records: map }
    }

    pub fn get(&self, id: &RegionId) -> Option<&RegionRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &RegionRecord> {
        self.records.values()
    }

    /// Every value of every metric, flattened.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records
            .values()
            .flat_map(|record| record.metrics.iter().copied())
    }
}
