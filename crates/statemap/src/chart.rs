//! Loaded chart state: the joined dataset, the drawable regions and the shared encoder.

use crate::atlas::{lines_path_data, path_data, Point, Topology};
use crate::config::{SourceConfig, DEFAULT_TRANSITION};
use crate::dataset::{
    DatasetImporter, IdentifierResolver, LoadError, Metric, RegionDataset, RegionId,
    RegionRecord, SourceBytes,
};
use crate::encoding::Encoder;
use geo::Centroid;
use std::io::Read;
use std::time::Duration;
use tracing::{info, warn};

/// One drawable region: its id, display name, both metric values, SVG path data and centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub id: RegionId,
    pub name: String,
    pub metrics: [f64; 2],
    pub path: String,
    pub centroid: Point<f64>,
}

impl RegionShape {
    pub fn value(&self, metric: Metric) -> f64 {
        self.metrics[metric.index()]
    }
}

#[derive(Debug, Clone)]
pub struct ChartState {
    dataset: RegionDataset,
    regions: Vec<RegionShape>,
    mesh: String,
    encoder: Encoder,
    transition: Duration,
}

impl ChartState {
    /// Read both sources concurrently, then build the chart.
    pub async fn load(sources: &SourceConfig) -> Result<Self, LoadError> {
        let bytes = SourceBytes::fetch(&sources.csv_path, &sources.topology_path).await?;
        Self::from_sources(&bytes, &sources.object)
    }

    pub fn from_sources(bytes: &SourceBytes, object: &str) -> Result<Self, LoadError> {
        let topology = Topology::from_slice(&bytes.topology)?;
        Self::build(bytes.csv.as_slice(), &topology, object)
    }

    /// Join the CSV onto `object` and keep only the shapes that have a record.
    pub fn build<R: Read>(csv: R, topology: &Topology, object: &str) -> Result<Self, LoadError> {
        let states = topology.object(object)?;
        let resolver = IdentifierResolver::from_object(states);
        let dataset = DatasetImporter::from_reader(csv, &resolver)?;
        let encoder = Encoder::from_dataset(&dataset).ok_or(LoadError::EmptyDataset)?;
        let mesh = lines_path_data(&topology.mesh(states)?);

        let mut regions = Vec::new();
        let mut filtered = 0usize;
        for feature in topology.features(states)? {
            let Some(record) = feature.id.as_ref().and_then(|id| dataset.get(id)) else {
                filtered += 1;
                continue;
            };
            let Some(center) = feature.geometry.centroid() else {
                warn!(id = %record.id, "region has no centroid, skipping");
                filtered += 1;
                continue;
            };
            regions.push(RegionShape {
                id: record.id.clone(),
                name: feature.name.unwrap_or_else(|| record.name.clone()),
                metrics: record.metrics,
                path: path_data(&feature.geometry),
                centroid: center,
            });
        }

        info!(
            object,
            records = dataset.len(),
            regions = regions.len(),
            filtered,
            "chart state built"
        );

        Ok(Self {
            dataset,
            regions,
            mesh,
            encoder,
            transition: DEFAULT_TRANSITION,
        })
    }

    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    pub fn dataset(&self) -> &RegionDataset {
        &self.dataset
    }

    pub fn record(&self, id: &RegionId) -> Option<&RegionRecord> {
        self.dataset.get(id)
    }

    /// Drawn regions in topology order; each has a matching record.
    pub fn regions(&self) -> &[RegionShape] {
        &self.regions
    }

    pub fn mesh_path(&self) -> &str {
        &self.mesh
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn transition(&self) -> Duration {
        self.transition
    }
}
