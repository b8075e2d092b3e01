mod parser;
mod records;
mod resolver;

pub use parser::RecordError;
pub use records::{InvalidMetric, Metric, RegionDataset, RegionId, RegionRecord};
pub use resolver::{IdentifierResolver, ResolutionError};

use crate::atlas::TopologyError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub enum LoadError {
    Fetch {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    Record(RecordError),
    Topology(TopologyError),
    Resolution(ResolutionError),
    EmptyDataset,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Fetch { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Csv(err) => write!(f, "invalid state CSV data: {}", err),
            LoadError::Record(err) => write!(f, "invalid state record: {}", err),
            LoadError::Topology(err) => write!(f, "invalid topology: {}", err),
            LoadError::Resolution(err) => write!(f, "could not join CSV onto topology: {}", err),
            LoadError::EmptyDataset => write!(f, "the state CSV contains no rows"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch { source, .. } => Some(source),
            LoadError::Csv(err) => Some(err),
            LoadError::Record(err) => Some(err),
            LoadError::Topology(err) => Some(err),
            LoadError::Resolution(err) => Some(err),
            LoadError::EmptyDataset => None,
        }
    }
}

impl From<TopologyError> for LoadError {
    fn from(err: TopologyError) -> Self {
        Self::Topology(err)
    }
}

impl From<ResolutionError> for LoadError {
    fn from(err: ResolutionError) -> Self {
        Self::Resolution(err)
    }
}

/// Raw contents of the two input files.
#[derive(Debug, Clone)]
pub struct SourceBytes {
    pub csv: Vec<u8>,
    pub topology: Vec<u8>,
}

impl SourceBytes {
    /// Read both files concurrently; nothing proceeds unless both succeed.
    pub async fn fetch<C, T>(csv_path: C, topology_path: T) -> Result<Self, LoadError>
    where
        C: AsRef<Path>,
        T: AsRef<Path>,
    {
        let (csv, topology) = tokio::try_join!(
            read_source(csv_path.as_ref()),
            read_source(topology_path.as_ref())
        )?;
        Ok(Self { csv, topology })
    }
}

async fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| LoadError::Fetch {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), bytes = bytes.len(), "source loaded");
    Ok(bytes)
}

/// Parses the state CSV and joins every row onto a geometry id.
pub struct DatasetImporter;

impl DatasetImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        resolver: &IdentifierResolver,
    ) -> Result<RegionDataset, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Fetch {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, resolver)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        resolver: &IdentifierResolver,
    ) -> Result<RegionDataset, LoadError> {
        let mut records = Vec::new();

        for row in parser::parse_rows(reader)? {
            let id = resolver.resolve(&row.name)?;
            records.push(RegionRecord {
                id,
                name: row.name,
                metrics: row.metrics,
            });
        }

        if records.is_empty() {
            return Err(LoadError::EmptyDataset);
        }

        let dataset = RegionDataset::from_records(records);
        debug!(regions = dataset.len(), "state dataset joined");
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn resolver() -> IdentifierResolver {
        let alabama = RegionId::new("01");
        let arizona = RegionId::new("04");
        IdentifierResolver::from_descriptors(vec![("Alabama", &alabama), ("Arizona", &arizona)])
    }

    #[test]
    fn importer_joins_rows_onto_ids() {
        let csv = "State Name,Obesity Rate%,Trump Vote %\nAlabama,36.3%,62.0%\nArizona,29.5%,49.1%\n";
        let dataset =
            DatasetImporter::from_reader(Cursor::new(csv), &resolver()).expect("import succeeds");

        assert_eq!(dataset.len(), 2);
        let arizona = dataset.get(&RegionId::new("04")).expect("arizona joined");
        assert_eq!(arizona.name, "Arizona");
        assert!((arizona.value(Metric::TrumpVote) - 0.491).abs() < 1e-12);
    }

    #[test]
    fn unknown_state_aborts_the_import() {
        let csv = "State Name,Obesity Rate%,Trump Vote %\nAlabama,36.3%,62.0%\nAtlantis,20.0%,50.0%\n";
        let error = DatasetImporter::from_reader(Cursor::new(csv), &resolver())
            .expect_err("unknown state rejected");

        match error {
            LoadError::Resolution(ResolutionError { name }) => assert_eq!(name, "Atlantis"),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn header_only_csv_is_empty() {
        let csv = "State Name,Obesity Rate%,Trump Vote %\n";
        assert!(matches!(
            DatasetImporter::from_reader(Cursor::new(csv), &resolver()),
            Err(LoadError::EmptyDataset)
        ));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = DatasetImporter::from_path("./does-not-exist.csv", &resolver())
            .expect_err("expected io error");

        match error {
            LoadError::Fetch { path, .. } => {
                assert_eq!(path, PathBuf::from("./does-not-exist.csv"))
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_fails_when_either_source_is_missing() {
        let existing = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let error = SourceBytes::fetch(existing, "./missing-topology.json")
            .await
            .expect_err("missing topology fails the barrier");
        assert!(matches!(
            error,
            LoadError::Fetch { ref path, .. } if path.ends_with("missing-topology.json")
        ));
    }
}
