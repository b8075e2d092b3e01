use super::RegionId;
use crate::atlas::TopoGeometry;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no geometry named '{name}' in the topology")]
pub struct ResolutionError {
    pub name: String,
}

/// Maps display names to geometry ids by exact, case-sensitive equality.
///
/// The index is built once per topology; when two descriptors share a name
/// the first one wins.
#[derive(Debug, Clone, Default)]
pub struct IdentifierResolver {
    index: HashMap<String, RegionId>,
}

impl IdentifierResolver {
    pub fn from_descriptors<'a, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a RegionId)>,
    {
        let mut index = HashMap::new();
        for (name, id) in descriptors {
            index
                .entry(name.to_string())
                .or_insert_with(|| id.clone());
        }
        Self { index }
    }

    /// Index every named, identified member of a topology object.
    pub fn from_object(object: &TopoGeometry) -> Self {
        Self::from_descriptors(
            object
                .members()
                .into_iter()
                .filter_map(|member| Some((member.name()?, member.id.as_ref()?))),
        )
    }

    pub fn resolve(&self, name: &str) -> Result<RegionId, ResolutionError> {
        self.index
            .get(name)
            .cloned()
            .ok_or_else(|| ResolutionError {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
