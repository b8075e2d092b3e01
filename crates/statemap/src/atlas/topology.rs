use super::Feature;
use crate::dataset::RegionId;
use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("invalid topology document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topology has no object named '{0}'")]
    MissingObject(String),
    #[error("geometry references arc {index} but the topology only has {available} arcs")]
    ArcOutOfRange { index: i64, available: usize },
}

/// A TopoJSON document: shared arcs plus named geometry objects.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<QuantizeTransform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: BTreeMap<String, TopoGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuantizeTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl QuantizeTransform {
    fn apply(&self, x: f64, y: f64) -> Coord<f64> {
        Coord {
            x: x * self.scale[0] + self.translate[0],
            y: y * self.scale[1] + self.translate[1],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopoGeometry {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<RegionId>,
    #[serde(default)]
    pub properties: Option<GeometryProperties>,
    #[serde(flatten)]
    pub shape: Shape,
}

impl TopoGeometry {
    pub fn name(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.name.as_deref())
    }

    /// Direct children for a collection, or the geometry itself.
    pub fn members(&self) -> Vec<&TopoGeometry> {
        match &self.shape {
            Shape::GeometryCollection { geometries } => geometries.iter().collect(),
            _ => vec![self],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryProperties {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
    GeometryCollection { geometries: Vec<TopoGeometry> },
}

/// Ids appear as strings (`"01"`) in most atlases but plain numbers are legal too.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<RegionId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => RegionId::new(text),
        RawId::Number(number) => RegionId::new(number.to_string()),
    }))
}

impl Topology {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn object(&self, name: &str) -> Result<&TopoGeometry, TopologyError> {
        self.objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))
    }

    /// Absolute coordinates for every arc, undoing delta encoding when quantized.
    pub fn arc_table(&self) -> ArcTable {
        let arcs = self
            .arcs
            .iter()
            .map(|arc| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .map(|position| {
                        let (dx, dy) = xy(position);
                        match &self.transform {
                            Some(transform) => {
                                x += dx;
                                y += dy;
                                transform.apply(x, y)
                            }
                            None => Coord { x: dx, y: dy },
                        }
                    })
                    .collect()
            })
            .collect();
        ArcTable { arcs }
    }

    /// One feature per member of `object`, geometry fully stitched.
    pub fn features(&self, object: &TopoGeometry) -> Result<Vec<Feature>, TopologyError> {
        let table = self.arc_table();
        object
            .members()
            .into_iter()
            .map(|member| {
                Ok(Feature {
                    id: member.id.clone(),
                    name: member.name().map(str::to_string),
                    geometry: self.geometry(&table, &member.shape)?,
                })
            })
            .collect()
    }

    /// Every arc used by `object`, once each, as independent lines.
    pub fn mesh(&self, object: &TopoGeometry) -> Result<MultiLineString<f64>, TopologyError> {
        let table = self.arc_table();
        let mut used = BTreeSet::new();
        collect_arcs(&object.shape, &mut used);
        let lines = used
            .into_iter()
            .map(|index| table.arc(index as i64).map(|arc| LineString::from(arc.to_vec())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultiLineString(lines))
    }

    fn geometry(&self, table: &ArcTable, shape: &Shape) -> Result<Geometry<f64>, TopologyError> {
        Ok(match shape {
            Shape::Point { coordinates } => Geometry::Point(self.position(coordinates)),
            Shape::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint(
                coordinates
                    .iter()
                    .map(|position| self.position(position))
                    .collect(),
            )),
            Shape::LineString { arcs } => Geometry::LineString(LineString::from(table.line(arcs)?)),
            Shape::MultiLineString { arcs } => Geometry::MultiLineString(MultiLineString(
                arcs.iter()
                    .map(|line| table.line(line).map(LineString::from))
                    .collect::<Result<_, _>>()?,
            )),
            Shape::Polygon { arcs } => Geometry::Polygon(table.polygon(arcs)?),
            Shape::MultiPolygon { arcs } => Geometry::MultiPolygon(MultiPolygon(
                arcs.iter()
                    .map(|polygon| table.polygon(polygon))
                    .collect::<Result<_, _>>()?,
            )),
            Shape::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(GeometryCollection(
                    geometries
                        .iter()
                        .map(|child| self.geometry(table, &child.shape))
                        .collect::<Result<_, _>>()?,
                ))
            }
        })
    }

    fn position(&self, position: &[f64]) -> Point<f64> {
        let (x, y) = xy(position);
        match &self.transform {
            Some(transform) => Point::from(transform.apply(x, y)),
            None => Point::new(x, y),
        }
    }
}

fn xy(position: &[f64]) -> (f64, f64) {
    (
        position.first().copied().unwrap_or(0.0),
        position.get(1).copied().unwrap_or(0.0),
    )
}

/// Arc indices are stored one's-complemented when the arc runs backwards.
fn arc_index(index: i64) -> usize {
    if index < 0 {
        !index as usize
    } else {
        index as usize
    }
}

fn collect_arcs(shape: &Shape, used: &mut BTreeSet<usize>) {
    match shape {
        Shape::Point { .. } | Shape::MultiPoint { .. } => {}
        Shape::LineString { arcs } => used.extend(arcs.iter().copied().map(arc_index)),
        Shape::MultiLineString { arcs } | Shape::Polygon { arcs } => {
            used.extend(arcs.iter().flatten().copied().map(arc_index))
        }
        Shape::MultiPolygon { arcs } => {
            used.extend(arcs.iter().flatten().flatten().copied().map(arc_index))
        }
        Shape::GeometryCollection { geometries } => {
            for child in geometries {
                collect_arcs(&child.shape, used);
            }
        }
    }
}

/// Decoded arcs in absolute coordinates.
#[derive(Debug, Clone)]
pub struct ArcTable {
    arcs: Vec<Vec<Coord<f64>>>,
}

impl ArcTable {
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    fn arc(&self, index: i64) -> Result<&[Coord<f64>], TopologyError> {
        self.arcs
            .get(arc_index(index))
            .map(Vec::as_slice)
            .ok_or(TopologyError::ArcOutOfRange {
                index,
                available: self.arcs.len(),
            })
    }

    /// Join arcs end to end; consecutive arcs share their boundary point.
    pub fn line(&self, indices: &[i64]) -> Result<Vec<Coord<f64>>, TopologyError> {
        let mut points: Vec<Coord<f64>> = Vec::new();
        for &index in indices {
            let arc = self.arc(index)?;
            points.pop();
            let start = points.len();
            points.extend_from_slice(arc);
            if index < 0 {
                points[start..].reverse();
            }
        }
        Ok(points)
    }

    /// A closed ring, padded so degenerate rings still have four positions.
    pub fn ring(&self, indices: &[i64]) -> Result<Vec<Coord<f64>>, TopologyError> {
        let mut points = self.line(indices)?;
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    /// First ring is the exterior, the rest are holes.
    pub fn polygon(&self, rings: &[Vec<i64>]) -> Result<Polygon<f64>, TopologyError> {
        let mut rings = rings
            .iter()
            .map(|ring| self.ring(ring).map(LineString::from))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
        Ok(Polygon::new(exterior, rings.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantized() -> Topology {
        Topology::from_slice(
            br#"{
                "type": "Topology",
                "transform": {"scale": [2, 2], "translate": [10, 20]},
                "arcs": [
                    [[10, 0], [0, 10]],
                    [[10, 10], [-10, 0], [0, -10], [10, 0]],
                    [[10, 0], [10, 0], [0, 10], [-10, 0]]
                ],
                "objects": {
                    "states": {
                        "type": "GeometryCollection",
                        "geometries": [
                            {"type": "Polygon", "id": "01", "properties": {"name": "Alabama"}, "arcs": [[0, 1]]},
                            {"type": "Polygon", "id": 4, "properties": {"name": "Arizona"}, "arcs": [[2, -1]]}
                        ]
                    }
                }
            }"#,
        )
        .expect("topology parses")
    }

    #[test]
    fn arcs_are_delta_decoded_and_transformed() {
        let table = quantized().arc_table();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.arc(0).expect("arc 0"),
            &[Coord { x: 30.0, y: 20.0 }, Coord { x: 30.0, y: 40.0 }]
        );
        assert_eq!(table.arc(-1).expect("reversed arc 0").len(), 2);
    }

    #[test]
    fn rings_stitch_shared_and_reversed_arcs() {
        let topology = quantized();
        let states = topology.object("states").expect("states object");
        let features = topology.features(states).expect("features decode");

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, Some(RegionId::new("01")));
        assert_eq!(features[1].id, Some(RegionId::new("4")));
        assert_eq!(features[1].name.as_deref(), Some("Arizona"));

        match &features[1].geometry {
            Geometry::Polygon(polygon) => assert_eq!(
                polygon.exterior(),
                &LineString::from(vec![
                    (30.0, 20.0),
                    (50.0, 20.0),
                    (50.0, 40.0),
                    (30.0, 40.0),
                    (30.0, 20.0),
                ])
            ),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn decoded_features_are_planar_geometries() {
        use geo::Centroid;

        let topology = quantized();
        let states = topology.object("states").expect("states object");
        let centroids: Vec<(f64, f64)> = topology
            .features(states)
            .expect("features decode")
            .iter()
            .map(|feature| feature.geometry.centroid().expect("non-empty shape").x_y())
            .collect();
        assert_eq!(centroids, vec![(20.0, 30.0), (40.0, 30.0)]);
    }

    #[test]
    fn mesh_lists_each_arc_once() {
        let topology = quantized();
        let states = topology.object("states").expect("states object");
        let mesh = topology.mesh(states).expect("mesh decodes");
        assert_eq!(mesh.0.len(), 3);
        assert_eq!(mesh.0[0], LineString::from(vec![(30.0, 20.0), (30.0, 40.0)]));
    }

    #[test]
    fn missing_object_and_bad_arc_are_errors() {
        let topology = quantized();
        assert!(matches!(
            topology.object("counties"),
            Err(TopologyError::MissingObject(name)) if name == "counties"
        ));

        let table = topology.arc_table();
        assert!(matches!(
            table.line(&[7]),
            Err(TopologyError::ArcOutOfRange { index: 7, available: 3 })
        ));
    }
}
