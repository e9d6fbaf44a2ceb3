//! Decoding of the topology document: delta-encoded arcs, county
//! polygon assembly, and the interior state border mesh.

use crate::types::{CountyShape, StateMesh};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("topology has no object named '{0}'")]
    MissingObject(String),
    #[error("arc index {0} out of bounds ({1} arcs in topology)")]
    ArcOutOfBounds(i64, usize),
    #[error("arc contains a point with fewer than two coordinates")]
    MalformedArc,
    #[error("geometry in '{0}' has no id")]
    MissingId(String),
    #[error("geometry id {0} does not fit a fips code")]
    InvalidId(u64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: HashMap<String, TopoObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoObject {
    GeometryCollection { geometries: Vec<TopoGeometry> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    Polygon {
        #[serde(default)]
        id: Option<u64>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<u64>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    #[serde(other)]
    Unsupported,
}

impl TopoGeometry {
    /// All arc rings of the geometry, hole rings included.
    fn rings(&self) -> Box<dyn Iterator<Item = &Vec<i64>> + '_> {
        match self {
            TopoGeometry::Polygon { arcs, .. } => Box::new(arcs.iter()),
            TopoGeometry::MultiPolygon { arcs, .. } => Box::new(arcs.iter().flatten()),
            TopoGeometry::Unsupported => Box::new(std::iter::empty()),
        }
    }
}

impl Topology {
    /// Resolve every arc to absolute planar coordinates. Quantized
    /// topologies store cumulative deltas scaled by the transform.
    pub fn decode_arcs(&self) -> Result<Vec<Vec<Coord<f64>>>, TopologyError> {
        self.arcs
            .iter()
            .map(|arc| {
                let mut out = Vec::with_capacity(arc.len());
                let (mut x, mut y) = (0.0, 0.0);
                for point in arc {
                    let (dx, dy) = match (point.first(), point.get(1)) {
                        (Some(&dx), Some(&dy)) => (dx, dy),
                        _ => return Err(TopologyError::MalformedArc),
                    };
                    match &self.transform {
                        Some(t) => {
                            x += dx;
                            y += dy;
                            out.push(Coord {
                                x: x * t.scale[0] + t.translate[0],
                                y: y * t.scale[1] + t.translate[1],
                            });
                        }
                        None => out.push(Coord { x: dx, y: dy }),
                    }
                }
                Ok(out)
            })
            .collect()
    }

    fn collection(&self, name: &str) -> Result<&[TopoGeometry], TopologyError> {
        match self.objects.get(name) {
            Some(TopoObject::GeometryCollection { geometries }) => Ok(geometries),
            _ => Err(TopologyError::MissingObject(name.to_string())),
        }
    }
}

/// Decode the `counties` object into per-county multipolygons keyed
/// by fips code. Non-polygon geometries are skipped.
pub fn counties(topology: &Topology) -> Result<Vec<CountyShape>, TopologyError> {
    let decoded = topology.decode_arcs()?;
    let mut shapes = Vec::new();
    for geometry in topology.collection("counties")? {
        let id = match geometry {
            TopoGeometry::Polygon { id, .. } | TopoGeometry::MultiPolygon { id, .. } => {
                id.ok_or_else(|| TopologyError::MissingId("counties".to_string()))?
            }
            TopoGeometry::Unsupported => continue,
        };
        let fips = u32::try_from(id).map_err(|_| TopologyError::InvalidId(id))?;
        let multi = match geometry {
            TopoGeometry::Polygon { arcs, .. } => {
                MultiPolygon::new(vec![assemble_polygon(arcs, &decoded)?])
            }
            TopoGeometry::MultiPolygon { arcs, .. } => MultiPolygon::new(
                arcs.iter()
                    .map(|rings| assemble_polygon(rings, &decoded))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            TopoGeometry::Unsupported => continue,
        };
        shapes.push(CountyShape {
            fips,
            geometry: multi,
        });
    }
    Ok(shapes)
}

/// Derive the interior state borders: every arc referenced by two
/// distinct state geometries, as one line each.
pub fn state_mesh(topology: &Topology) -> Result<StateMesh, TopologyError> {
    let decoded = topology.decode_arcs()?;
    let geometries = topology.collection("states")?;

    let mut users: HashMap<usize, Vec<usize>> = HashMap::new();
    for (ordinal, geometry) in geometries.iter().enumerate() {
        for ring in geometry.rings() {
            for &index in ring {
                let arc = resolve_index(index, decoded.len())?;
                let entry = users.entry(arc).or_default();
                if !entry.contains(&ordinal) {
                    entry.push(ordinal);
                }
            }
        }
    }

    let mut lines = Vec::new();
    for (arc, coords) in decoded.iter().enumerate() {
        if users.get(&arc).map_or(false, |geoms| geoms.len() >= 2) {
            lines.push(LineString::from(coords.clone()));
        }
    }
    Ok(StateMesh(MultiLineString::new(lines)))
}

/// A negative arc index `~i` references arc `i` reversed.
fn resolve_index(index: i64, arc_count: usize) -> Result<usize, TopologyError> {
    let arc = if index < 0 { !index } else { index } as usize;
    if arc >= arc_count {
        return Err(TopologyError::ArcOutOfBounds(index, arc_count));
    }
    Ok(arc)
}

fn assemble_ring(
    ring: &[i64],
    decoded: &[Vec<Coord<f64>>],
) -> Result<LineString<f64>, TopologyError> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for &index in ring {
        let arc = &decoded[resolve_index(index, decoded.len())?];
        let append = |points: &mut Vec<Coord<f64>>, coord: &Coord<f64>| {
            // consecutive arcs share their junction point
            if points.last() != Some(coord) {
                points.push(*coord);
            }
        };
        if index < 0 {
            for coord in arc.iter().rev() {
                append(&mut points, coord);
            }
        } else {
            for coord in arc.iter() {
                append(&mut points, coord);
            }
        }
    }
    Ok(LineString::from(points))
}

fn assemble_polygon(
    rings: &[Vec<i64>],
    decoded: &[Vec<Coord<f64>>],
) -> Result<Polygon<f64>, TopologyError> {
    let mut assembled = rings
        .iter()
        .map(|ring| assemble_ring(ring, decoded))
        .collect::<Result<Vec<_>, _>>()?;
    if assembled.is_empty() {
        return Ok(Polygon::new(LineString::new(Vec::new()), Vec::new()));
    }
    let exterior = assembled.remove(0);
    Ok(Polygon::new(exterior, assembled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Two unit squares sharing the edge x=1: county 1 on the left,
    /// county 2 on the right. The shared edge is arc 0.
    fn two_squares() -> Topology {
        let doc = json!({
            "type": "Topology",
            "arcs": [
                [[1, 0], [0, 1]],
                [[1, 1], [-1, 0], [0, -1], [1, 0]],
                [[1, 0], [1, 0], [0, 1], [-1, 0]]
            ],
            "transform": { "scale": [1.0, 1.0], "translate": [0.0, 0.0] },
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": 1, "arcs": [[0, 1]] },
                        { "type": "Polygon", "id": 2, "arcs": [[-1, 2]] }
                    ]
                },
                "states": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": 10, "arcs": [[0, 1]] },
                        { "type": "Polygon", "id": 20, "arcs": [[-1, 2]] }
                    ]
                }
            }
        });
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn decodes_delta_encoded_arcs() {
        let topology = two_squares();
        let decoded = topology.decode_arcs().unwrap();
        assert_eq!(decoded[0], vec![Coord { x: 1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]);
        assert_eq!(
            decoded[1],
            vec![
                Coord { x: 1.0, y: 1.0 },
                Coord { x: 0.0, y: 1.0 },
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 }
            ]
        );
    }

    #[test]
    fn transform_scales_and_translates() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[2, 0], [0, 2]]],
            "transform": { "scale": [0.5, 0.5], "translate": [10.0, 20.0] },
            "objects": {}
        });
        let topology: Topology = serde_json::from_value(doc).unwrap();
        let decoded = topology.decode_arcs().unwrap();
        assert_eq!(
            decoded[0],
            vec![Coord { x: 11.0, y: 20.0 }, Coord { x: 11.0, y: 21.0 }]
        );
    }

    #[test]
    fn untransformed_arcs_are_absolute() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[3.5, 4.5], [5.0, 6.0]]],
            "objects": {}
        });
        let topology: Topology = serde_json::from_value(doc).unwrap();
        let decoded = topology.decode_arcs().unwrap();
        assert_eq!(
            decoded[0],
            vec![Coord { x: 3.5, y: 4.5 }, Coord { x: 5.0, y: 6.0 }]
        );
    }

    #[test]
    fn assembles_closed_county_rings() {
        let topology = two_squares();
        let shapes = counties(&topology).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].fips, 1);
        assert_eq!(shapes[1].fips, 2);

        for shape in &shapes {
            let exterior = shapes_exterior(shape);
            assert_eq!(exterior.0.len(), 5);
            assert_eq!(exterior.0.first(), exterior.0.last());
        }

        // the reversed shared arc still produces a well-formed ring
        let right = shapes_exterior(&shapes[1]);
        assert!(right.0.contains(&Coord { x: 2.0, y: 1.0 }));
    }

    fn shapes_exterior(shape: &crate::types::CountyShape) -> LineString<f64> {
        shape.geometry.0[0].exterior().clone()
    }

    #[test]
    fn mesh_keeps_only_shared_arcs() {
        let topology = two_squares();
        let mesh = state_mesh(&topology).unwrap();
        assert_eq!(mesh.0 .0.len(), 1);
        assert_eq!(
            mesh.0 .0[0],
            LineString::from(vec![Coord { x: 1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }])
        );
    }

    #[test]
    fn missing_object_is_a_named_error() {
        let doc = json!({ "type": "Topology", "arcs": [], "objects": {} });
        let topology: Topology = serde_json::from_value(doc).unwrap();
        let err = counties(&topology).unwrap_err();
        assert!(matches!(err, TopologyError::MissingObject(name) if name == "counties"));
    }

    #[test]
    fn arc_index_out_of_bounds_is_reported() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[0, 0], [1, 1]]],
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [{ "type": "Polygon", "id": 1, "arcs": [[7]] }]
                }
            }
        });
        let topology: Topology = serde_json::from_value(doc).unwrap();
        assert!(matches!(
            counties(&topology).unwrap_err(),
            TopologyError::ArcOutOfBounds(7, 1)
        ));
    }

    #[test]
    fn oversized_id_is_rejected() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[1, 0], [0, 1]], [[1, 1], [-1, 0], [0, -1], [1, 0]]],
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": 5_000_000_000u64, "arcs": [[0, 1]] }
                    ]
                }
            }
        });
        let topology: Topology = serde_json::from_value(doc).unwrap();
        assert!(matches!(
            counties(&topology).unwrap_err(),
            TopologyError::InvalidId(5_000_000_000)
        ));
    }

    #[test]
    fn non_polygon_geometries_are_skipped() {
        let doc = json!({
            "type": "Topology",
            "arcs": [[[1, 0], [0, 1]], [[1, 1], [-1, 0], [0, -1], [1, 0]]],
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Point", "coordinates": [0, 0] },
                        { "type": "Polygon", "id": 5, "arcs": [[0, 1]] }
                    ]
                }
            }
        });
        let topology: Topology = serde_json::from_value(doc).unwrap();
        let shapes = counties(&topology).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].fips, 5);
    }
}
