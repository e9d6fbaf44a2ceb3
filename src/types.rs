use geo::{MultiLineString, MultiPolygon};
use serde::{Deserialize, Serialize};

/// One row of the education dataset: bachelor's-degree-or-higher
/// percentage for a single US county.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EducationRecord {
    pub fips: u32,
    pub state: String,
    pub area_name: String,
    #[serde(rename = "bachelorsOrHigher")]
    pub bachelors_or_higher: f64,
}

/// County geometry decoded from the topology, keyed by fips code.
#[derive(Debug, Clone)]
pub struct CountyShape {
    pub fips: u32,
    pub geometry: MultiPolygon<f64>,
}

/// A county joined with its education record and resolved fill color,
/// ready to draw.
#[derive(Debug, Clone)]
pub struct CountyDatum {
    pub fips: u32,
    pub area_name: String,
    pub state: String,
    pub percent: f64,
    pub color: &'static str,
    pub geometry: MultiPolygon<f64>,
}

/// Interior state borders (edges where two distinct states meet),
/// drawn as a single unfilled outline layer above the counties.
#[derive(Debug, Clone)]
pub struct StateMesh(pub MultiLineString<f64>);
