//! JSON bodies exchanged with the elevation profile service.
//!
//! Request:
//!
//! ```json
//! {"type":"LineString","coordinates":[[4468000,5333000],[4468000,5333020]]}
//! ```
//!
//! Response:
//!
//! ```json
//! {"heights":[{"dist":0.0,"alts":{"COMB":512.3,"DTM25":512.0},"easting":4468000.0,"northing":5333000.0}]}
//! ```
//!
//! Records are matched to requested points by position. The echoed
//! `dist`/`easting`/`northing` are kept as raw JSON for diagnostics only, so
//! an odd value in one of them never rejects the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `LineString` geometry listing the points to sample, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRequest {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<[i64; 2]>,
}

impl GridRequest {
    pub const LINE_STRING: &'static str = "LineString";

    /// Build a request from `(easting, northing)` pairs.
    pub fn line_string(coordinates: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self {
            geometry_type: Self::LINE_STRING.to_string(),
            coordinates: coordinates.into_iter().map(|(e, n)| [e, n]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Serialize to the JSON body sent to the service.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Altitude values of one sample. Only the combined model is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Altitudes {
    #[serde(rename = "COMB", default)]
    pub comb: Option<f32>,
}

/// One sample along the requested path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeightPoint {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub dist: Value,
    #[serde(default)]
    pub alts: Option<Altitudes>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub easting: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub northing: Value,
}

impl HeightPoint {
    /// Distance along the path, if the service sent a number.
    pub fn distance(&self) -> Option<f64> {
        self.dist.as_f64()
    }

    /// The combined altitude, or 0 when the service left it out.
    pub fn altitude(&self) -> f32 {
        self.alts.as_ref().and_then(|a| a.comb).unwrap_or(0.0)
    }
}

/// Profile service answer. A missing or `null` `heights` key means no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridResponse {
    #[serde(default)]
    pub heights: Option<Vec<HeightPoint>>,
}

impl GridResponse {
    /// Decode a response body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Response carrying the given altitudes, in order.
    pub fn from_altitudes(altitudes: impl IntoIterator<Item = f32>) -> Self {
        let heights = altitudes
            .into_iter()
            .map(|alt| HeightPoint {
                alts: Some(Altitudes { comb: Some(alt) }),
                ..Default::default()
            })
            .collect();
        Self {
            heights: Some(heights),
        }
    }

    /// Returned samples; empty when the service sent none.
    pub fn records(&self) -> &[HeightPoint] {
        self.heights.as_deref().unwrap_or(&[])
    }
}
