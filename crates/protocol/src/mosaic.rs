//! Cone mosaic data as served by the backend.
//!
//! ```text
//!   /patients ─────────────▶ Patient[]
//!   /eccentricity-ranges ──▶ RangesResponse ──▶ EccentricityRange[]
//!   /plot-data ────────────▶ PlotData  ─┐
//!   /metadata ─────────────▶ Metadata  ─┴─▶ views ──▶ RenderCommand[]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::shared_str::SharedStr;

/// Label given to cones the backend sends without a spectral type.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Column-oriented cone positions: element `i` of each vector describes
/// one cone.
///
/// The backend sorts missing positions last and sends them as `null`; those
/// decode to NaN and are left out of the plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// X position in microns.
    #[serde(deserialize_with = "nullable_coords")]
    pub x: Vec<f64>,
    /// Y position in microns.
    #[serde(deserialize_with = "nullable_coords")]
    pub y: Vec<f64>,
    /// Spectral type label (`"L"`, `"M"`, `"S"`, or anything else the backend stores).
    #[serde(deserialize_with = "nullable_labels")]
    pub cone_type: Vec<SharedStr>,
}

fn nullable_coords<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn nullable_labels<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<SharedStr>, D::Error> {
    let values: Vec<Option<SharedStr>> = Vec::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| SharedStr::from(UNCLASSIFIED)))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotDataError {
    #[error("column lengths differ: x={x}, y={y}, cone_type={cone_type}")]
    LengthMismatch {
        x: usize,
        y: usize,
        cone_type: usize,
    },
}

impl PlotData {
    /// Number of cones. Only meaningful once [`PlotData::validate`] passed.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Check that the three columns line up.
    pub fn validate(&self) -> Result<(), PlotDataError> {
        if self.x.len() == self.y.len() && self.x.len() == self.cone_type.len() {
            Ok(())
        } else {
            Err(PlotDataError::LengthMismatch {
                x: self.x.len(),
                y: self.y.len(),
                cone_type: self.cone_type.len(),
            })
        }
    }

    /// Iterate `(x, y, cone_type)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, &SharedStr)> {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.cone_type)
            .map(|((x, y), t)| (*x, *y, t))
    }
}

/// Descriptive fields for the sampled eye. Every field is optional; the
/// backend only includes what it has. Counts are stored as REAL columns and
/// arrive as floats (`152.0`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lm_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scones: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcone_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcone_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scone_density: Option<f64>,
    /// Total cones for the subject/meridian, regardless of filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numcones: Option<f64>,
    /// Cones matching the active filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_total_cones: Option<f64>,
}

/// Which eye a record belongs to, in clinical notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eye {
    /// Oculus dexter.
    #[serde(rename = "OD")]
    Right,
    /// Oculus sinister.
    #[serde(rename = "OS")]
    Left,
}

impl Eye {
    /// One-letter suffix appended to a subject id to form a display id.
    pub fn suffix(self) -> char {
        match self {
            Self::Right => 'R',
            Self::Left => 'L',
        }
    }

    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Right),
            'L' => Some(Self::Left),
            _ => None,
        }
    }
}

impl std::fmt::Display for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Right => write!(f, "OD"),
            Self::Left => write!(f, "OS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub subject_id: String,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<Eye>,
}

impl Patient {
    /// Subject id with the eye suffix appended when the eye is known.
    pub fn display_id(&self) -> String {
        match self.eye {
            Some(eye) => format!("{}{}", self.subject_id, eye.suffix()),
            None => self.subject_id.clone(),
        }
    }
}

/// An angular bin in degrees of eccentricity.
///
/// Two ranges are the same range when their bounds match; the label is
/// presentation only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EccentricityRange {
    pub min: f64,
    pub max: f64,
    pub label: SharedStr,
}

impl EccentricityRange {
    pub fn new(min: f64, max: f64, label: impl Into<SharedStr>) -> Self {
        Self {
            min,
            max,
            label: label.into(),
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl PartialEq for EccentricityRange {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max
    }
}

/// Body of `/eccentricity-ranges`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangesResponse {
    pub ranges: Vec<EccentricityRange>,
}
