use cone_viewer_protocol::{EccentricityRange, SharedStr};
use serde::Serialize;
use thiserror::Error;

/// Why a selection cannot be turned into [`Filters`] yet.
///
/// This is a gating condition, not a failure: the viewer simply waits for
/// more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("no subject selected")]
    MissingSubject,
    #[error("no meridian selected")]
    MissingMeridian,
    #[error("no cone types selected")]
    NoConeTypes,
}

/// A complete, normalized filter selection.
///
/// `subject_id` is always the bare id (never the eye-suffixed display form).
/// Only constructible through [`Filters::new`], so every value in
/// circulation has a subject, a meridian, and at least one cone type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filters {
    subject_id: String,
    meridian: String,
    cone_types: Vec<SharedStr>,
    eccentricity_min: Option<f64>,
    eccentricity_max: Option<f64>,
}

impl Filters {
    pub fn new(
        subject_id: impl Into<String>,
        meridian: impl Into<String>,
        cone_types: impl IntoIterator<Item = impl Into<SharedStr>>,
    ) -> Result<Self, FilterError> {
        let subject_id = subject_id.into();
        let meridian = meridian.into();
        let cone_types: Vec<SharedStr> = cone_types.into_iter().map(Into::into).collect();
        if subject_id.trim().is_empty() {
            return Err(FilterError::MissingSubject);
        }
        if meridian.trim().is_empty() {
            return Err(FilterError::MissingMeridian);
        }
        if cone_types.is_empty() {
            return Err(FilterError::NoConeTypes);
        }
        Ok(Self {
            subject_id,
            meridian,
            cone_types,
            eccentricity_min: None,
            eccentricity_max: None,
        })
    }

    /// Set the eccentricity bounds. Non-finite values (an emptied numeric
    /// input) count as unset.
    pub fn with_eccentricity(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.eccentricity_min = min.filter(|v| v.is_finite());
        self.eccentricity_max = max.filter(|v| v.is_finite());
        self
    }

    /// The same selection restricted to one eccentricity bin.
    pub fn for_range(&self, range: &EccentricityRange) -> Self {
        self.clone()
            .with_eccentricity(Some(range.min), Some(range.max))
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn meridian(&self) -> &str {
        &self.meridian
    }

    pub fn cone_types(&self) -> &[SharedStr] {
        &self.cone_types
    }

    pub fn eccentricity_min(&self) -> Option<f64> {
        self.eccentricity_min
    }

    pub fn eccentricity_max(&self) -> Option<f64> {
        self.eccentricity_max
    }

    /// Query parameters shared by `/plot-data`, `/metadata` and
    /// `/cones/export`: cone types repeat under one key and bounds are only
    /// present when set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4 + self.cone_types.len());
        pairs.push(("subject_id", self.subject_id.clone()));
        pairs.push(("meridian", self.meridian.clone()));
        for t in &self.cone_types {
            pairs.push(("cone_spectral_type", t.to_string()));
        }
        if let Some(min) = self.eccentricity_min {
            pairs.push(("eccentricity_min", min.to_string()));
        }
        if let Some(max) = self.eccentricity_max {
            pairs.push(("eccentricity_max", max.to_string()));
        }
        pairs
    }
}
