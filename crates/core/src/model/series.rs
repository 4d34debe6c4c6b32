use std::collections::HashMap;

use cone_viewer_protocol::{PlotData, SharedStr, ThemeToken};

use super::cone_type::cone_token;

/// Padding added beyond the data extent on each axis, in data units (µm).
pub const AXIS_MARGIN: f64 = 2.0;

/// One scatter series: every cone of a single spectral type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConeSeries {
    pub cone_type: SharedStr,
    pub color: ThemeToken,
    /// Row indices into the source [`PlotData`], ascending.
    pub indices: Vec<usize>,
}

impl ConeSeries {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn points<'a>(&'a self, data: &'a PlotData) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.indices.iter().map(|&i| (data.x[i], data.y[i]))
    }
}

/// Partition cone rows by spectral type.
///
/// Series come out in order of first appearance, and every row index lands
/// in exactly one series. Rows beyond the shortest column are ignored, so a
/// malformed payload cannot index out of bounds.
pub fn group_by_cone_type(data: &PlotData) -> Vec<ConeSeries> {
    let n = data.x.len().min(data.y.len()).min(data.cone_type.len());
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<ConeSeries> = Vec::new();

    for (i, cone_type) in data.cone_type.iter().take(n).enumerate() {
        let idx = *slot.entry(cone_type.as_str()).or_insert_with(|| {
            series.push(ConeSeries {
                cone_type: cone_type.clone(),
                color: cone_token(cone_type),
                indices: Vec::new(),
            });
            series.len() - 1
        });
        series[idx].indices.push(i);
    }
    series
}

/// A closed axis interval in data units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn padded(values: &[f64]) -> Option<Self> {
        let (lo, hi) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        (lo <= hi).then(|| Self {
            min: lo - AXIS_MARGIN,
            max: hi + AXIS_MARGIN,
        })
    }
}

/// `[min - 2, max + 2]` on each axis, or `None` when there is nothing to
/// plot.
pub fn axis_ranges(data: &PlotData) -> Option<(AxisRange, AxisRange)> {
    Some((AxisRange::padded(&data.x)?, AxisRange::padded(&data.y)?))
}
