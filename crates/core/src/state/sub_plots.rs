use cone_viewer_protocol::{EccentricityRange, Metadata, PlotData, SharedStr};

use super::generation::{Generation, GenerationCounter};
use crate::model::Filters;

/// Inputs of one sub-plots invocation: a filter selection without bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPlotQuery {
    filters: Filters,
}

impl SubPlotQuery {
    /// `None` when any input is missing or the cone-type set is empty.
    pub fn new(
        subject_id: Option<&str>,
        meridian: Option<&str>,
        cone_types: &[SharedStr],
    ) -> Option<Self> {
        let filters = Filters::new(subject_id?, meridian?, cone_types.iter().cloned()).ok()?;
        Some(Self { filters })
    }

    pub fn subject_id(&self) -> &str {
        self.filters.subject_id()
    }

    pub fn meridian(&self) -> &str {
        self.filters.meridian()
    }

    pub fn cone_types(&self) -> &[SharedStr] {
        self.filters.cone_types()
    }

    /// Filters for fetching one range's data and metadata.
    pub fn filters_for(&self, range: &EccentricityRange) -> Filters {
        self.filters.for_range(range)
    }
}

impl From<&Filters> for SubPlotQuery {
    fn from(filters: &Filters) -> Self {
        Self {
            filters: filters.clone().with_eccentricity(None, None),
        }
    }
}

/// One range's slot. Filled in place when its fetch settles.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPlotData {
    pub range: EccentricityRange,
    pub data: Option<PlotData>,
    pub metadata: Option<Metadata>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SubPlotData {
    fn placeholder(range: EccentricityRange) -> Self {
        Self {
            range,
            data: None,
            metadata: None,
            loading: true,
            error: None,
        }
    }
}

/// A per-range fetch the caller should issue: plot data and metadata
/// together, with these filters.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeJob {
    pub index: usize,
    pub filters: Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubPlotsPhase {
    /// Inputs incomplete.
    #[default]
    Idle,
    FetchingRanges,
    /// Ranges known; at least one range is still loading.
    FetchingData,
    /// Every range has settled.
    Ready,
    /// Zero ranges, or the ranges fetch failed.
    NoRanges,
}

/// Eccentricity sub-plots: ranges first, then one data+metadata fetch per
/// range, settled independently and in any order.
#[derive(Debug, Default)]
pub struct SubPlotsState {
    query: Option<SubPlotQuery>,
    phase: SubPlotsPhase,
    plots: Vec<SubPlotData>,
    selected: usize,
    generation: GenerationCounter,
}

impl SubPlotsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for new inputs. Returns the generation of the ranges
    /// fetch to issue, or `None` when the inputs are incomplete.
    pub fn begin(&mut self, query: Option<SubPlotQuery>) -> Option<Generation> {
        let generation = self.generation.advance();
        self.plots.clear();
        self.selected = 0;
        self.query = query;
        if self.query.is_some() {
            self.phase = SubPlotsPhase::FetchingRanges;
            Some(generation)
        } else {
            self.phase = SubPlotsPhase::Idle;
            None
        }
    }

    /// Accept the ranges list and create one loading placeholder per range.
    /// Returns the fetches to fan out; empty when stale or when there are
    /// no ranges.
    pub fn ranges_loaded(
        &mut self,
        generation: Generation,
        ranges: Vec<EccentricityRange>,
    ) -> Vec<RangeJob> {
        if !self.generation.is_current(generation) {
            return Vec::new();
        }
        let Some(query) = &self.query else {
            return Vec::new();
        };
        if ranges.is_empty() {
            self.phase = SubPlotsPhase::NoRanges;
            return Vec::new();
        }
        let jobs = ranges
            .iter()
            .enumerate()
            .map(|(index, range)| RangeJob {
                index,
                filters: query.filters_for(range),
            })
            .collect();
        self.plots = ranges.into_iter().map(SubPlotData::placeholder).collect();
        self.selected = 0;
        self.phase = SubPlotsPhase::FetchingData;
        jobs
    }

    /// The ranges fetch failed: show "no ranges found", do not retry.
    pub fn ranges_failed(&mut self, generation: Generation) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.plots.clear();
        self.phase = SubPlotsPhase::NoRanges;
        true
    }

    /// Fill slot `index` with its outcome. Returns `false` when the result
    /// was stale or the index unknown.
    pub fn range_settled(
        &mut self,
        generation: Generation,
        index: usize,
        result: Result<(PlotData, Metadata), String>,
    ) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        let Some(slot) = self.plots.get_mut(index) else {
            return false;
        };
        slot.loading = false;
        match result.and_then(|(data, metadata)| {
            data.validate().map_err(|e| e.to_string())?;
            Ok((data, metadata))
        }) {
            Ok((data, metadata)) => {
                slot.data = Some(data);
                slot.metadata = Some(metadata);
                slot.error = None;
            }
            Err(e) => {
                slot.data = None;
                slot.metadata = None;
                slot.error = Some(e);
            }
        }
        if self.plots.iter().all(|p| !p.loading) {
            self.phase = SubPlotsPhase::Ready;
        }
        true
    }

    pub fn phase(&self) -> SubPlotsPhase {
        self.phase
    }

    pub fn query(&self) -> Option<&SubPlotQuery> {
        self.query.as_ref()
    }

    /// True until the ranges fetch and every per-range fetch have settled.
    pub fn loading(&self) -> bool {
        matches!(
            self.phase,
            SubPlotsPhase::FetchingRanges | SubPlotsPhase::FetchingData
        )
    }

    pub fn plots(&self) -> &[SubPlotData] {
        &self.plots
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_plot(&self) -> Option<&SubPlotData> {
        self.plots.get(self.selected)
    }

    /// Select a range by index, clamped to the available sub-plots.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.plots.len().saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.select(self.selected.saturating_add(1));
    }

    pub fn prev(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    /// Select the sub-plot whose range has the given bounds, if present.
    pub fn select_range(&mut self, range: &EccentricityRange) -> bool {
        match self.plots.iter().position(|p| &p.range == range) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    /// "N eccentricity range(s) found".
    pub fn count_text(&self) -> String {
        let n = self.plots.len();
        let plural = if n == 1 { "" } else { "s" };
        format!("{n} eccentricity range{plural} found")
    }

    pub fn viewing_text(&self) -> String {
        let label = self
            .selected_plot()
            .map_or("Loading...", |p| p.range.label.as_str());
        format!("Viewing: {label}")
    }

    /// Whole-view placeholder, when there is nothing to page through.
    pub fn status_text(&self) -> Option<&'static str> {
        match self.phase {
            SubPlotsPhase::Idle => Some("Select a subject, meridian and cone types"),
            SubPlotsPhase::FetchingRanges => Some("Loading eccentricity ranges..."),
            SubPlotsPhase::NoRanges => Some("No eccentricity ranges found for the selected filters"),
            SubPlotsPhase::FetchingData | SubPlotsPhase::Ready => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> Option<SubPlotQuery> {
        SubPlotQuery::new(Some("S042"), Some("temporal"), &["L".into(), "M".into()])
    }

    fn ranges() -> Vec<EccentricityRange> {
        vec![
            EccentricityRange::new(0.0, 5.0, "0-5°"),
            EccentricityRange::new(5.0, 10.0, "5-10°"),
        ]
    }

    fn data() -> PlotData {
        PlotData {
            x: vec![1.0, 2.0],
            y: vec![3.0, 4.0],
            cone_type: vec!["L".into(), "M".into()],
        }
    }

    #[test]
    fn incomplete_inputs_stay_idle() {
        let mut state = SubPlotsState::new();
        assert!(SubPlotQuery::new(Some("S042"), Some("temporal"), &[]).is_none());
        assert!(state.begin(None).is_none());
        assert_eq!(state.phase(), SubPlotsPhase::Idle);
        assert!(!state.loading());
        assert!(state.plots().is_empty());
    }

    #[test]
    fn fans_out_one_job_per_range() {
        let mut state = SubPlotsState::new();
        let Some(generation) = state.begin(query()) else {
            unreachable!("complete query");
        };
        assert!(state.loading());
        let jobs = state.ranges_loaded(generation, ranges());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].index, 1);
        assert_eq!(jobs[1].filters.eccentricity_min(), Some(5.0));
        assert_eq!(jobs[1].filters.eccentricity_max(), Some(10.0));
        assert!(state.plots().iter().all(|p| p.loading));

        // Completion order does not matter.
        assert!(state.range_settled(generation, 1, Ok((data(), Metadata::default()))));
        assert!(state.loading());
        assert!(state.range_settled(generation, 0, Ok((data(), Metadata::default()))));
        assert!(!state.loading());
        assert_eq!(state.phase(), SubPlotsPhase::Ready);
        assert_eq!(state.selected_index(), 0);
        assert_eq!(state.viewing_text(), "Viewing: 0-5°");
        assert_eq!(state.count_text(), "2 eccentricity ranges found");
    }

    #[test]
    fn failure_is_isolated_to_its_range() {
        let mut state = SubPlotsState::new();
        let Some(generation) = state.begin(query()) else {
            unreachable!("complete query");
        };
        state.ranges_loaded(generation, ranges());
        state.range_settled(generation, 0, Err("HTTP 500".into()));
        state.range_settled(generation, 1, Ok((data(), Metadata::default())));
        let plots = state.plots();
        assert_eq!(plots[0].error.as_deref(), Some("HTTP 500"));
        assert!(plots[0].data.is_none());
        assert!(plots[1].data.is_some());
        assert!(plots[1].error.is_none());
        assert!(!state.loading());
    }

    #[test]
    fn mismatched_columns_become_a_range_error() {
        let mut state = SubPlotsState::new();
        let Some(generation) = state.begin(query()) else {
            unreachable!("complete query");
        };
        state.ranges_loaded(generation, ranges()[..1].to_vec());
        let mut bad = data();
        bad.y.pop();
        state.range_settled(generation, 0, Ok((bad, Metadata::default())));
        assert!(state.plots()[0].error.is_some());
        assert!(state.plots()[0].data.is_none());
    }

    #[test]
    fn empty_or_failed_ranges_end_in_no_ranges() {
        let mut state = SubPlotsState::new();
        let Some(generation) = state.begin(query()) else {
            unreachable!("complete query");
        };
        assert!(state.ranges_loaded(generation, Vec::new()).is_empty());
        assert_eq!(state.phase(), SubPlotsPhase::NoRanges);

        let Some(generation) = state.begin(query()) else {
            unreachable!("complete query");
        };
        assert!(state.ranges_failed(generation));
        assert_eq!(
            state.status_text(),
            Some("No eccentricity ranges found for the selected filters")
        );
        assert!(!state.loading());
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut state = SubPlotsState::new();
        let Some(old) = state.begin(query()) else {
            unreachable!("complete query");
        };
        state.ranges_loaded(old, ranges());
        let Some(new) = state.begin(query()) else {
            unreachable!("complete query");
        };
        assert!(!state.range_settled(old, 0, Ok((data(), Metadata::default()))));
        assert!(state.ranges_loaded(old, ranges()).is_empty());
        assert_eq!(state.phase(), SubPlotsPhase::FetchingRanges);
        assert_eq!(state.ranges_loaded(new, ranges()).len(), 2);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut state = SubPlotsState::new();
        let Some(generation) = state.begin(query()) else {
            unreachable!("complete query");
        };
        state.ranges_loaded(generation, ranges());
        state.prev();
        assert_eq!(state.selected_index(), 0);
        state.next();
        state.next();
        assert_eq!(state.selected_index(), 1);
        state.select(7);
        assert_eq!(state.selected_index(), 1);
        assert!(state.select_range(&EccentricityRange::new(0.0, 5.0, "")));
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn query_from_filters_drops_bounds() {
        let Ok(filters) = Filters::new("S001", "Nasal", ["S"]) else {
            unreachable!("complete filters");
        };
        let query = SubPlotQuery::from(&filters.with_eccentricity(Some(1.0), Some(2.0)));
        let ranged = query.filters_for(&EccentricityRange::new(3.0, 4.0, "3-4°"));
        assert_eq!(ranged.eccentricity_min(), Some(3.0));
        assert_eq!(query.subject_id(), "S001");
    }
}
