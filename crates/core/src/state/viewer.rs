use cone_viewer_protocol::{Metadata, PlotData};

use super::filter_bar::FilterMode;
use super::generation::{Generation, GenerationCounter};
use super::sub_plots::SubPlotQuery;
use crate::model::{DisplayId, Filters};

/// Which composition the root is showing. Mirrors the filter bar mode.
pub type ViewMode = FilterMode;

/// What the caller should do after the filters changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// Fetch plot data and metadata together; apply both or neither.
    FetchSingle {
        generation: Generation,
        filters: Filters,
    },
    /// Hand the selection to the sub-plots machine, which fetches on its own.
    ForwardToSubPlots(SubPlotQuery),
}

/// The single-dataset view's current content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleView {
    pub data: Option<PlotData>,
    pub metadata: Option<Metadata>,
    pub loading: bool,
    pub error: Option<String>,
}

/// A CSV export to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub filters: Filters,
    /// The eye-suffixed form, used for file naming.
    pub display_id: String,
}

/// Root application state: routes filter changes to one of the two
/// compositions and holds the latest selection for downloads.
#[derive(Debug, Default)]
pub struct ViewerState {
    mode: ViewMode,
    filters: Option<Filters>,
    single: SingleView,
    generation: GenerationCounter,
    notice: Option<String>,
}

impl ViewerState {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch composition. Any in-flight single fetch is invalidated and
    /// its view emptied.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.generation.advance();
        self.single = SingleView::default();
    }

    pub fn filters_changed(&mut self, filters: Filters) -> ViewerAction {
        self.filters = Some(filters.clone());
        match self.mode {
            FilterMode::Single => {
                let generation = self.generation.advance();
                self.single.loading = true;
                ViewerAction::FetchSingle {
                    generation,
                    filters,
                }
            }
            FilterMode::MultiRange => ViewerAction::ForwardToSubPlots(SubPlotQuery::from(&filters)),
        }
    }

    /// Apply a joint data+metadata outcome. On failure both are cleared
    /// rather than leaving the previous selection's plot up.
    pub fn single_loaded(
        &mut self,
        generation: Generation,
        result: Result<(PlotData, Metadata), String>,
    ) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        let result = result.and_then(|(data, metadata)| {
            data.validate().map_err(|e| e.to_string())?;
            Ok((data, metadata))
        });
        self.single = match result {
            Ok((data, metadata)) => SingleView {
                data: Some(data),
                metadata: Some(metadata),
                loading: false,
                error: None,
            },
            Err(e) => SingleView {
                error: Some(e),
                ..SingleView::default()
            },
        };
        true
    }

    pub fn single(&self) -> &SingleView {
        &self.single
    }

    pub fn filters(&self) -> Option<&Filters> {
        self.filters.as_ref()
    }

    pub fn can_download(&self) -> bool {
        self.filters.is_some()
    }

    /// The export to run for the held selection, or `None` before any
    /// selection exists.
    pub fn download_request(&self, display_id: &DisplayId) -> Option<DownloadRequest> {
        Some(DownloadRequest {
            filters: self.filters.clone()?,
            display_id: display_id.to_string(),
        })
    }

    /// A user-visible message, e.g. a failed download.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use cone_viewer_protocol::Eye;

    use super::*;

    fn filters() -> Filters {
        let Ok(f) = Filters::new("S001", "Temporal", ["L"]) else {
            unreachable!("complete filters");
        };
        f.with_eccentricity(Some(1.0), None)
    }

    fn data() -> PlotData {
        PlotData {
            x: vec![0.0],
            y: vec![0.0],
            cone_type: vec!["L".into()],
        }
    }

    #[test]
    fn single_mode_fetches_jointly() {
        let mut viewer = ViewerState::new(ViewMode::Single);
        let ViewerAction::FetchSingle { generation, filters } = viewer.filters_changed(filters())
        else {
            unreachable!("single mode fetches directly");
        };
        assert_eq!(filters.eccentricity_min(), Some(1.0));
        assert!(viewer.single().loading);
        assert!(viewer.single_loaded(generation, Ok((data(), Metadata::default()))));
        assert!(viewer.single().data.is_some());
        assert!(!viewer.single().loading);
    }

    #[test]
    fn failure_clears_both() {
        let mut viewer = ViewerState::new(ViewMode::Single);
        let ViewerAction::FetchSingle { generation, .. } = viewer.filters_changed(filters()) else {
            unreachable!("single mode fetches directly");
        };
        viewer.single_loaded(generation, Ok((data(), Metadata::default())));
        let ViewerAction::FetchSingle { generation, .. } = viewer.filters_changed(filters()) else {
            unreachable!("single mode fetches directly");
        };
        viewer.single_loaded(generation, Err("HTTP 404".into()));
        assert!(viewer.single().data.is_none());
        assert!(viewer.single().metadata.is_none());
        assert_eq!(viewer.single().error.as_deref(), Some("HTTP 404"));
    }

    #[test]
    fn late_response_does_not_overwrite() {
        let mut viewer = ViewerState::new(ViewMode::Single);
        let ViewerAction::FetchSingle { generation: old, .. } = viewer.filters_changed(filters())
        else {
            unreachable!("single mode fetches directly");
        };
        let ViewerAction::FetchSingle { generation: new, .. } = viewer.filters_changed(filters())
        else {
            unreachable!("single mode fetches directly");
        };
        assert!(!viewer.single_loaded(old, Ok((data(), Metadata::default()))));
        assert!(viewer.single().loading);
        assert!(viewer.single_loaded(new, Err("boom".into())));
    }

    #[test]
    fn multi_range_forwards_without_bounds() {
        let mut viewer = ViewerState::new(ViewMode::MultiRange);
        let ViewerAction::ForwardToSubPlots(query) = viewer.filters_changed(filters()) else {
            unreachable!("multi-range forwards");
        };
        assert_eq!(query.subject_id(), "S001");
        assert!(viewer.can_download());
    }

    #[test]
    fn download_uses_display_id() {
        let mut viewer = ViewerState::new(ViewMode::Single);
        let id = DisplayId::new("S001", Some(Eye::Right));
        assert!(viewer.download_request(&id).is_none());
        viewer.filters_changed(filters());
        let Some(req) = viewer.download_request(&id) else {
            unreachable!("filters held");
        };
        assert_eq!(req.display_id, "S001R");
        assert_eq!(req.filters.subject_id(), "S001");
    }
}
