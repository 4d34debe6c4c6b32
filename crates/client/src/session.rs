//! A running viewer: the four state machines plus the tasks that feed them.

use std::path::PathBuf;
use std::sync::Arc;

use cone_viewer_core::model::Filters;
use cone_viewer_core::state::{
    FilterBarState, FilterMode, RangeSelectorState, SubPlotsState, ViewerAction, ViewerState,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::ConeApi;
use crate::controller::{self, Notify};
use crate::export::{download_notice, download_to};

/// Shared handles to one viewer's state.
///
/// Front-ends lock a machine to read it for drawing and go through the
/// session for anything that needs the backend. All spawned work runs on
/// `runtime`; `notify` fires whenever a task applied a result.
#[derive(Clone)]
pub struct ViewerSession {
    api: Arc<dyn ConeApi>,
    runtime: Handle,
    notify: Arc<Notify>,
    pub filter_bar: Arc<Mutex<FilterBarState>>,
    pub range_selector: Arc<Mutex<RangeSelectorState>>,
    pub sub_plots: Arc<Mutex<SubPlotsState>>,
    pub viewer: Arc<Mutex<ViewerState>>,
}

impl ViewerSession {
    pub fn new(api: Arc<dyn ConeApi>, runtime: Handle, mode: FilterMode, display_ids: bool) -> Self {
        Self {
            api,
            runtime,
            notify: Arc::new(|| {}),
            filter_bar: Arc::new(Mutex::new(FilterBarState::new(mode, display_ids))),
            range_selector: Arc::new(Mutex::new(RangeSelectorState::new())),
            sub_plots: Arc::new(Mutex::new(SubPlotsState::new())),
            viewer: Arc::new(Mutex::new(ViewerState::new(mode))),
        }
    }

    /// Called after each applied result, typically to request a repaint.
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Arc::new(notify);
        self
    }

    pub fn api(&self) -> &Arc<dyn ConeApi> {
        &self.api
    }

    /// Fetch the patient list. Call once when the viewer appears.
    pub fn mount(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let bar = Arc::clone(&self.filter_bar);
        let notify = Arc::clone(&self.notify);
        self.runtime
            .spawn(async move { controller::load_patients(&*api, &bar, &*notify).await })
    }

    /// Apply a filter-bar edit and dispatch the resulting filters, if any.
    /// Returns the tasks spawned for it.
    ///
    /// ```ignore
    /// session.edit_filters(|bar| bar.set_meridian("Nasal"));
    /// ```
    pub fn edit_filters(
        &self,
        edit: impl FnOnce(&mut FilterBarState) -> Option<Filters>,
    ) -> Vec<JoinHandle<()>> {
        let emitted = edit(&mut self.filter_bar.lock());
        let mut tasks = Vec::with_capacity(2);
        tasks.extend(self.sync_range_selector());
        if let Some(filters) = emitted {
            tasks.push(self.dispatch(filters));
        }
        tasks
    }

    /// Switch between the single view and the per-range sub-plots.
    pub fn set_mode(&self, mode: FilterMode) -> Vec<JoinHandle<()>> {
        self.viewer.lock().set_mode(mode);
        if mode == FilterMode::Single {
            // Invalidate any in-flight sub-plot fan-out.
            self.sub_plots.lock().begin(None);
        }
        info!(?mode, "view mode changed");
        self.edit_filters(|bar| bar.set_mode(mode))
    }

    fn dispatch(&self, filters: Filters) -> JoinHandle<()> {
        let action = self.viewer.lock().filters_changed(filters);
        let api = Arc::clone(&self.api);
        let notify = Arc::clone(&self.notify);
        (self.notify)();
        match action {
            ViewerAction::FetchSingle {
                generation,
                filters,
            } => {
                debug!(%generation, "fetching single plot");
                let viewer = Arc::clone(&self.viewer);
                self.runtime.spawn(async move {
                    controller::load_single(&*api, &viewer, generation, filters, &*notify).await;
                })
            }
            ViewerAction::ForwardToSubPlots(query) => {
                let sub_plots = Arc::clone(&self.sub_plots);
                self.runtime.spawn(async move {
                    controller::run_sub_plots(&*api, &sub_plots, Some(query), &*notify).await;
                })
            }
        }
    }

    /// Keep the range selector's inputs in step with the filter bar.
    fn sync_range_selector(&self) -> Option<JoinHandle<()>> {
        let (subject, meridian) = {
            let bar = self.filter_bar.lock();
            let subject = bar.display_id().map(|id| id.subject_id().to_string());
            (subject, bar.meridian().to_string())
        };
        let fetch = self
            .range_selector
            .lock()
            .set_inputs(subject.as_deref(), Some(meridian.as_str()))?;
        let api = Arc::clone(&self.api);
        let selector = Arc::clone(&self.range_selector);
        let notify = Arc::clone(&self.notify);
        Some(self.runtime.spawn(async move {
            controller::load_ranges(&*api, &selector, fetch, &*notify).await;
        }))
    }

    /// Export the current selection as CSV into `dir`. The outcome is left
    /// as the viewer notice. Returns `None` when the filter bar does not
    /// allow a download (no subject, or no cone types) or nothing is held.
    pub fn download(&self, dir: PathBuf) -> Option<JoinHandle<()>> {
        let display_id = {
            let bar = self.filter_bar.lock();
            if !bar.can_download() {
                debug!("download requested while disabled");
                return None;
            }
            bar.display_id()?
        };
        let request = self.viewer.lock().download_request(&display_id)?;
        let api = Arc::clone(&self.api);
        let viewer = Arc::clone(&self.viewer);
        let notify = Arc::clone(&self.notify);
        Some(self.runtime.spawn(async move {
            let result = download_to(&*api, &request, &dir).await;
            viewer.lock().set_notice(download_notice(&result));
            notify();
        }))
    }
}
