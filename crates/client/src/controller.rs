//! Async drivers for the core state machines.
//!
//! Each function issues the requests a state machine asked for and feeds
//! the outcomes back, holding the lock only while applying a result.
//! `notify` is called after every applied change so a front-end can redraw.

use cone_viewer_core::model::Filters;
use cone_viewer_core::state::{
    FilterBarState, Generation, RangeFetch, RangeSelectorState, SubPlotQuery, SubPlotsState,
    ViewerState,
};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::ConeApi;

pub type Notify = dyn Fn() + Send + Sync;

/// Fetch the patient list once. A failure is kept as a visible error.
pub async fn load_patients(api: &dyn ConeApi, bar: &Mutex<FilterBarState>, notify: &Notify) {
    let result = api.patients().await;
    match &result {
        Ok(p) => info!(count = p.len(), "patients loaded"),
        Err(e) => warn!(error = %e, "failed to load patients"),
    }
    bar.lock().patients_loaded(result.map_err(|e| e.to_string()));
    notify();
}

/// Fetch the ranges offered by the range selector. Failures become an
/// empty list.
pub async fn load_ranges(
    api: &dyn ConeApi,
    selector: &Mutex<RangeSelectorState>,
    fetch: RangeFetch,
    notify: &Notify,
) {
    let result = api
        .eccentricity_ranges(&fetch.subject_id, &fetch.meridian)
        .await
        .map(|r| r.ranges)
        .map_err(|e| {
            warn!(error = %e, subject = %fetch.subject_id, "failed to load eccentricity ranges");
            e.to_string()
        });
    if selector.lock().ranges_loaded(fetch.generation, result) {
        notify();
    } else {
        debug!(generation = %fetch.generation, "discarding stale range list");
    }
}

/// Fetch plot data and metadata together for the single-dataset view.
/// Either failing discards both.
pub async fn load_single(
    api: &dyn ConeApi,
    viewer: &Mutex<ViewerState>,
    generation: Generation,
    filters: Filters,
    notify: &Notify,
) {
    let result = futures::try_join!(api.plot_data(&filters), api.metadata(&filters))
        .map_err(|e| {
            warn!(error = %e, subject = filters.subject_id(), "failed to load plot");
            e.to_string()
        });
    if viewer.lock().single_loaded(generation, result) {
        notify();
    } else {
        debug!(%generation, "discarding stale plot");
    }
}

/// Run one sub-plots invocation: ranges first, then every range's data and
/// metadata concurrently, each applied as soon as it settles.
pub async fn run_sub_plots(
    api: &dyn ConeApi,
    state: &Mutex<SubPlotsState>,
    query: Option<SubPlotQuery>,
    notify: &Notify,
) {
    let Some(generation) = state.lock().begin(query.clone()) else {
        notify();
        return;
    };
    let Some(query) = query else {
        return;
    };
    notify();

    let ranges = match api
        .eccentricity_ranges(query.subject_id(), query.meridian())
        .await
    {
        Ok(r) => r.ranges,
        Err(e) => {
            warn!(error = %e, subject = query.subject_id(), "failed to load eccentricity ranges");
            if state.lock().ranges_failed(generation) {
                notify();
            }
            return;
        }
    };

    let jobs = state.lock().ranges_loaded(generation, ranges);
    notify();
    if jobs.is_empty() {
        return;
    }
    debug!(%generation, ranges = jobs.len(), "fetching sub-plots");

    let mut pending: FuturesUnordered<_> = jobs
        .into_iter()
        .map(|job| async move {
            let result = futures::try_join!(api.plot_data(&job.filters), api.metadata(&job.filters));
            (job.index, result)
        })
        .collect();

    while let Some((index, result)) = pending.next().await {
        let result = result.map_err(|e| {
            warn!(error = %e, index, "sub-plot fetch failed");
            e.to_string()
        });
        if !state.lock().range_settled(generation, index, result) {
            debug!(%generation, "selection changed, dropping remaining sub-plots");
            return;
        }
        notify();
    }
}
