//! `ViewerSession` end to end against an in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cone_viewer_client::{ApiError, ConeApi, CsvExport, ViewerSession};
use cone_viewer_core::model::Filters;
use cone_viewer_core::state::{FilterMode, SubPlotsPhase};
use cone_viewer_protocol::{EccentricityRange, Metadata, Patient, PlotData, RangesResponse};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// S042 answers slowly, its 5-10° range fails with HTTP 500; S077 answers
/// at once with a single cone.
struct FakeBackend;

fn cones(n: usize) -> PlotData {
    PlotData {
        x: (0..n).map(|i| i as f64).collect(),
        y: (0..n).map(|i| -(i as f64)).collect(),
        cone_type: (0..n).map(|_| "L".into()).collect(),
    }
}

#[async_trait]
impl ConeApi for FakeBackend {
    async fn patients(&self) -> Result<Vec<Patient>, ApiError> {
        Ok(vec![Patient {
            subject_id: "S042".into(),
            age: Some(27.0),
            eye: None,
        }])
    }

    async fn metadata(&self, filters: &Filters) -> Result<Metadata, ApiError> {
        Ok(Metadata {
            filtered_total_cones: Some(if filters.subject_id() == "S042" { 3.0 } else { 1.0 }),
            ..Metadata::default()
        })
    }

    async fn plot_data(&self, filters: &Filters) -> Result<PlotData, ApiError> {
        match filters.subject_id() {
            "S042" => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if filters.eccentricity_min() == Some(5.0) {
                    return Err(ApiError::Http { status: 500 });
                }
                Ok(cones(3))
            }
            _ => Ok(cones(1)),
        }
    }

    async fn eccentricity_ranges(
        &self,
        subject_id: &str,
        _meridian: &str,
    ) -> Result<RangesResponse, ApiError> {
        let ranges = match subject_id {
            "S042" => vec![
                EccentricityRange::new(0.0, 5.0, "0-5°"),
                EccentricityRange::new(5.0, 10.0, "5-10°"),
            ],
            _ => Vec::new(),
        };
        Ok(RangesResponse { ranges })
    }

    async fn export_csv(&self, filters: &Filters, display_id: &str) -> Result<CsvExport, ApiError> {
        Ok(CsvExport {
            file_name: format!("{display_id}.csv"),
            bytes: format!("subject\n{}\n", filters.subject_id()).into_bytes(),
        })
    }
}

fn session(mode: FilterMode) -> ViewerSession {
    ViewerSession::new(Arc::new(FakeBackend), Handle::current(), mode, false)
}

async fn settle(tasks: Vec<JoinHandle<()>>) {
    for task in tasks {
        task.await.expect("task panicked");
    }
}

#[tokio::test]
async fn mount_loads_patients() {
    let session = session(FilterMode::Single);
    session.mount().await.expect("task panicked");
    assert_eq!(session.filter_bar.lock().subject_options(), ["S042"]);
}

#[tokio::test]
async fn multi_range_isolates_failed_range() {
    let session = session(FilterMode::MultiRange);
    settle(session.edit_filters(|bar| bar.set_subject(Some("S042".into())))).await;

    let sub_plots = session.sub_plots.lock();
    assert_eq!(sub_plots.phase(), SubPlotsPhase::Ready);
    assert_eq!(sub_plots.count_text(), "2 eccentricity ranges found");
    let plots = sub_plots.plots();
    assert_eq!(plots[0].data.as_ref().map(PlotData::len), Some(3));
    assert_eq!(plots[1].error.as_deref(), Some("HTTP 500"));
    assert!(plots[1].data.is_none());

    let selector = session.range_selector.lock();
    assert_eq!(selector.available().len(), 2);
    assert_eq!(selector.button_label(), "Select eccentricity ranges");
}

#[tokio::test]
async fn later_selection_wins_over_slow_earlier_one() {
    let session = session(FilterMode::Single);
    let slow = session.edit_filters(|bar| bar.set_subject(Some("S042".into())));
    let fast = session.edit_filters(|bar| bar.set_subject(Some("S077".into())));
    settle(fast).await;
    settle(slow).await;

    let viewer = session.viewer.lock();
    let single = viewer.single();
    assert_eq!(single.data.as_ref().map(PlotData::len), Some(1));
    assert_eq!(
        single.metadata.as_ref().and_then(|m| m.filtered_total_cones),
        Some(1.0)
    );
    assert!(!single.loading);
}

#[tokio::test]
async fn switching_mode_refetches_for_new_composition() {
    let session = session(FilterMode::Single);
    settle(session.edit_filters(|bar| bar.set_subject(Some("S077".into())))).await;
    assert!(session.viewer.lock().single().data.is_some());

    settle(session.set_mode(FilterMode::MultiRange)).await;
    assert!(session.viewer.lock().single().data.is_none());
    assert_eq!(session.sub_plots.lock().phase(), SubPlotsPhase::NoRanges);
}

#[tokio::test]
async fn download_writes_file_and_leaves_notice() {
    let dir = tempfile::tempdir().expect("temp dir");
    let session = session(FilterMode::Single);
    assert!(session.download(dir.path().to_path_buf()).is_none());

    settle(session.edit_filters(|bar| bar.set_subject(Some("S077".into())))).await;
    session
        .download(dir.path().to_path_buf())
        .expect("selection is complete")
        .await
        .expect("task panicked");

    let written = std::fs::read_to_string(dir.path().join("S077.csv")).expect("csv written");
    assert_eq!(written, "subject\nS077\n");
    let viewer = session.viewer.lock();
    assert!(viewer.notice().is_some_and(|n| n.starts_with("Saved ")));
}

#[tokio::test]
async fn emptied_cone_types_block_download() {
    let dir = tempfile::tempdir().expect("temp dir");
    let session = session(FilterMode::Single);
    settle(session.edit_filters(|bar| bar.set_subject(Some("S077".into())))).await;
    settle(session.edit_filters(|bar| bar.toggle_cone_type("L"))).await;

    assert!(!session.filter_bar.lock().can_download());
    assert!(session.download(dir.path().to_path_buf()).is_none());
    assert!(!dir.path().join("S077.csv").exists());
    assert!(session.viewer.lock().notice().is_none());
}
