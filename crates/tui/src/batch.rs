//! Non-interactive runs: fetch one selection and write SVG plots and/or
//! the CSV export to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cone_viewer_client::ConeApi;
use cone_viewer_client::controller;
use cone_viewer_client::export::download_to;
use cone_viewer_core::export::svg_file_name;
use cone_viewer_core::model::{DisplayId, Filters, MERIDIANS};
use cone_viewer_core::state::{
    DownloadRequest, FilterMode, SubPlotQuery, SubPlotsPhase, SubPlotsState, ViewerAction,
    ViewerState,
};
use cone_viewer_core::svg::render_svg;
use cone_viewer_core::views::{render_single_view, render_sub_plot};
use cone_viewer_protocol::Viewport;
use parking_lot::Mutex;
use tracing::info;

use crate::args::Args;

/// Size of written SVG plots.
const SVG_WIDTH: f64 = 900.0;
const SVG_HEIGHT: f64 = 700.0;

/// Nothing to redraw in a batch run.
fn quiet() {}

/// Build the filters a batch run fetches with. Meridian and cone types
/// fall back to the filter bar's defaults; bounds only apply to a single
/// plot.
pub fn batch_filters(args: &Args) -> Result<(DisplayId, Filters)> {
    let subject = args
        .subject
        .as_deref()
        .context("--subject is required with --svg-dir or --csv-dir")?;
    let display_id = DisplayId::parse(subject);
    let meridian = args.meridian.as_deref().unwrap_or(MERIDIANS[0]);
    let cone_types = args
        .cone_types
        .clone()
        .unwrap_or_else(|| vec!["L".to_string()]);
    let mut filters = Filters::new(display_id.subject_id(), meridian, cone_types)?;
    if args.mode() == FilterMode::Single {
        filters = filters.with_eccentricity(args.eccentricity_min, args.eccentricity_max);
    }
    Ok((display_id, filters))
}

/// Run one batch invocation and return the files written.
pub async fn run(api: &dyn ConeApi, args: &Args) -> Result<Vec<PathBuf>> {
    let (display_id, filters) = batch_filters(args)?;
    info!(subject = %display_id, meridian = filters.meridian(), "batch run");

    let mut written = Vec::new();
    if let Some(dir) = &args.svg_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
        match args.mode() {
            FilterMode::Single => {
                written.push(write_single(api, &filters, dir, args.dark).await?);
            }
            FilterMode::MultiRange => {
                written.extend(write_sub_plots(api, &filters, dir, args.dark).await?);
            }
        }
    }

    if let Some(dir) = &args.csv_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
        let request = DownloadRequest {
            filters: filters.clone(),
            display_id: display_id.to_string(),
        };
        let path = download_to(api, &request, dir)
            .await
            .context("CSV export failed")?;
        written.push(path);
    }

    Ok(written)
}

async fn write_single(api: &dyn ConeApi, filters: &Filters, dir: &Path, dark: bool) -> Result<PathBuf> {
    let viewer = Mutex::new(ViewerState::new(FilterMode::Single));
    let ViewerAction::FetchSingle { generation, .. } = viewer.lock().filters_changed(filters.clone())
    else {
        bail!("viewer is not in single-plot mode");
    };
    controller::load_single(api, &viewer, generation, filters.clone(), &quiet).await;

    let viewport = Viewport::new(SVG_WIDTH, SVG_HEIGHT);
    let commands = {
        let viewer = viewer.lock();
        if let Some(e) = &viewer.single().error {
            bail!("loading cone data: {e}");
        }
        render_single_view(viewer.single(), &viewport)
    };
    let path = dir.join(svg_file_name(filters));
    write_svg(&path, &render_svg(&commands, SVG_WIDTH, SVG_HEIGHT, dark)).await?;
    Ok(path)
}

async fn write_sub_plots(
    api: &dyn ConeApi,
    filters: &Filters,
    dir: &Path,
    dark: bool,
) -> Result<Vec<PathBuf>> {
    let query = SubPlotQuery::from(filters);
    let state = Mutex::new(SubPlotsState::new());
    controller::run_sub_plots(api, &state, Some(query.clone()), &quiet).await;

    let (phase, plots) = {
        let state = state.lock();
        (state.phase(), state.plots().to_vec())
    };
    if phase == SubPlotsPhase::NoRanges {
        bail!("no eccentricity ranges for {}", filters.subject_id());
    }

    let viewport = Viewport::new(SVG_WIDTH, SVG_HEIGHT);
    let mut written = Vec::new();
    for plot in &plots {
        let commands = render_sub_plot(plot, &viewport);
        let path = dir.join(svg_file_name(&query.filters_for(&plot.range)));
        write_svg(&path, &render_svg(&commands, SVG_WIDTH, SVG_HEIGHT, dark)).await?;
        written.push(path);
    }
    info!(count = written.len(), "sub-plots written");
    Ok(written)
}

async fn write_svg(path: &Path, svg: &str) -> Result<()> {
    tokio::fs::write(path, svg)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "plot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use clap::Parser;
    use cone_viewer_client::{ApiError, CsvExport};
    use cone_viewer_protocol::{EccentricityRange, Metadata, Patient, PlotData, RangesResponse};

    use super::*;

    struct Fixed;

    fn cones() -> PlotData {
        PlotData {
            x: vec![0.0, 10.0, 20.0],
            y: vec![0.0, 5.0, 10.0],
            cone_type: vec!["L".into(), "M".into(), "L".into()],
        }
    }

    #[async_trait]
    impl ConeApi for Fixed {
        async fn patients(&self) -> Result<Vec<Patient>, ApiError> {
            Ok(Vec::new())
        }

        async fn metadata(&self, _filters: &Filters) -> Result<Metadata, ApiError> {
            Ok(Metadata::default())
        }

        async fn plot_data(&self, filters: &Filters) -> Result<PlotData, ApiError> {
            if filters.eccentricity_min() == Some(5.0) {
                return Err(ApiError::Http { status: 500 });
            }
            Ok(cones())
        }

        async fn eccentricity_ranges(
            &self,
            _subject_id: &str,
            _meridian: &str,
        ) -> Result<RangesResponse, ApiError> {
            Ok(RangesResponse {
                ranges: vec![
                    EccentricityRange::new(0.0, 5.0, "0-5°"),
                    EccentricityRange::new(5.0, 10.0, "5-10°"),
                ],
            })
        }

        async fn export_csv(
            &self,
            _filters: &Filters,
            display_id: &str,
        ) -> Result<CsvExport, ApiError> {
            Ok(CsvExport {
                file_name: format!("{display_id}.csv"),
                bytes: b"x,y\n".to_vec(),
            })
        }
    }

    fn args(extra: &[&str]) -> Args {
        let mut all = vec!["cone-viewer", "--subject", "S042R"];
        all.extend_from_slice(extra);
        Args::try_parse_from(all).expect("valid arguments")
    }

    #[test]
    fn filters_use_bare_subject_and_defaults() {
        let (display_id, filters) = batch_filters(&args(&["--min", "1", "--max", "4"])).expect("filters");
        assert_eq!(display_id.to_string(), "S042R");
        assert_eq!(filters.subject_id(), "S042");
        assert_eq!(filters.meridian(), "Temporal");
        assert_eq!(filters.cone_types(), ["L"]);
        assert_eq!(filters.eccentricity_min(), Some(1.0));

        let (_, by_range) = batch_filters(&args(&["--min", "1", "--by-range"])).expect("filters");
        assert_eq!(by_range.eccentricity_min(), None);
    }

    #[test]
    fn subject_is_required() {
        let args = Args::try_parse_from(["cone-viewer", "--svg-dir", "out"]).expect("valid arguments");
        assert!(batch_filters(&args).is_err());
    }

    #[tokio::test]
    async fn writes_single_plot_and_csv() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().to_string_lossy().to_string();
        let written = run(&Fixed, &args(&["--types", "L,M", "--svg-dir", &out, "--csv-dir", &out]))
            .await
            .expect("batch run");
        assert_eq!(
            written,
            vec![
                dir.path().join("S042_Temporal_L_M_cones.svg"),
                dir.path().join("S042R.csv"),
            ]
        );
        let svg = std::fs::read_to_string(&written[0]).expect("svg readable");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<circle"));
    }

    #[tokio::test]
    async fn writes_one_svg_per_range_even_when_one_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().to_string_lossy().to_string();
        let written = run(&Fixed, &args(&["--by-range", "--svg-dir", &out]))
            .await
            .expect("batch run");
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("S042_Temporal_L_ecc0.0-5.0_cones.svg"));
        let failed = std::fs::read_to_string(&written[1]).expect("svg readable");
        assert!(failed.contains("HTTP 500"));
    }
}
