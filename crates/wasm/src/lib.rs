use cone_viewer_core::svg::render_svg;
use cone_viewer_core::views::render_cone_plot;
use cone_viewer_protocol::{Metadata, PlotData, RenderCommand, Viewport};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Cone counts per spectral type, as shown in the legend.
#[derive(Debug, Serialize, PartialEq)]
struct SeriesSummary {
    cone_type: String,
    count: usize,
}

fn parse_plot(plot_json: &str) -> Result<PlotData, String> {
    let data: PlotData = serde_json::from_str(plot_json).map_err(|e| e.to_string())?;
    data.validate().map_err(|e| e.to_string())?;
    Ok(data)
}

fn parse_metadata(metadata_json: Option<&str>) -> Result<Option<Metadata>, String> {
    metadata_json
        .map(|json| serde_json::from_str(json).map_err(|e| e.to_string()))
        .transpose()
}

fn plot_commands(
    plot_json: &str,
    metadata_json: Option<&str>,
    viewport: &Viewport,
) -> Result<Vec<RenderCommand>, String> {
    let data = parse_plot(plot_json)?;
    let metadata = parse_metadata(metadata_json)?;
    Ok(render_cone_plot(&data, metadata.as_ref(), viewport))
}

fn series_summary(plot_json: &str) -> Result<Vec<SeriesSummary>, String> {
    let data = parse_plot(plot_json)?;
    Ok(cone_viewer_core::model::group_by_cone_type(&data)
        .into_iter()
        .map(|s| SeriesSummary {
            cone_type: s.cone_type.to_string(),
            count: s.len(),
        })
        .collect())
}

/// Render a `/plot-data` body (and optionally its `/metadata` body) as
/// render commands JSON.
#[wasm_bindgen]
pub fn render_plot(
    plot_json: &str,
    metadata_json: Option<String>,
    width: f64,
    height: f64,
    dpr: f64,
) -> Result<String, JsError> {
    let viewport = Viewport {
        dpr,
        ..Viewport::new(width, height)
    };
    let commands = plot_commands(plot_json, metadata_json.as_deref(), &viewport)
        .map_err(|e| JsError::new(&e))?;
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Same plot as a standalone SVG document.
#[wasm_bindgen]
pub fn render_plot_svg(
    plot_json: &str,
    metadata_json: Option<String>,
    width: f64,
    height: f64,
    dark: bool,
) -> Result<String, JsError> {
    let commands = plot_commands(plot_json, metadata_json.as_deref(), &Viewport::new(width, height))
        .map_err(|e| JsError::new(&e))?;
    Ok(render_svg(&commands, width, height, dark))
}

/// Per-type cone counts of a `/plot-data` body, as JSON.
#[wasm_bindgen]
pub fn cone_counts(plot_json: &str) -> Result<String, JsError> {
    let summary = series_summary(plot_json).map_err(|e| JsError::new(&e))?;
    serde_json::to_string(&summary).map_err(|e| JsError::new(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLOT: &str = r#"{"x":[0,10,20],"y":[0,5,10],"cone_type":["L","M","L"]}"#;

    #[test]
    fn renders_one_marker_per_cone() {
        let commands = plot_commands(PLOT, None, &Viewport::new(600.0, 400.0)).expect("renders");
        let circles = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawCircle { .. }))
            .count();
        assert_eq!(circles, 3);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let bad = r#"{"x":[0,10],"y":[0],"cone_type":["L","M"]}"#;
        let err = plot_commands(bad, None, &Viewport::new(600.0, 400.0)).expect_err("rejected");
        assert!(err.contains("column lengths differ"));
    }

    #[test]
    fn bad_metadata_is_an_error() {
        assert!(parse_metadata(Some(r#""not an object""#)).is_err());
        assert_eq!(parse_metadata(None), Ok(None));
    }

    #[test]
    fn counts_by_type() {
        let summary = series_summary(PLOT).expect("summary");
        assert_eq!(
            summary,
            vec![
                SeriesSummary { cone_type: "L".to_string(), count: 2 },
                SeriesSummary { cone_type: "M".to_string(), count: 1 },
            ]
        );
    }
}
