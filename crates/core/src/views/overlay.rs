use cone_viewer_protocol::{
    EccentricityRange, Metadata, PlotData, Point, Rect, RenderCommand, SharedStr, TextAlign,
    ThemeToken,
};

use crate::model::group_by_cone_type;

const PANEL_WIDTH: f64 = 200.0;
const PANEL_OFFSET: f64 = 20.0;
const PADDING: f64 = 10.0;
const TITLE_FONT_SIZE: f64 = 12.0;
const ROW_FONT_SIZE: f64 = 11.0;
const LINE_HEIGHT: f64 = 16.0;
const SECTION_GAP: f64 = 10.0;
const SWATCH_RADIUS: f64 = 5.0;

/// One line of the summary panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRow {
    /// Color dot followed by text, e.g. `L: 120`.
    Swatch { color: ThemeToken, text: String },
    /// `Label: value`.
    Field { label: &'static str, value: String },
    /// Emphasized line under a rule.
    Total { label: &'static str, value: String },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSection {
    pub title: &'static str,
    pub rows: Vec<PanelRow>,
}

/// Overlay shown in the top-right corner of a plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPanel {
    pub sections: Vec<PanelSection>,
}

impl SummaryPanel {
    /// Panel for the single-dataset plot: filtered per-type counts and the
    /// full metadata summary.
    pub fn for_cone_plot(data: &PlotData, metadata: &Metadata) -> Self {
        Self {
            sections: vec![
                cone_types_section("Cone Types (Filtered)", data),
                PanelSection {
                    title: "Data Summary",
                    rows: metadata_rows(metadata, true),
                },
            ],
        }
    }

    /// Panel for one eccentricity sub-plot.
    pub fn for_sub_plot(range: &EccentricityRange, data: &PlotData, metadata: &Metadata) -> Self {
        Self {
            sections: vec![
                PanelSection {
                    title: "Eccentricity Range",
                    rows: vec![PanelRow::Plain(format!(
                        "{:.1}° - {:.1}°",
                        range.min, range.max
                    ))],
                },
                cone_types_section("Cone Types", data),
                PanelSection {
                    title: "Summary",
                    rows: metadata_rows(metadata, false),
                },
            ],
        }
    }

    fn height(&self) -> f64 {
        let lines: usize = self.sections.iter().map(|s| 1 + s.rows.len()).sum();
        let gaps = self.sections.len().saturating_sub(1) as f64 * SECTION_GAP;
        2.0 * PADDING + lines as f64 * LINE_HEIGHT + gaps
    }
}

fn cone_types_section(title: &'static str, data: &PlotData) -> PanelSection {
    let mut rows: Vec<PanelRow> = group_by_cone_type(data)
        .into_iter()
        .map(|s| PanelRow::Swatch {
            color: s.color,
            text: format!("{}: {}", s.cone_type, s.len()),
        })
        .collect();
    rows.push(PanelRow::Total {
        label: "Total",
        value: data.cone_type.len().to_string(),
    });
    PanelSection { title, rows }
}

fn format_count(v: f64) -> String {
    format!("{v:.0}")
}

/// Metadata lines, one per present field. Absent fields are omitted; zero
/// values are shown.
fn metadata_rows(m: &Metadata, detailed: bool) -> Vec<PanelRow> {
    let mut rows = Vec::new();
    let mut field = |label: &'static str, value: Option<String>| {
        if let Some(value) = value {
            rows.push(PanelRow::Field { label, value });
        }
    };
    field("Eye", m.eye_description.clone());
    field("FOV", m.fov.clone());
    field("L/M Ratio", m.lm_ratio.map(|v| v.to_string()));
    field("S Cones", m.scones.map(format_count));
    if detailed {
        field("L Cone Density", m.lcone_density.map(|v| format!("{v:.0}")));
        field("M Cone Density", m.mcone_density.map(|v| format!("{v:.0}")));
        field("S Cone Density", m.scone_density.map(|v| format!("{v:.0}")));
        field("Total Cones (All)", m.numcones.map(format_count));
        if let Some(total) = m.filtered_total_cones {
            rows.push(PanelRow::Total {
                label: "Filtered Total",
                value: format_count(total),
            });
        }
    }
    rows
}

/// Draw the panel anchored to the top-right corner of `plot_area`.
pub fn render_summary_panel(panel: &SummaryPanel, plot_area: Rect) -> Vec<RenderCommand> {
    let x = (plot_area.right() - PANEL_WIDTH - PANEL_OFFSET).max(plot_area.x);
    let mut y = plot_area.y + PANEL_OFFSET;
    let mut commands = Vec::with_capacity(4 + panel.sections.len() * 8);

    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("summary-panel"),
        label: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(x, y, PANEL_WIDTH, panel.height()),
        color: ThemeToken::OverlayBackground,
        border_color: Some(ThemeToken::OverlayBorder),
        label: None,
    });

    y += PADDING;
    let left = x + PADDING;
    for (i, section) in panel.sections.iter().enumerate() {
        if i > 0 {
            y += SECTION_GAP;
        }
        y += LINE_HEIGHT;
        commands.push(RenderCommand::DrawText {
            position: Point::new(left, y - 4.0),
            text: SharedStr::from(section.title),
            color: ThemeToken::TextPrimary,
            font_size: TITLE_FONT_SIZE,
            align: TextAlign::Left,
            bold: true,
        });
        for row in &section.rows {
            y += LINE_HEIGHT;
            let baseline = y - 4.0;
            match row {
                PanelRow::Swatch { color, text } => {
                    commands.push(RenderCommand::DrawCircle {
                        center: Point::new(left + SWATCH_RADIUS, baseline - SWATCH_RADIUS + 1.0),
                        radius: SWATCH_RADIUS,
                        color: *color,
                        border_color: Some(ThemeToken::MarkerOutline),
                    });
                    commands.push(RenderCommand::text(
                        Point::new(left + 2.0 * SWATCH_RADIUS + 6.0, baseline),
                        text.as_str(),
                        ThemeToken::TextSecondary,
                        ROW_FONT_SIZE,
                        TextAlign::Left,
                    ));
                }
                PanelRow::Field { label, value } => {
                    commands.push(RenderCommand::text(
                        Point::new(left, baseline),
                        format!("{label}: {value}"),
                        ThemeToken::TextSecondary,
                        ROW_FONT_SIZE,
                        TextAlign::Left,
                    ));
                }
                PanelRow::Total { label, value } => {
                    commands.push(RenderCommand::DrawLine {
                        from: Point::new(left, y - LINE_HEIGHT + 1.0),
                        to: Point::new(x + PANEL_WIDTH - PADDING, y - LINE_HEIGHT + 1.0),
                        color: ThemeToken::OverlayBorder,
                        width: 1.0,
                    });
                    commands.push(RenderCommand::DrawText {
                        position: Point::new(left, baseline),
                        text: SharedStr::from(format!("{label}: {value}")),
                        color: ThemeToken::TextPrimary,
                        font_size: ROW_FONT_SIZE,
                        align: TextAlign::Left,
                        bold: true,
                    });
                }
                PanelRow::Plain(text) => {
                    commands.push(RenderCommand::text(
                        Point::new(left, baseline),
                        text.as_str(),
                        ThemeToken::TextSecondary,
                        ROW_FONT_SIZE,
                        TextAlign::Left,
                    ));
                }
            }
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
