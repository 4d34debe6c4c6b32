use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Each view in the core emits a `Vec<RenderCommand>`. Renderers (SVG,
/// egui, terminal) consume the list in order and resolve theme tokens to
/// concrete colors themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally outlined.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<SharedStr>,
    },

    /// Draw a filled circle. Scatter markers are emitted as circles.
    DrawCircle {
        center: Point,
        radius: f64,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
        bold: bool,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Begin a logical group (one series, the overlay panel, ...).
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl RenderCommand {
    /// Plain text helper used by the overlay and placeholder views.
    pub fn text(
        position: Point,
        text: impl Into<SharedStr>,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    ) -> Self {
        Self::DrawText {
            position,
            text: text.into(),
            color,
            font_size,
            align,
            bold: false,
        }
    }
}
