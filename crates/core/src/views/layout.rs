use cone_viewer_protocol::{Point, Rect};

use crate::model::AxisRange;

/// Target pixel distance between grid lines.
const MIN_TICK_SPACING_PX: f64 = 60.0;

/// Maps data coordinates (µm) into a pixel rectangle with a 1:1 aspect.
///
/// The tighter axis fills the area; the other is widened symmetrically so
/// one micron is the same number of pixels horizontally and vertically.
/// Screen y grows downward, data y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame {
    area: Rect,
    x: AxisRange,
    y: AxisRange,
    scale: f64,
}

impl PlotFrame {
    /// `None` when the area is empty or either range has no extent.
    pub fn fit(area: Rect, x: AxisRange, y: AxisRange) -> Option<Self> {
        let (xs, ys) = (x.span(), y.span());
        if !(xs.is_finite() && ys.is_finite()) || xs <= 0.0 || ys <= 0.0 {
            return None;
        }
        if area.w <= 0.0 || area.h <= 0.0 {
            return None;
        }
        let scale = (area.w / xs).min(area.h / ys);
        let widen = |r: AxisRange, px: f64| {
            let extra = (px / scale - r.span()) / 2.0;
            AxisRange {
                min: r.min - extra,
                max: r.max + extra,
            }
        };
        Some(Self {
            area,
            x: widen(x, area.w),
            y: widen(y, area.h),
            scale,
        })
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.area.x + (x - self.x.min) * self.scale,
            self.area.bottom() - (y - self.y.min) * self.scale,
        )
    }

    /// Pixels per data unit, identical on both axes.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Visible x range after aspect correction.
    pub fn x_range(&self) -> AxisRange {
        self.x
    }

    pub fn y_range(&self) -> AxisRange {
        self.y
    }

    pub fn x_ticks(&self) -> Vec<f64> {
        ticks(self.x, self.area.w)
    }

    pub fn y_ticks(&self) -> Vec<f64> {
        ticks(self.y, self.area.h)
    }
}

/// Round tick values inside `range`, spaced for `length_px` of screen.
pub fn ticks(range: AxisRange, length_px: f64) -> Vec<f64> {
    let span = range.span();
    if span <= 0.0 || !span.is_finite() || length_px <= 0.0 {
        return Vec::new();
    }
    let target = (length_px / MIN_TICK_SPACING_PX).max(2.0);
    let step = nice_step(span / target);
    let first = (range.min / step).ceil() * step;
    // Far from the origin `first + step` can round back to `first`; each
    // tick is computed from its index and the count is bounded.
    let max_ticks = target as usize * 2 + 2;
    let mut out: Vec<f64> = Vec::new();
    for k in 0..max_ticks {
        let t = first + k as f64 * step;
        if t > range.max + step * 1e-9 {
            break;
        }
        if out.last().is_some_and(|&prev| t <= prev) {
            continue;
        }
        // Avoid "-0" labels.
        out.push(if t.abs() < step * 1e-9 { 0.0 } else { t });
    }
    out
}

/// Smallest 1/2/5 × 10^k step not below `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick label without trailing zeros: `12`, `2.5`.
pub fn format_tick(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}
