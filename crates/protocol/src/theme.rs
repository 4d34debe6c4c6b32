use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Cone spectral types
    ConeL,
    ConeM,
    ConeS,
    /// Fallback for spectral types outside L/M/S.
    ConeUnclassified,
    MarkerOutline,

    Background,
    Surface,
    Border,

    // Plot area
    PlotBackground,
    PlotBorder,
    GridLine,
    AxisText,

    TextPrimary,
    TextSecondary,
    TextMuted,
    ErrorText,

    // Summary overlay and scale bar
    OverlayBackground,
    OverlayBorder,
    ScaleBar,

    // Range navigation
    NavButton,
    NavButtonActive,
    NavButtonText,
    NavButtonTextActive,
}
