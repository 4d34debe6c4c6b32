use cone_viewer_core::model::cone_color;
use cone_viewer_protocol::ThemeToken;

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            Self::Dark => dark_visuals(),
            Self::Light => light_visuals(),
        }
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    resolve_rgba(token, mode).to_color32()
}

fn resolve_rgba(token: ThemeToken, mode: ThemeMode) -> ResolvedColor {
    // Cone colors are fixed across themes.
    if let Some(c) = cone_color(token) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        return ResolvedColor::rgba(channel(c.r), channel(c.g), channel(c.b), channel(c.a));
    }
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        ConeL | ConeM | ConeS | ConeUnclassified => ResolvedColor::rgb(0x61, 0x61, 0x61),
        MarkerOutline => ResolvedColor::rgba(0, 0, 0, 160),

        Background => ResolvedColor::rgb(0x12, 0x12, 0x12),
        Surface | PlotBackground => ResolvedColor::rgb(0x1e, 0x1e, 0x1e),
        Border | PlotBorder => ResolvedColor::rgb(0x30, 0x30, 0x30),
        GridLine => ResolvedColor::rgb(0x2c, 0x2c, 0x2c),
        AxisText => ResolvedColor::rgb(0xb0, 0xb0, 0xb0),

        TextPrimary => ResolvedColor::rgb(0xec, 0xec, 0xec),
        TextSecondary => ResolvedColor::rgb(0x9e, 0x9e, 0x9e),
        TextMuted => ResolvedColor::rgb(0x75, 0x75, 0x75),
        ErrorText => ResolvedColor::rgb(0xef, 0x53, 0x50),

        OverlayBackground => ResolvedColor::rgba(0x26, 0x26, 0x26, 235),
        OverlayBorder => ResolvedColor::rgb(0x42, 0x42, 0x42),
        ScaleBar => ResolvedColor::rgb(0xec, 0xec, 0xec),

        NavButton => ResolvedColor::rgb(0x2a, 0x2a, 0x2a),
        NavButtonActive => ResolvedColor::rgb(0x44, 0x8a, 0xff),
        NavButtonText => ResolvedColor::rgb(0xcf, 0xcf, 0xcf),
        NavButtonTextActive => ResolvedColor::rgb(0xff, 0xff, 0xff),
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        ConeL | ConeM | ConeS | ConeUnclassified => ResolvedColor::rgb(0x99, 0x99, 0x99),
        MarkerOutline => ResolvedColor::rgba(0xd0, 0xd0, 0xd0, 200),

        Background => ResolvedColor::rgb(0xf8, 0xf9, 0xfa),
        Surface | PlotBackground => ResolvedColor::rgb(255, 255, 255),
        Border | PlotBorder => ResolvedColor::rgb(0xde, 0xe2, 0xe6),
        GridLine => ResolvedColor::rgb(0xec, 0xef, 0xf1),
        AxisText => ResolvedColor::rgb(80, 80, 100),

        TextPrimary => ResolvedColor::rgb(0x1a, 0x1a, 0x2e),
        TextSecondary => ResolvedColor::rgb(0x66, 0x66, 0x77),
        TextMuted => ResolvedColor::rgb(120, 120, 130),
        ErrorText => ResolvedColor::rgb(0xc6, 0x28, 0x28),

        OverlayBackground => ResolvedColor::rgba(0xf7, 0xf1, 0xf1, 235),
        OverlayBorder => ResolvedColor::rgb(0xde, 0xe2, 0xe6),
        ScaleBar => ResolvedColor::rgb(0x1a, 0x1a, 0x2e),

        NavButton => ResolvedColor::rgb(0xf1, 0xf3, 0xf5),
        NavButtonActive => ResolvedColor::rgb(0x1a, 0x1a, 0x2e),
        NavButtonText => ResolvedColor::rgb(0x1a, 0x1a, 0x2e),
        NavButtonTextActive => ResolvedColor::rgb(255, 255, 255),
    }
}

// ── Typography scale ───────────────────────────────────────────────────────

pub const FONT_TITLE: f32 = 18.0;
pub const FONT_BODY: f32 = 13.0;
pub const FONT_CAPTION: f32 = 11.0;

// ── egui visual presets ────────────────────────────────────────────────────

pub fn dark_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    v.panel_fill = egui::Color32::from_rgb(0x18, 0x18, 0x18);
    v.window_fill = egui::Color32::from_rgb(0x1e, 0x1e, 0x1e);
    v.extreme_bg_color = egui::Color32::from_rgb(0x12, 0x12, 0x12);
    v.widgets.active.bg_fill = egui::Color32::from_rgb(0x44, 0x8a, 0xff);
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(0x44, 0x8a, 0xff, 60);
    v.selection.stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(0x44, 0x8a, 0xff));
    v.window_corner_radius = egui::CornerRadius::same(6);
    v.menu_corner_radius = egui::CornerRadius::same(6);
    v.widgets.inactive.corner_radius = egui::CornerRadius::same(5);
    v.widgets.hovered.corner_radius = egui::CornerRadius::same(5);
    v.widgets.active.corner_radius = egui::CornerRadius::same(5);
    v.error_fg_color = egui::Color32::from_rgb(0xef, 0x53, 0x50);
    v
}

pub fn light_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::light();
    v.panel_fill = egui::Color32::from_rgb(0xf8, 0xf9, 0xfa);
    v.window_fill = egui::Color32::from_rgb(255, 255, 255);
    v.extreme_bg_color = egui::Color32::from_rgb(255, 255, 255);
    v.widgets.active.bg_fill = egui::Color32::from_rgb(0x1a, 0x1a, 0x2e);
    v.widgets.active.fg_stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(0x1a, 0x1a, 0x2e, 40);
    v.selection.stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(0x1a, 0x1a, 0x2e));
    v.window_corner_radius = egui::CornerRadius::same(6);
    v.menu_corner_radius = egui::CornerRadius::same(6);
    v.widgets.inactive.corner_radius = egui::CornerRadius::same(5);
    v.widgets.hovered.corner_radius = egui::CornerRadius::same(5);
    v.widgets.active.corner_radius = egui::CornerRadius::same(5);
    v.error_fg_color = egui::Color32::from_rgb(0xc6, 0x28, 0x28);
    v
}

/// Apply the viewer's typography scale to egui styles.
pub fn apply_typography(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::proportional(FONT_TITLE),
    );
    style
        .text_styles
        .insert(egui::TextStyle::Body, egui::FontId::proportional(FONT_BODY));
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::proportional(FONT_BODY),
    );
    style.text_styles.insert(
        egui::TextStyle::Small,
        egui::FontId::proportional(FONT_CAPTION),
    );
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
