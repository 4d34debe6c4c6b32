use cone_viewer_client::ViewerSession;
use cone_viewer_core::state::FilterMode;
use cone_viewer_core::views::{NavTarget, hit_test, layout_sub_plots, render_viewer};
use cone_viewer_protocol::{Point, ThemeToken, Viewport};
use eframe::egui;

use crate::panels::{self, BoundInputs};
use crate::renderer;
use crate::theme::{self, ThemeMode};

/// Main application state. Everything fetched lives in the session; the
/// app only holds what egui needs between frames.
pub struct ConeViewerApp {
    session: ViewerSession,
    theme_mode: ThemeMode,
    bounds: BoundInputs,
}

impl ConeViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: ViewerSession) -> Self {
        let theme_mode = ThemeMode::Light;
        cc.egui_ctx.set_visuals(theme_mode.visuals());
        theme::apply_typography(&cc.egui_ctx);

        let ctx = cc.egui_ctx.clone();
        let session = session.with_notify(move || ctx.request_repaint());
        session.mount();

        Self {
            session,
            theme_mode,
            bounds: BoundInputs::default(),
        }
    }

    fn navigate(&self, target: NavTarget) {
        let mut sub_plots = self.session.sub_plots.lock();
        match target {
            NavTarget::Prev => sub_plots.prev(),
            NavTarget::Next => sub_plots.next(),
            NavTarget::Index(i) => sub_plots.select(i),
        }
    }
}

impl eframe::App for ConeViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mode = self.session.viewer.lock().mode();

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Cone Viewer");
                ui.separator();
                panels::mode_toggle(ui, &self.session);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.theme_mode {
                        ThemeMode::Dark => "🌙 Dark",
                        ThemeMode::Light => "☀ Light",
                    };
                    if ui.button(theme_label).clicked() {
                        self.theme_mode = self.theme_mode.toggled();
                        ctx.set_visuals(self.theme_mode.visuals());
                    }
                });
            });
            ui.separator();
            panels::filter_bar(ui, &self.session, &mut self.bounds);
            if mode == FilterMode::MultiRange {
                panels::range_selector(ui, &self.session);
            }
        });

        // Status bar
        let notice = self.session.viewer.lock().notice().map(str::to_string);
        if let Some(notice) = notice {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(notice);
                    if ui.small_button("✕").clicked() {
                        self.session.viewer.lock().dismiss_notice();
                    }
                });
            });
        }

        // Central panel: the current composition
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(available, egui::Sense::click());
            let viewport = Viewport::new(f64::from(available.width()), f64::from(available.height()));

            let mut nav_target = None;
            let commands = {
                let viewer = self.session.viewer.lock();
                let sub_plots = self.session.sub_plots.lock();
                if mode == FilterMode::MultiRange
                    && sub_plots.status_text().is_none()
                    && response.clicked()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    let layout = layout_sub_plots(&sub_plots, &viewport);
                    let local = pos - available.min;
                    nav_target = hit_test(
                        &layout.nav,
                        Point::new(f64::from(local.x), f64::from(local.y)),
                    );
                }
                render_viewer(&viewer, &sub_plots, &viewport)
            };

            if mode == FilterMode::MultiRange {
                ui.input(|i| {
                    if i.key_pressed(egui::Key::ArrowLeft) {
                        nav_target = Some(NavTarget::Prev);
                    }
                    if i.key_pressed(egui::Key::ArrowRight) {
                        nav_target = Some(NavTarget::Next);
                    }
                });
            }
            if let Some(target) = nav_target {
                self.navigate(target);
                ctx.request_repaint();
            }

            let mut painter = ui.painter_at(available);
            painter.rect_filled(
                available,
                egui::CornerRadius::ZERO,
                theme::resolve(ThemeToken::Background, self.theme_mode),
            );
            renderer::render_commands(&mut painter, &commands, available.min, self.theme_mode);
        });
    }
}
