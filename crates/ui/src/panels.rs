//! Toolbar widgets: filter bar, mode toggle and range selector.

use cone_viewer_client::ViewerSession;
use cone_viewer_core::model::{CONE_TYPES, MERIDIANS};
use cone_viewer_core::state::{FilterMode, PatientList};
use cone_viewer_protocol::EccentricityRange;

/// Text typed into the eccentricity boxes, kept between frames so partial
/// input like `2.` survives.
#[derive(Debug, Default)]
pub struct BoundInputs {
    pub min: String,
    pub max: String,
}

/// `Some(None)` for an empty box, `Some(Some(v))` for a number, `None`
/// while the text does not parse.
pub fn parse_bound(text: &str) -> Option<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Some(None);
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some)
}

pub fn mode_toggle(ui: &mut egui::Ui, session: &ViewerSession) {
    let current = session.viewer.lock().mode();
    for (mode, label) in [
        (FilterMode::Single, "Single plot"),
        (FilterMode::MultiRange, "By eccentricity range"),
    ] {
        if ui.selectable_label(current == mode, label).clicked() && current != mode {
            session.set_mode(mode);
        }
    }
}

pub fn filter_bar(ui: &mut egui::Ui, session: &ViewerSession, bounds: &mut BoundInputs) {
    // Work from a snapshot: edits go through the session, which locks.
    let bar = session.filter_bar.lock().clone();

    ui.horizontal_wrapped(|ui| {
        ui.label("Subject");
        match bar.patients() {
            PatientList::Loading => {
                ui.add_enabled(false, egui::Button::new("Loading subjects..."));
            }
            PatientList::Failed(e) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Failed to load subjects: {e}"),
                );
            }
            PatientList::Loaded(_) => {
                let mut chosen = None;
                egui::ComboBox::from_id_salt("subject")
                    .selected_text(bar.subject().unwrap_or("Select subject"))
                    .show_ui(ui, |ui| {
                        for option in bar.subject_options() {
                            let selected = bar.subject() == Some(option.as_str());
                            if ui.selectable_label(selected, &option).clicked() {
                                chosen = Some(option);
                            }
                        }
                    });
                if let Some(subject) = chosen {
                    session.edit_filters(|b| b.set_subject(Some(subject)));
                }
            }
        }

        ui.separator();
        ui.label("Meridian");
        let mut meridian = None;
        egui::ComboBox::from_id_salt("meridian")
            .selected_text(bar.meridian())
            .show_ui(ui, |ui| {
                for m in MERIDIANS {
                    if ui.selectable_label(bar.meridian() == m, m).clicked() {
                        meridian = Some(m);
                    }
                }
            });
        if let Some(m) = meridian {
            session.edit_filters(|b| b.set_meridian(m));
        }

        ui.separator();
        for cone_type in CONE_TYPES {
            let mut on = bar.is_cone_type_selected(cone_type);
            if ui.checkbox(&mut on, format!("{cone_type} cones")).changed() {
                session.edit_filters(|b| b.toggle_cone_type(cone_type));
            }
        }

        if bar.mode() == FilterMode::Single {
            ui.separator();
            ui.label("Eccentricity");
            let min = ui.add(
                egui::TextEdit::singleline(&mut bounds.min)
                    .hint_text("min °")
                    .desired_width(56.0),
            );
            if min.changed()
                && let Some(value) = parse_bound(&bounds.min)
            {
                session.edit_filters(|b| b.set_eccentricity_min(value));
            }
            ui.label("to");
            let max = ui.add(
                egui::TextEdit::singleline(&mut bounds.max)
                    .hint_text("max °")
                    .desired_width(56.0),
            );
            if max.changed()
                && let Some(value) = parse_bound(&bounds.max)
            {
                session.edit_filters(|b| b.set_eccentricity_max(value));
            }
        }

        ui.separator();
        let can_download = bar.can_download() && session.viewer.lock().can_download();
        if ui
            .add_enabled(can_download, egui::Button::new("Download CSV"))
            .clicked()
            && let Some(dir) = rfd::FileDialog::new()
                .set_title("Save CSV export to folder")
                .pick_folder()
        {
            session.download(dir);
        }
    });

    if let Some(summary) = bar.download_summary() {
        ui.small(summary);
    }
}

/// Multi-select dropdown over the ranges of the current subject/meridian.
/// Ticking a range also brings its sub-plot into view.
pub fn range_selector(ui: &mut egui::Ui, session: &ViewerSession) {
    let (label, disabled, open, items) = {
        let s = session.range_selector.lock();
        let items: Vec<(EccentricityRange, bool)> = s
            .available()
            .iter()
            .map(|r| (r.clone(), s.is_selected(r)))
            .collect();
        (s.button_label(), s.is_disabled(), s.is_open(), items)
    };

    ui.horizontal(|ui| {
        ui.label("Eccentricity ranges");
        if ui
            .add_enabled(!disabled, egui::Button::new(format!("{label} ▾")))
            .clicked()
        {
            session.range_selector.lock().toggle_open();
        }
    });

    if !open || disabled {
        return;
    }
    egui::Frame::popup(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                session.range_selector.lock().select_all();
            }
            if ui.small_button("Clear All").clicked() {
                session.range_selector.lock().clear_all();
            }
        });
        ui.separator();
        for (range, mut on) in items {
            if ui.checkbox(&mut on, range.label.as_str()).changed() {
                session.range_selector.lock().toggle(&range);
                if on {
                    session.sub_plots.lock().select_range(&range);
                }
            }
        }
    });
}
