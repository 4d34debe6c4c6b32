use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use cone_viewer_client::ViewerSession;
use cone_viewer_core::model::{CONE_TYPES, MERIDIANS};
use cone_viewer_core::state::{FilterBarState, FilterMode, PatientList};
use cone_viewer_core::views::render_viewer;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
};

use crate::args::Args;
use crate::renderer;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Quit,
    Prev,
    Next,
    ToggleMode,
    NextSubject,
    NextMeridian,
    ToggleConeType(&'static str),
    Download,
}

fn action_for(code: KeyCode) -> Option<Action> {
    Some(match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left => Action::Prev,
        KeyCode::Right => Action::Next,
        KeyCode::Char('m') => Action::ToggleMode,
        KeyCode::Char('s') => Action::NextSubject,
        KeyCode::Char('r') => Action::NextMeridian,
        KeyCode::Char('1') => Action::ToggleConeType(CONE_TYPES[0]),
        KeyCode::Char('2') => Action::ToggleConeType(CONE_TYPES[1]),
        KeyCode::Char('3') => Action::ToggleConeType(CONE_TYPES[2]),
        KeyCode::Char('d') => Action::Download,
        _ => return None,
    })
}

/// The entry after `current` in `options`, wrapping; the first entry when
/// nothing is chosen yet.
fn cycle<'a>(options: &'a [String], current: Option<&str>) -> Option<&'a String> {
    let next = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| (i + 1) % options.len().max(1));
    options.get(next)
}

fn header_line(bar: &FilterBarState) -> String {
    let subject = match bar.patients() {
        PatientList::Loading => "loading subjects...".to_string(),
        PatientList::Failed(e) => format!("Failed to load subjects: {e}"),
        PatientList::Loaded(_) => bar.subject().unwrap_or("no subject").to_string(),
    };
    let types: Vec<&str> = CONE_TYPES
        .into_iter()
        .filter(|t| bar.is_cone_type_selected(t))
        .collect();
    let mode = match bar.mode() {
        FilterMode::Single => "single",
        FilterMode::MultiRange => "by range",
    };
    format!(
        " Cone Viewer | {subject} | {} | {} | {mode} ",
        bar.meridian(),
        if types.is_empty() { "-".to_string() } else { types.join("+") },
    )
}

const HINTS: &str =
    " s subject | r meridian | 1/2/3 L/M/S | m mode | ←→ range | d download | q quit ";

fn apply(session: &ViewerSession, action: Action) {
    match action {
        Action::Quit => {}
        Action::Prev => session.sub_plots.lock().prev(),
        Action::Next => session.sub_plots.lock().next(),
        Action::ToggleMode => {
            let mode = match session.viewer.lock().mode() {
                FilterMode::Single => FilterMode::MultiRange,
                FilterMode::MultiRange => FilterMode::Single,
            };
            session.set_mode(mode);
        }
        Action::NextSubject => {
            let next = {
                let bar = session.filter_bar.lock();
                cycle(&bar.subject_options(), bar.subject()).cloned()
            };
            if let Some(subject) = next {
                session.edit_filters(|b| b.set_subject(Some(subject)));
            }
        }
        Action::NextMeridian => {
            let meridians = MERIDIANS.map(str::to_string);
            let next = {
                let bar = session.filter_bar.lock();
                cycle(&meridians, Some(bar.meridian())).cloned()
            };
            if let Some(meridian) = next {
                session.edit_filters(|b| b.set_meridian(meridian));
            }
        }
        Action::ToggleConeType(cone_type) => {
            session.edit_filters(|b| b.toggle_cone_type(cone_type));
        }
        Action::Download => {
            if let Ok(dir) = std::env::current_dir() {
                session.download(dir);
            }
        }
    }
}

/// Apply the selection given on the command line before the first frame.
fn preselect(session: &ViewerSession, args: &Args) {
    if let Some(meridian) = &args.meridian {
        session.edit_filters(|b| b.set_meridian(meridian.clone()));
    }
    if let Some(types) = &args.cone_types {
        for cone_type in CONE_TYPES {
            let wanted = types.iter().any(|t| t == cone_type);
            let selected = session.filter_bar.lock().is_cone_type_selected(cone_type);
            if wanted != selected {
                session.edit_filters(|b| b.toggle_cone_type(cone_type));
            }
        }
    }
    if args.mode() == FilterMode::Single {
        session.edit_filters(|b| b.set_eccentricity_min(args.eccentricity_min));
        session.edit_filters(|b| b.set_eccentricity_max(args.eccentricity_max));
    }
    if let Some(subject) = &args.subject {
        session.edit_filters(|b| b.set_subject(Some(subject.clone())));
    }
}

pub fn run(session: &ViewerSession, args: &Args) -> Result<()> {
    session.mount();
    preselect(session, args);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    session: &ViewerSession,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();

            let header = session.filter_bar.lock().clone();
            let header_area = Rect::new(0, 0, area.width, 1);
            frame.render_widget(
                Paragraph::new(header_line(&header))
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                header_area,
            );

            let footer_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
            let footer = session
                .viewer
                .lock()
                .notice()
                .map_or_else(|| HINTS.to_string(), |n| format!(" {n} "));
            frame.render_widget(
                Paragraph::new(footer).style(Style::default().fg(Color::Gray).bg(Color::Black)),
                footer_area,
            );

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(2));
            frame.render_widget(
                Block::default().style(Style::default().bg(Color::Black)),
                content_area,
            );
            let viewport = renderer::viewport_for(content_area);
            let commands = {
                let viewer = session.viewer.lock();
                let sub_plots = session.sub_plots.lock();
                render_viewer(&viewer, &sub_plots, &viewport)
            };
            renderer::paint(frame.buffer_mut(), content_area, &commands);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = action_for(key.code)
        {
            if action == Action::Quit {
                break;
            }
            session.viewer.lock().dismiss_notice();
            apply(session, action);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Right), Some(Action::Next));
        assert_eq!(action_for(KeyCode::Char('3')), Some(Action::ToggleConeType("S")));
        assert_eq!(action_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn cycling_wraps_and_starts_at_first() {
        let options = vec!["S001".to_string(), "S002".to_string()];
        assert_eq!(cycle(&options, None).map(String::as_str), Some("S001"));
        assert_eq!(cycle(&options, Some("S001")).map(String::as_str), Some("S002"));
        assert_eq!(cycle(&options, Some("S002")).map(String::as_str), Some("S001"));
        assert_eq!(cycle(&[], None), None);
    }

    #[test]
    fn header_reports_patient_failure() {
        let mut bar = FilterBarState::new(FilterMode::Single, false);
        bar.patients_loaded(Err("backend unreachable".to_string()));
        let line = header_line(&bar);
        assert!(line.contains("Failed to load subjects: backend unreachable"));
        assert!(line.contains("Temporal"));
    }
}
