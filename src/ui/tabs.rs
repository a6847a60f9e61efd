use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::games::Phase;

const GOLD: Color = Color::Rgb(255, 220, 80);
const DIM: Color = Color::Rgb(120, 120, 140);
const FRAME: Color = Color::Rgb(60, 150, 200);

/// Dot after a trainer's name: green while running, grey once a result is up.
fn phase_marker(phase: Option<Phase>) -> Option<Span<'static>> {
    match phase? {
        Phase::Active => Some(Span::styled(" ●", Style::default().fg(Color::Rgb(80, 220, 120)))),
        Phase::Ended => Some(Span::styled(" ○", Style::default().fg(DIM))),
        Phase::Idle => None,
    }
}

fn tab_phase(app: &App, tab: Tab) -> Option<Phase> {
    match tab {
        Tab::Home => None,
        Tab::Aim => Some(app.aim.phase()),
        Tab::Sky => Some(app.sky.phase()),
        Tab::Move => Some(app.movement.phase()),
    }
}

fn tab_label(app: &App, tab: Tab) -> Line<'static> {
    let hotkey = match tab.index() {
        0 => String::new(),
        n => format!("{n}"),
    };
    let mut label = vec![
        Span::styled(hotkey, Style::default().fg(DIM)),
        Span::raw(tab.title().to_string()),
    ];
    label.extend(phase_marker(tab_phase(app, tab)));
    Line::from(label)
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(FRAME))
        .title(Span::styled(
            " 🎯 Reflexcade ",
            Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD),
        ));

    let labels = Tab::all().iter().map(|&tab| tab_label(app, tab));
    let tabs = Tabs::new(labels)
        .block(block)
        .select(app.current_tab.index())
        .style(Style::default().fg(DIM))
        .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .divider("·");

    frame.render_widget(tabs, area);
}
