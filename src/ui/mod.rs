pub mod aim;
pub mod arena;
pub mod home;
pub mod movement;
pub mod sky;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::{App, Tab};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    let playfield = match app.current_tab {
        Tab::Home => {
            home::render_home(frame, chunks[1], app.selected_game);
            Rect::default()
        }
        Tab::Aim => aim::render(frame, chunks[1], app),
        Tab::Sky => sky::render(frame, chunks[1], app),
        Tab::Move => movement::render(frame, chunks[1], app),
    };
    app.playfield_area = playfield;
}
