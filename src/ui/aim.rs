use ratatui::prelude::*;
use ratatui::widgets::canvas::{Circle, Points};
use ratatui::widgets::*;

use crate::app::App;
use crate::ui::arena;

const ACCENT: Color = Color::Rgb(255, 120, 90);
const BACKGROUND: Color = Color::Rgb(12, 12, 20);
const RING_OUTER: Color = Color::Rgb(230, 60, 60);
const RING_INNER: Color = Color::Rgb(240, 240, 240);

pub fn render(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let areas = arena::split(frame, area, "🎯 Aim Trainer", ACCENT);
    let session = &app.aim;
    let rules = session.rules();
    let field = session.field();

    let accuracy = rules
        .accuracy()
        .map(|a| format!("{:.0}%", a * 100.0))
        .unwrap_or_else(|| "-".to_string());
    let status = Line::from(vec![
        Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        arena::separator(),
        Span::styled(
            format!("Time: {:.1}s ", session.time_left().unwrap_or(0.0)),
            Style::default().fg(Color::Cyan),
        ),
        arena::separator(),
        Span::styled(format!("Hits: {}/{} ", rules.hits(), rules.clicks()), Style::default().fg(Color::Green)),
        arena::separator(),
        Span::styled(format!("Accuracy: {accuracy}"), Style::default().fg(Color::Rgb(200, 200, 220))),
    ]);
    frame.render_widget(Paragraph::new(status), areas.status);

    let (cx, cy) = app.crosshair;
    let canvas = arena::playfield(field, BACKGROUND, |ctx| {
        if let Some(t) = rules.target() {
            let y = arena::flip(field, t.y);
            for (share, color) in [(1.0, RING_OUTER), (0.66, RING_INNER), (0.33, RING_OUTER)] {
                ctx.draw(&Circle { x: t.x as f64, y, radius: (t.radius * share) as f64, color });
            }
        }
        for p in rules.particles() {
            let glow = (p.alpha.clamp(0.0, 1.0) * 255.0) as u8;
            ctx.draw(&Points {
                coords: &[(p.x as f64, arena::flip(field, p.y))],
                color: Color::Rgb(255, glow, glow / 3),
            });
        }
        ctx.layer();
        ctx.print(
            cx as f64,
            arena::flip(field, cy),
            Span::styled("+", Style::default().fg(Color::Rgb(120, 255, 160)).add_modifier(Modifier::BOLD)),
        );
    });
    frame.render_widget(canvas, areas.field);

    arena::help_bar(
        frame,
        areas.help,
        &["Click / Space Shoot", "↑↓←→ Crosshair", "Enter Start", "X Stop", "Esc Menu"],
    );
    arena::overlay(frame, areas.field, session.phase(), session.summary(), app.status.as_deref(), ACCENT);
    areas.field
}
