use ratatui::prelude::*;
use ratatui::widgets::canvas::Line as CanvasLine;
use ratatui::widgets::*;

use crate::app::App;
use crate::games::input::Lane;
use crate::games::sky_defender::{EnemyKind, SkyVariant};
use crate::ui::arena;

const ACCENT: Color = Color::Rgb(100, 180, 255);
const BACKGROUND: Color = Color::Rgb(5, 8, 25);

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Meteor => Color::Rgb(190, 130, 80),
        EnemyKind::Ufo => Color::Rgb(220, 90, 255),
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let areas = arena::split(frame, area, "✈ Sky Defender", ACCENT);
    let session = &app.sky;
    let rules = session.rules();
    let field = session.field();
    let player = rules.player();

    let status = Line::from(vec![
        Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        arena::separator(),
        Span::styled(
            format!("Health: {}", "♥ ".repeat(player.health as usize)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        arena::separator(),
        Span::styled(format!("Level: {} ", session.level()), Style::default().fg(Color::Green)),
        arena::separator(),
        Span::styled(
            format!("Lane: {} ", session.controls().lane.label()),
            Style::default().fg(Color::Cyan),
        ),
        arena::separator(),
        Span::styled(format!("Mode: {}", rules.variant().name()), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status), areas.status);

    let canvas = arena::playfield(field, BACKGROUND, |ctx| {
        if rules.variant() == SkyVariant::Snap {
            for lane in Lane::ALL {
                let x = (field.width * lane.fraction()) as f64;
                ctx.draw(&CanvasLine { x1: x, y1: 0.0, x2: x, y2: field.height as f64, color: Color::Rgb(25, 30, 60) });
            }
        }
        ctx.layer();
        for enemy in rules.enemies() {
            arena::draw_rect(ctx, field, &enemy.rect, enemy_color(enemy.kind));
        }
        for missile in rules.missiles() {
            arena::draw_rect(ctx, field, &missile.rect, Color::Rgb(255, 240, 120));
        }
        if player.health > 0 {
            arena::draw_rect(ctx, field, &player.rect, Color::Rgb(80, 255, 140));
        }
    });
    frame.render_widget(canvas, areas.field);

    arena::help_bar(
        frame,
        areas.help,
        &["←→↓ Lean", "Space / Click Fire", "Enter Start", "X Stop", "Esc Menu"],
    );
    arena::overlay(frame, areas.field, session.phase(), session.summary(), app.status.as_deref(), ACCENT);
    areas.field
}
