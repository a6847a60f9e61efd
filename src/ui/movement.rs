use ratatui::prelude::*;
use ratatui::widgets::canvas::{Circle, Line as CanvasLine};
use ratatui::widgets::*;

use crate::app::App;
use crate::games::geometry;
use crate::games::move_trainer::{Bullet, Runner};
use crate::ui::arena;

const ACCENT: Color = Color::Rgb(80, 220, 120);
const BACKGROUND: Color = Color::Rgb(10, 16, 12);
// High bullets are yellow: crouch under them. Low ones are red: jump.
const HIGH_BULLET: Color = Color::Rgb(255, 230, 90);
const LOW_BULLET: Color = Color::Rgb(255, 80, 80);

fn bullet_color(bullet: &Bullet) -> Color {
    if bullet.elevated {
        HIGH_BULLET
    } else {
        LOW_BULLET
    }
}

fn posture(runner: &Runner) -> (&'static str, Color) {
    if runner.is_airborne() {
        ("Airborne", Color::Rgb(120, 230, 255))
    } else if runner.sliding {
        ("Sliding", Color::Rgb(255, 170, 60))
    } else if runner.crouching {
        ("Crouching", Color::Rgb(255, 210, 90))
    } else {
        ("Standing", Color::Rgb(80, 255, 140))
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let areas = arena::split(frame, area, "🏃 Movement Trainer", ACCENT);
    let session = &app.movement;
    let rules = session.rules();
    let field = session.field();
    let runner = rules.player();
    let (stance, stance_color) = posture(runner);

    let status = Line::from(vec![
        Span::styled(
            format!(" Time: {:.1}s ", session.elapsed_secs()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        arena::separator(),
        Span::styled(format!("Level: {} ", session.level()), Style::default().fg(Color::Green)),
        arena::separator(),
        Span::styled(format!("Bullets: {} ", rules.bullets().len()), Style::default().fg(Color::Red)),
        arena::separator(),
        Span::styled(format!("Dodged: {} ", rules.escaped()), Style::default().fg(Color::Cyan)),
        arena::separator(),
        Span::styled(stance, Style::default().fg(stance_color)),
    ]);
    frame.render_widget(Paragraph::new(status), areas.status);

    let canvas = arena::playfield(field, BACKGROUND, |ctx| {
        // Jumps lift the sprite; the shadow stays on the ground.
        let body = if runner.is_low() { runner.hitbox() } else { runner.rect };
        let lifted = geometry::Rect::new(body.x, body.y - runner.jump_height, body.width, body.height);
        if runner.jumping {
            let foot = arena::flip(field, runner.rect.y + runner.rect.height);
            ctx.draw(&CanvasLine {
                x1: runner.rect.x as f64,
                y1: foot,
                x2: (runner.rect.x + runner.rect.width) as f64,
                y2: foot,
                color: Color::Rgb(40, 60, 45),
            });
        }
        arena::draw_rect(ctx, field, &lifted, stance_color);
        ctx.layer();
        for bullet in rules.bullets() {
            let (x, y) = bullet.rect.center();
            ctx.draw(&Circle {
                x: x as f64,
                y: arena::flip(field, y),
                radius: bullet.radius as f64,
                color: bullet_color(bullet),
            });
        }
    });
    frame.render_widget(canvas, areas.field);

    arena::help_bar(
        frame,
        areas.help,
        &["WASD/↑↓←→ Move", "Space Jump", "C Crouch/Slide", "Enter Start", "X Stop", "Esc Menu"],
    );
    arena::overlay(frame, areas.field, session.phase(), session.summary(), app.status.as_deref(), ACCENT);
    areas.field
}
