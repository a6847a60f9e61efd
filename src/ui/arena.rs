//! Frame shared by the trainer views: bordered block, status bar, braille
//! playfield and help bar, plus the start and result overlays.

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Rectangle};
use ratatui::widgets::*;

use crate::games::geometry::{self, Field};
use crate::games::{EndReason, Phase, Summary};

pub const SEPARATOR: &str = " | ";

pub struct Areas {
    pub status: Rect,
    pub field: Rect,
    pub help: Rect,
}

pub fn split(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> Areas {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);
    Areas { status: chunks[0], field: chunks[1], help: chunks[2] }
}

pub fn separator() -> Span<'static> {
    Span::styled(SEPARATOR, Style::default().fg(Color::DarkGray))
}

pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[&'static str]) {
    let mut spans = vec![Span::raw(" ")];
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))));
        }
        spans.push(Span::styled(format!("{hint} "), Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Canvas whose coordinates match the playfield, with y growing downwards.
pub fn playfield<F>(field: Field, background: Color, paint: F) -> Canvas<'static, F>
where
    F: Fn(&mut Context),
{
    Canvas::default()
        .marker(Marker::Braille)
        .background_color(background)
        .x_bounds([0.0, field.width as f64])
        .y_bounds([0.0, field.height as f64])
        .paint(paint)
}

/// Flips a playfield y coordinate into canvas space.
pub fn flip(field: Field, y: f32) -> f64 {
    (field.height - y) as f64
}

pub fn draw_rect(ctx: &mut Context, field: Field, rect: &geometry::Rect, color: Color) {
    ctx.draw(&Rectangle {
        x: rect.x as f64,
        y: flip(field, rect.y + rect.height),
        width: rect.width as f64,
        height: rect.height as f64,
        color,
    });
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(area.x + (area.width - w) / 2, area.y + (area.height - h) / 2, w, h)
}

/// Start prompt while idle, result card once ended; nothing while running.
pub fn overlay(
    frame: &mut Frame,
    area: Rect,
    phase: Phase,
    summary: Option<&Summary>,
    status: Option<&str>,
    accent: Color,
) {
    let mut lines = Vec::new();
    let title = match (phase, summary) {
        (Phase::Active, _) => return,
        (Phase::Idle, _) | (Phase::Ended, None) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press ENTER to start",
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
            )));
            " Ready? "
        }
        (Phase::Ended, Some(summary)) => {
            result_lines(&mut lines, summary);
            match summary.reason {
                EndReason::TimeUp => " ⏱ TIME UP ",
                EndReason::PlayerDown => " 💥 GAME OVER ",
                EndReason::Stopped => " ■ STOPPED ",
            }
        }
    };
    if let Some(status) = status.filter(|_| phase == Phase::Idle) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(status.to_string(), Style::default().fg(Color::Rgb(255, 100, 100)))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "ENTER play · Esc menu",
        Style::default().fg(Color::Rgb(120, 120, 140)),
    )));

    let card = centered(area, 40, lines.len() as u16 + 2);
    frame.render_widget(Clear, card);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(accent))
        .title(title)
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), card);
}

fn result_lines(lines: &mut Vec<Line<'static>>, summary: &Summary) {
    let headline = match summary.kind {
        crate::games::GameKind::MovementTrainer => format!("Survived {:.1}s", summary.elapsed_secs),
        _ => format!("Score {}", summary.score),
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        headline,
        Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("Level {}", summary.level),
        Style::default().fg(Color::Green),
    )));
    match &summary.ranking {
        Some(rank) => {
            lines.push(Line::from(Span::styled(
                rank.tier.to_string(),
                Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("Top {:.1}% · {:.1} percentile", rank.top_share(), rank.percentile),
                Style::default().fg(Color::Cyan),
            )));
        }
        None => lines.push(Line::from(Span::styled("Unranked", Style::default().fg(Color::DarkGray)))),
    }
}
