use ratatui::prelude::*;
use ratatui::widgets::*;

const BANNER: &str = r#"
 ╔═════════════════════════════════════════════════════╗
 ║                                                     ║
 ║     R  E  F  L  E  X  C  A  D  E                    ║
 ║     ─────────────────────────────                   ║
 ║     reflex drills for the terminal                  ║
 ║                                                     ║
 ╚═════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 3] = [
    GameTile { key: "1", icon: "🎯", name: "Aim Trainer", desc: "Click targets\nfor 60 seconds!", color: Color::Rgb(255, 120, 90), border_color: Color::Rgb(140, 60, 45) },
    GameTile { key: "2", icon: "✈", name: "Sky Defender", desc: "Lean into lanes,\nshoot the sky!", color: Color::Rgb(100, 180, 255), border_color: Color::Rgb(50, 90, 140) },
    GameTile { key: "3", icon: "🏃", name: "Movement", desc: "Dodge, jump and\nslide to survive!", color: Color::Rgb(80, 220, 120), border_color: Color::Rgb(40, 120, 60) },
];

const KEY_STYLE: Style = Style::new().fg(Color::Rgb(80, 200, 255));
const TEXT_STYLE: Style = Style::new().fg(Color::Rgb(140, 140, 140));

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];

    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(
            desc_line,
            Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) }),
        )));
    }

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to open",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn control_line(keys: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {keys:<17}"), KEY_STYLE),
        Span::styled(what, TEXT_STYLE),
    ])
}

fn game_controls(game_idx: usize) -> Vec<Line<'static>> {
    let tile = &GAME_TILES[game_idx.min(GAME_TILES.len() - 1)];
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", tile.icon, tile.name),
            Style::default().fg(tile.color).add_modifier(Modifier::BOLD),
        )),
    ];
    let (blurb, controls): (&str, &[(&str, &str)]) = match game_idx {
        0 => (
            "  Hit as many targets as you can in a minute.",
            &[("Mouse click", "Shoot at pointer"), ("↑ ↓ ← →", "Move crosshair"), ("Space", "Shoot at crosshair")],
        ),
        1 => (
            "  Three lanes, three lives. Meteors 10, UFOs 20.",
            &[("← / →", "Lean left / right"), ("↓", "Back to centre"), ("Space / click", "Fire missile")],
        ),
        _ => (
            "  Bullets home in on you. Survive as long as you can.",
            &[("WASD / ↑ ↓ ← →", "Move"), ("Space", "Jump over bullets"), ("C (+ move)", "Crouch / slide")],
        ),
    };
    lines.push(Line::from(Span::styled(blurb, Style::default().fg(Color::Rgb(100, 100, 120)))));
    lines.push(Line::from(""));
    lines.extend(controls.iter().map(|&(k, w)| control_line(k, w)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(7),  // Game tiles
            Constraint::Min(10),    // Controls area
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Warm up your hands, eyes and legs ⚡  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Trainers: ←→ Select, Enter to Open ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(games_inner);
    for (i, tile) in GAME_TILES.iter().enumerate() {
        render_game_tile(frame, cols[i], tile, selected_game == i);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let mut nav = vec![
        Line::from(""),
        Line::from(Span::styled("  🔧 Navigation", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))),
        control_line("Tab / Shift+Tab", "Switch tabs"),
        control_line("1-3", "Open trainer"),
        control_line("Esc", "Stop and return Home"),
        control_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  🎮 In a trainer", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))),
    ];
    nav.push(control_line("Enter", "Start a round"));
    nav.push(control_line("X", "Stop the round"));
    let controls = Paragraph::new(nav).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let tile = &GAME_TILES[selected_game.min(GAME_TILES.len() - 1)];
    let game_ctrl = Paragraph::new(game_controls(selected_game)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" 🎮 {} Control ", tile.name))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);
}
