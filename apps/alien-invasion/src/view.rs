//! Drawing the playfield onto a ratatui canvas.

use campus_invasion::{Game, Rect as GameRect, Settings};
use rand::Rng;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Rectangle},
    },
};

const SHIP_COLOR: Color = Color::Rgb(30, 90, 200);
const ALIEN_COLOR: Color = Color::Rgb(40, 150, 60);
const TEXT_COLOR: Color = Color::Rgb(30, 30, 30);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Canvas coordinates grow upwards, the game's grow downwards.
fn shape(rect: &GameRect, screen_height: f32, color: Color) -> Rectangle {
    Rectangle {
        x: rect.x as f64,
        y: (screen_height - rect.bottom()) as f64,
        width: rect.width as f64,
        height: rect.height as f64,
        color,
    }
}

/// Score rounded to the nearest ten, with thousands separators.
pub fn format_score(score: u64) -> String {
    let rounded = (score + 5) / 10 * 10;
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Draw one frame and return the canvas area used for mouse hit-testing.
pub fn draw<R: Rng>(frame: &mut Frame, game: &Game<R>) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(frame.size());

    frame.render_widget(status_line(game), chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Alien Invasion ");
    let inner = block.inner(chunks[1]);

    let settings = game.settings();
    let (width, height) = (settings.screen_width, settings.screen_height);
    let canvas = Canvas::default()
        .block(block)
        .background_color(rgb(settings.bg_color))
        .marker(Marker::Braille)
        .x_bounds([0.0, width as f64])
        .y_bounds([0.0, height as f64])
        .paint(|ctx| {
            for alien in game.aliens() {
                ctx.draw(&shape(&alien.rect, height, ALIEN_COLOR));
            }
            ctx.draw(&shape(&game.ship().rect, height, SHIP_COLOR));
            for bullet in game.bullets() {
                ctx.draw(&shape(&bullet.rect, height, rgb(settings.bullet_color)));
            }
            for bullet in game.alien_bullets() {
                ctx.draw(&shape(
                    &bullet.rect,
                    height,
                    rgb(settings.alien_bullet_color),
                ));
            }

            if !game.is_active() {
                ctx.layer();
                let button = game.play_button();
                ctx.draw(&shape(&button.rect, height, rgb(button.button_color)));
                let (cx, cy) = button.rect.center();
                let cell_width = width as f64 / inner.width.max(1) as f64;
                let half_label = button.label.len() as f64 * cell_width / 2.0;
                ctx.print(
                    cx as f64 - half_label,
                    (height - cy) as f64,
                    Line::styled(
                        button.label,
                        Style::default()
                            .fg(rgb(button.text_color))
                            .bg(rgb(button.button_color))
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    frame.render_widget(canvas, chunks[1]);

    inner
}

fn status_line<R: Rng>(game: &Game<R>) -> Paragraph<'static> {
    let stats = game.stats();
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(TEXT_COLOR)
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" Score ", label),
        Span::styled(format!(" {} ", format_score(stats.score)), value),
        Span::styled("  High ", label),
        Span::styled(format!(" {} ", format_score(stats.high_score)), value),
        Span::styled("  Level ", label),
        Span::styled(format!(" {} ", stats.level), value),
        Span::styled("  Ships ", label),
        Span::styled(format!(" {} ", "▲".repeat(stats.ships_left as usize)), value),
    ];
    if !game.is_active() {
        spans.push(Span::styled(
            "   P / click Play to start, Q to quit",
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            "   ←/→ move, Space fire, Q quit",
            Style::default().fg(Color::DarkGray),
        ));
    }

    Paragraph::new(Line::from(spans))
}

/// Map a terminal cell inside `area` to the game point under its centre.
pub fn cell_to_game(
    area: Rect,
    settings: &Settings,
    column: u16,
    row: u16,
) -> Option<(f32, f32)> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }

    let fx = (column - area.x) as f32 + 0.5;
    let fy = (row - area.y) as f32 + 0.5;
    Some((
        fx / area.width as f32 * settings.screen_width,
        fy / area.height as f32 * settings.screen_height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(112), "110");
        assert_eq!(format_score(75), "80");
        assert_eq!(format_score(1_234_567), "1,234,570");
    }

    #[test]
    fn test_centre_cell_hits_play_button() {
        let settings = Settings::default();
        let area = Rect::new(1, 2, 120, 40);

        let (x, y) = cell_to_game(area, &settings, 61, 22).unwrap();
        let button = campus_invasion::button::Button::play(&settings);
        assert!(button.rect.collidepoint(x, y));
    }

    #[test]
    fn test_cells_outside_canvas_map_to_nothing() {
        let settings = Settings::default();
        let area = Rect::new(1, 2, 120, 40);

        assert_eq!(cell_to_game(area, &settings, 0, 10), None);
        assert_eq!(cell_to_game(area, &settings, 10, 42), None);
    }
}
