use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::input::Focus;
use crate::model::snapshot::PercentChangeType;
use crate::poller::PollerPhase;

use super::TileView;

pub const TILE_WIDTH: u16 = 24;
pub const TILE_HEIGHT: u16 = 5;

fn change_color(change_type: PercentChangeType) -> Color {
    match change_type {
        PercentChangeType::Increased => Color::Green,
        PercentChangeType::Decreased => Color::Red,
        PercentChangeType::Default => Color::White,
    }
}

pub struct TickerTile<'a> {
    tile: &'a TileView,
}

impl<'a> TickerTile<'a> {
    pub fn new(tile: &'a TileView) -> Self {
        Self { tile }
    }
}

impl Widget for TickerTile<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.tile.label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let lines = if self.tile.loading {
            vec![
                Line::from(Span::styled("loading...", Style::default().fg(Color::DarkGray))),
                Line::from(Span::styled("░░░░░░░░", Style::default().fg(Color::DarkGray))),
            ]
        } else {
            vec![
                Line::from(Span::styled(
                    self.tile.signed_change(),
                    Style::default().fg(change_color(self.tile.change_type)),
                )),
                Line::from(Span::styled(
                    format!("${}", self.tile.price),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
            ]
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Tiles laid out left to right, wrapping onto new rows.
pub struct TickerBoard<'a> {
    tiles: &'a [TileView],
}

impl<'a> TickerBoard<'a> {
    pub fn new(tiles: &'a [TileView]) -> Self {
        Self { tiles }
    }
}

impl Widget for TickerBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.tiles.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No pairs tracked. Press [A] to add one.",
                Style::default().fg(Color::DarkGray),
            )))
            .render(area, buf);
            return;
        }

        let per_row = (area.width / TILE_WIDTH).max(1) as usize;
        for (i, tile) in self.tiles.iter().enumerate() {
            let col = (i % per_row) as u16;
            let row = (i / per_row) as u16;
            let y = area.y + row * TILE_HEIGHT;
            if y + TILE_HEIGHT > area.y + area.height {
                break;
            }
            let x = area.x + col * TILE_WIDTH;
            let width = TILE_WIDTH.min(area.x + area.width - x);
            TickerTile::new(tile).render(Rect::new(x, y, width, TILE_HEIGHT), buf);
        }
    }
}

pub struct AddPairForm<'a> {
    pub label: &'a str,
    pub symbol: &'a str,
    pub focus: Focus,
    pub can_submit: bool,
}

impl AddPairForm<'_> {
    fn input<'b>(title: &'b str, value: &'b str, placeholder: &'b str, focused: bool) -> Paragraph<'b> {
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let text = if value.is_empty() && !focused {
            Span::styled(placeholder, Style::default().fg(Color::DarkGray))
        } else if focused {
            Span::styled(format!("{}_", value), Style::default().fg(Color::White))
        } else {
            Span::styled(value, Style::default().fg(Color::White))
        };
        Paragraph::new(Line::from(text)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
    }
}

impl Widget for AddPairForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ])
            .split(area);

        Self::input(
            " Label ",
            self.label,
            "Binance coin ticker label",
            self.focus == Focus::Label,
        )
        .render(cols[0], buf);
        Self::input(
            " Symbol ",
            self.symbol,
            "e.g. BTCBUSD",
            self.focus == Focus::Symbol,
        )
        .render(cols[1], buf);

        let button_style = if self.can_submit {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Paragraph::new(Line::from(Span::styled("Add ticker", button_style)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(cols[2], buf);
    }
}

pub struct StatusBar<'a> {
    pub phase: PollerPhase,
    pub toggle_label: &'a str,
    pub interval_ms: u64,
    pub fetch_count: u64,
    pub failed_fetch_count: u64,
    pub last_update: Option<DateTime<Local>>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let phase = match self.phase {
            PollerPhase::Initial => Span::styled(" LOADING ", Style::default().fg(Color::Yellow)),
            PollerPhase::Active => Span::styled(" LIVE ", Style::default().fg(Color::Green)),
            PollerPhase::Paused => Span::styled(
                " PAUSED ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        // Red while running (stops), green while paused (starts).
        let toggle_color = if matches!(self.phase, PollerPhase::Paused) {
            Color::Green
        } else {
            Color::Red
        };
        let updated = self
            .last_update
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "---".to_string());

        let line = Line::from(vec![
            Span::styled(
                " ticker-board ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            phase,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("[{}]", self.toggle_label),
                Style::default().fg(toggle_color),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("every {}ms", self.interval_ms),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("updated: {}", updated),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("fetches: {} ({} failed)", self.fetch_count, self.failed_fetch_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar<'a> {
    pub focus: Focus,
    pub toggle_label: &'a str,
}

impl Widget for KeybindBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(Color::Yellow);
        let desc = Style::default().fg(Color::DarkGray);
        let line = if self.focus.is_input() {
            Line::from(vec![
                Span::styled(" [Tab]", key),
                Span::styled(" next field  ", desc),
                Span::styled("[Enter]", key),
                Span::styled(" add ticker  ", desc),
                Span::styled("[Esc]", key),
                Span::styled(" back to board  ", desc),
            ])
        } else {
            Line::from(vec![
                Span::styled(" [Q]", key),
                Span::styled("uit  ", desc),
                Span::styled("[A]", key),
                Span::styled("dd pair  ", desc),
                Span::styled("[Space]", key),
                Span::styled(format!(" {}  ", self.toggle_label), desc),
            ])
        };

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
