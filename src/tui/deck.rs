use rand::Rng;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Sparkline};

use crate::pipeline::deck::DeckSide;
use crate::shared::DeckView;

const METER_BARS: usize = 40;
const PLATTER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub fn deck_color(side: DeckSide) -> Color {
    match side {
        DeckSide::Left => Color::Magenta,
        DeckSide::Right => Color::Cyan,
    }
}

// quarter-turn glyph for the record, driven by the deck's progress
pub fn platter_glyph(rotation_degrees: f64) -> &'static str {
    let quarter = (rotation_degrees.rem_euclid(360.0) / 90.0) as usize;
    PLATTER[quarter.min(3)]
}

// random bars while the deck is live, flat otherwise
pub fn meter_levels(spinning: bool, energy: Option<u8>) -> Vec<u64> {
    if !spinning {
        return vec![5; METER_BARS];
    }
    let ceiling = 40 + u64::from(energy.unwrap_or(5)) * 6;
    let mut rng = rand::thread_rng();
    (0..METER_BARS).map(|_| rng.gen_range(10..=ceiling)).collect()
}

pub fn draw_deck(frame: &mut Frame, area: Rect, deck: &DeckView) {
    let color = deck_color(deck.side);
    let bpm = deck
        .bpm
        .map(|b| format!("{b:.0} BPM"))
        .unwrap_or_else(|| String::from("-- BPM"));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} DECK // 0{} ", deck.side.label(), deck.side.number()))
        .title(Line::from(format!(" {bpm} ")).right_aligned());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // platter + title
            Constraint::Min(3),    // level meter
            Constraint::Length(1), // time labels
            Constraint::Length(1), // progress
        ])
        .split(inner);

    let platter = if deck.spinning {
        platter_glyph(deck.rotation_degrees)
    } else {
        "●"
    };
    let title = deck.title.clone().unwrap_or_else(|| String::from("Waiting for Track..."));
    let artist = deck.artist.clone().unwrap_or_else(|| String::from("AI Curation Engine"));
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("{platter} "), Style::default().fg(color)),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(artist, Style::default().fg(Color::Gray))),
    ]);
    frame.render_widget(header, rows[0]);

    let levels = meter_levels(deck.spinning, deck.energy_level);
    let meter = Sparkline::default()
        .style(Style::default().fg(color))
        .max(100)
        .data(levels.iter().copied());
    frame.render_widget(meter, rows[1]);

    let times = Paragraph::new(Line::from(vec![
        Span::raw(deck.elapsed_label.clone()),
        Span::raw(" / "),
        Span::raw(deck.duration_label.clone()),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(times, rows[2]);

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio((deck.progress / 100.0).clamp(0.0, 1.0))
        .label("");
    frame.render_widget(progress, rows[3]);
}
