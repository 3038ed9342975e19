use crate::shared::{APP_NAME, DisplayState, FormField, FormView, Phase, SetView};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use super::deck::draw_deck;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // whatever screen we're on
        ])
        .split(area);

    draw_header(frame, sections[0]);
    match (state.phase, &state.set) {
        (Phase::Live, Some(set)) => draw_live(frame, sections[1], set),
        (Phase::Loading, _) => draw_loading(frame, sections[1], &state.form, blink_on),
        _ => draw_form(frame, sections[1], &state.form, state.status_text.as_deref()),
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            APP_NAME,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "ARTIFICIAL INTELLIGENCE DJ ENGINE",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_form(frame: &mut Frame, area: Rect, form: &FormView, status: Option<&str>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" CONFIGURE VIBE ");

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = form.focus == field;
        let value = match field {
            FormField::Scene => format!("{}{}", form.scene, if focused { "_" } else { "" }),
            FormField::MusicProfile => {
                format!("{}{}", form.music_profile, if focused { "_" } else { "" })
            }
            FormField::Duration => format!("< {} >", form.duration_minutes),
            FormField::Intensity => format!("< {} >", form.intensity.label()),
        };
        let marker = if focused { "▶ " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", field.label()),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::styled(format!("    {value}"), value_style)));
        lines.push(Line::from(""));
    }

    if let Some(msg) = status {
        lines.push(Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "tab: next field   ←/→: adjust   enter: INITIALIZE DJ AI   esc: quit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_loading(frame: &mut Frame, area: Rect, form: &FormView, blink_on: bool) {
    let indicator = if blink_on { "◉" } else { "○" };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{indicator} ANALYZING MUSIC LIBRARIES..."),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("{} // {}", form.scene, form.music_profile)),
        Line::from(Span::styled("x: cancel   esc: quit", Style::default().fg(Color::DarkGray))),
    ];
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        area,
    );
}

fn draw_live(frame: &mut Frame, area: Rect, set: &SetView) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // status
            Constraint::Min(10),    // decks
            Constraint::Length(5),  // mixer
            Constraint::Length(8),  // queue
        ])
        .split(area);

    draw_status(frame, sections[0], set);

    let decks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(sections[1]);
    draw_deck(frame, decks[0], &set.left);
    draw_deck(frame, decks[1], &set.right);

    draw_mixer(frame, sections[2], set);
    draw_queue(frame, sections[3], set);
}

fn draw_status(frame: &mut Frame, area: Rect, set: &SetView) {
    let caption = if set.caption.is_empty() {
        "Syncing global vibes..."
    } else {
        set.caption.as_str()
    };
    let play = if set.playing { "▶ PLAYING" } else { "⏸ PAUSED" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" CURRENT SET: {} ", set.music_profile.to_uppercase()))
        .title(
            Line::from(format!(" TRACKS REM. {}  {play} ", set.tracks_remaining)).right_aligned(),
        );
    let body = Paragraph::new(Line::from(Span::styled(
        format!("\"{caption}\""),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    )))
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(body, area);
}

// where the crossfader knob sits on a track of `width` cells
pub fn crossfader_position(crossfade: f64, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let pct = ((crossfade.clamp(-1.0, 1.0) + 1.0) * 50.0) / 100.0;
    ((width - 1) as f64 * pct).round() as usize
}

fn draw_mixer(frame: &mut Frame, area: Rect, set: &SetView) {
    let block = Block::default().borders(Borders::ALL).title(" MIXER ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(inner);

    let gain = Gauge::default()
        .block(Block::default().title("MASTER GAIN"))
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(set.volume.clamp(0.0, 1.0))
        .label(format!("{:.0}%", set.volume * 100.0));
    frame.render_widget(gain, cols[0]);

    let width = cols[1].width.saturating_sub(2) as usize;
    let knob = crossfader_position(set.crossfade, width);
    let rail: String = (0..width).map(|i| if i == knob { '█' } else { '─' }).collect();
    let fader = Paragraph::new(vec![
        Line::from(Span::styled("CROSSFADER", Style::default().fg(Color::DarkGray))),
        Line::from(rail),
        Line::from(Span::styled(
            format!("LEFT DECK{:>w$}", "RIGHT DECK", w = width.saturating_sub(9)),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(fader, cols[1]);

    let hints = Paragraph::new(vec![
        Line::from("space: play/pause"),
        Line::from("[ ]: gain"),
        Line::from(Span::styled("x: STOP SET", Style::default().fg(Color::Red))),
    ])
    .alignment(Alignment::Right);
    frame.render_widget(hints, cols[2]);
}

fn draw_queue(frame: &mut Frame, area: Rect, set: &SetView) {
    let block = Block::default().borders(Borders::ALL).title(" UPCOMING IN QUEUE ");
    let mut items: Vec<ListItem> = set
        .upcoming
        .iter()
        .map(|row| {
            let dim = Style::default().fg(Color::DarkGray);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:02}  ", row.position), dim),
                Span::styled(row.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", row.artist.to_uppercase()),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  {:.0} BPM", row.bpm),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(format!("  {}", row.transition.label()), dim),
            ]))
        })
        .collect();
    if set.last_track {
        items.push(ListItem::new(Span::styled(
            "Last track playing...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    frame.render_widget(List::new(items).block(block), area);
}
