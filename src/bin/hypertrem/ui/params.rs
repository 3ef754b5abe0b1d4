//! Parameter list widget

use hyper_tremolo::{params::ParamId, Parameters};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the normalised position gauge
const GAUGE_WIDTH: usize = 12;

fn gauge(normalized: f64) -> String {
    let filled = (normalized.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(GAUGE_WIDTH - filled))
}

/// One row per parameter; the selected row is highlighted.
pub fn render_params(frame: &mut Frame, area: Rect, params: &Parameters, selected: usize) {
    let block = Block::default()
        .title(" Parameters ")
        .borders(Borders::ALL);

    let lines: Vec<Line> = ParamId::ALL
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!(" {:<20}", id.name()), style),
                Span::styled(
                    format!(" {} ", gauge(params.get_normalized(id))),
                    Style::default().fg(Color::Green),
                ),
                Span::styled(id.display(params), Style::default().fg(Color::Yellow)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
