//! Band phase readout

use std::f64::consts::TAU;

use hyper_tremolo::{io::BandPhases, Parameters};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const DIAL_WIDTH: usize = 24;

/// A row of dots with a marker at `phase`'s position within one turn.
fn dial(phase: f64) -> String {
    let position = ((phase.rem_euclid(TAU) / TAU) * DIAL_WIDTH as f64) as usize;
    (0..DIAL_WIDTH)
        .map(|i| if i == position.min(DIAL_WIDTH - 1) { '●' } else { '·' })
        .collect()
}

pub fn render_phases(frame: &mut Frame, area: Rect, phases: &BandPhases, params: &Parameters) {
    let block = Block::default()
        .title(" Phase ")
        .borders(Borders::ALL);

    let label = Style::default().fg(Color::DarkGray);
    let row = |name: &str, phase: f64, color: Color| {
        Line::from(vec![
            Span::styled(format!(" {:<7}", name), label),
            Span::styled(dial(phase), Style::default().fg(color)),
            Span::styled(
                format!(" {:>6.1}°", phase.to_degrees()),
                Style::default().fg(Color::White),
            ),
        ])
    };

    let high_hz = params.oscillator_rate() * params.tremolo_ratio;
    let lines = vec![
        row("low", phases.low, Color::Cyan),
        row("high", phases.high, Color::Magenta),
        Line::default(),
        row("offset", phases.audible_difference(), Color::Yellow),
        Line::default(),
        Line::from(Span::styled(
            format!(
                " rates  {:.2} Hz / {:.2} Hz",
                params.oscillator_rate(),
                high_hz
            ),
            label,
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
