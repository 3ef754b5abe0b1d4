//! Status bar widget - sample rate, bypass state and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub struct StatusInfo {
    pub sample_rate: f32,
    pub bypassed: bool,
    /// Feedback for the last command, may be empty
    pub message: &'static str,
}

pub fn render_status(frame: &mut Frame, area: Rect, status: &StatusInfo, stats: &AudioStats) {
    let block = Block::default()
        .title(" hypertrem ")
        .borders(Borders::ALL);

    let (symbol, state, color) = if status.bypassed {
        ("⏸", "Bypassed", Color::Yellow)
    } else {
        ("▶", "Active", Color::Green)
    };

    let peak_db = 20.0 * stats.peak.max(1e-5).log10();

    let line = Line::from(vec![
        Span::styled(format!(" {} {}  ", symbol, state), Style::default().fg(color)),
        Span::styled(
            format!("{:.1}kHz  ", status.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Peak: {:.2} ({:.1} dB)  RMS: {:.2}  ",
                stats.peak, peak_db, stats.rms
            ),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(status.message, Style::default().fg(Color::Cyan)),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
