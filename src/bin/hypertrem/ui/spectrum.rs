//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the output, read at log-spaced frequencies and drawn
//! on a log axis with the crossover frequency marked.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 64;
const MIN_FREQ: f64 = 20.0;
const MAX_FREQ: f64 = 20_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index read for each display bin
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB) pairs
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to
    /// `update`.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let sample_rate = f64::from(sample_rate);
        let max_freq = (sample_rate / 2.0).min(MAX_FREQ).max(MIN_FREQ + 1.0);
        let ratio = max_freq / MIN_FREQ;
        let half = (buffer_len / 2).max(1);

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = MIN_FREQ * ratio.powf(t);
            let index = ((freq * buffer_len as f64 / sample_rate).round() as usize).min(half - 1);
            bin_indices.push(index);
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Recompute from the latest output samples.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }

        self.fft.process(&mut self.scratch);

        for ((_, magnitude_db), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let power = f64::from(self.scratch[index].norm_sqr()).max(1e-12);
            *magnitude_db = (10.0 * power.log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum with a vertical marker at `crossover_hz`.
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)], crossover_hz: f64) {
    let block = Block::default()
        .title(format!(" Spectrum (crossover {:.0} Hz) ", crossover_hz))
        .borders(Borders::ALL);

    let max_db = spectrum.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);
    let top = max_db.max(0.0) + 10.0;

    let x = crossover_hz.clamp(MIN_FREQ, MAX_FREQ).log10();
    let marker = [(x, FLOOR_DB), (x, top)];

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(spectrum),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&marker),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([MIN_FREQ.log10(), MAX_FREQ.log10()])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, top])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
