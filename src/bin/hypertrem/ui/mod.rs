//! TUI module for hypertrem
//!
//! Parameter editing, band phase readout and real-time visualization of the
//! processed output.

mod params;
mod phase;
mod spectrum;
mod status;
mod waveform;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use hyper_tremolo::{
    io::{BandPhases, ControlMessage},
    params::ParamId,
    Parameters,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use params::render_params;
use phase::render_phases;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats, StatusInfo};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;
/// Normalised step for one arrow key press
const NUDGE: f64 = 0.01;
/// Normalised step with shift held
const NUDGE_FINE: f64 = 0.001;

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for processed audio samples
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for oscillator phases
    phase_rx: Consumer<BandPhases>,
    /// Commands to the audio thread
    control_tx: Producer<ControlMessage>,
    bypass: Arc<AtomicBool>,
    params: Parameters,
    selected: usize,
    phases: BandPhases,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    /// Last command feedback shown in the status bar
    message: &'static str,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        audio_rx: Consumer<f32>,
        phase_rx: Consumer<BandPhases>,
        control_tx: Producer<ControlMessage>,
        bypass: Arc<AtomicBool>,
        params: Parameters,
        sample_rate: f32,
    ) -> Self {
        Self {
            audio_rx,
            phase_rx,
            control_tx,
            bypass,
            params,
            selected: 0,
            phases: BandPhases::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            message: "",
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_phases();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let fine = key.modifiers.contains(KeyModifiers::SHIFT);
                        self.handle_key(key.code, fine);
                    }
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples, keeping the last VIS_BUFFER_SIZE
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    /// Keep only the latest phase snapshot
    fn poll_phases(&mut self) {
        while let Ok(phases) = self.phase_rx.pop() {
            self.phases = phases;
        }
    }

    fn handle_key(&mut self, key: KeyCode, fine: bool) {
        let step = if fine { NUDGE_FINE } else { NUDGE };

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.selected = self
                    .selected
                    .checked_sub(1)
                    .unwrap_or(ParamId::ALL.len() - 1);
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % ParamId::ALL.len();
            }
            KeyCode::Left => self.adjust(-step),
            KeyCode::Right => self.adjust(step),
            KeyCode::Char('s') => self.send(ControlMessage::Sync, "sync"),
            KeyCode::Char('r') => self.send(ControlMessage::Reset, "reset"),
            KeyCode::Char('b') => {
                let bypassed = !self.bypass.load(Ordering::Relaxed);
                self.bypass.store(bypassed, Ordering::Relaxed);
                self.message = if bypassed { "bypassed" } else { "active" };
            }
            _ => {}
        }
    }

    fn adjust(&mut self, delta: f64) {
        let id = ParamId::ALL[self.selected];
        self.params.nudge(id, delta);
        self.send(ControlMessage::Params(self.params), "");
    }

    fn send(&mut self, message: ControlMessage, feedback: &'static str) {
        if self.control_tx.push(message).is_err() {
            self.message = "control queue full";
            return;
        }
        if !feedback.is_empty() {
            self.message = feedback;
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: status, controls, waveform, spectrum, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Length(14), // Parameters and phases
                Constraint::Length(8),  // Waveform
                Constraint::Min(6),     // Spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let status = StatusInfo {
            sample_rate: self.sample_rate,
            bypassed: self.bypass.load(Ordering::Relaxed),
            message: self.message,
        };
        render_status(
            frame,
            chunks[0],
            &status,
            &AudioStats::from_buffer(&self.audio_buffer),
        );

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        render_params(frame, controls[0], &self.params, self.selected);
        render_phases(frame, controls[1], &self.phases, &self.params);

        render_waveform(frame, chunks[2], &self.audio_buffer);
        render_spectrum(
            frame,
            chunks[3],
            self.spectrum.data(),
            self.params.crossover_frequency,
        );

        let help = Paragraph::new(
            " [↑↓] Select  [←→] Adjust (Shift: fine)  [S] Sync  [R] Reset  [B] Bypass  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
