//! Live playback: audio stream plus terminal UI.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hyper_tremolo::{
    io::{AudioBuffer, BandPhases, ControlMessage},
    HyperTremolo, Parameters, ProcessSpec, Processor, MAX_BLOCK_SIZE,
};
use rtrb::RingBuffer;

use super::{
    source::{Source, SourceSpec},
    ui::UiApp,
};

const CONTROL_QUEUE: usize = 256;
const SCOPE_QUEUE: usize = 16_384;
const PHASE_QUEUE: usize = 64;

pub fn run(params: Parameters, source_spec: SourceSpec) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f64;
    let channels = config.channels() as usize;

    let mut source = Source::open(&source_spec, sample_rate)?;
    let mut processor = HyperTremolo::with_parameters(&params);
    processor.prepare(&ProcessSpec::new(sample_rate, MAX_BLOCK_SIZE, channels));

    let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);
    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE);
    let (mut phase_tx, phase_rx) = RingBuffer::<BandPhases>::new(PHASE_QUEUE);
    let bypass = Arc::new(AtomicBool::new(false));
    let bypass_audio = bypass.clone();

    let mut input = AudioBuffer::new(channels, MAX_BLOCK_SIZE);
    let mut output = AudioBuffer::new(channels, MAX_BLOCK_SIZE);

    log::info!(
        "playing {:?} at {} Hz, {} channels",
        source_spec,
        sample_rate,
        channels
    );

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            processor.drain_messages(&mut control_rx);
            let bypassed = bypass_audio.load(Ordering::Relaxed);

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                source.fill(&mut input.block_mut(frames));
                processor.process(&input.block(frames), &mut output.block_mut(frames), bypassed);

                // Interleave into the host buffer
                let block = output.block(frames);
                let out_off = frames_written * channels;
                for (ch, samples) in block.channels().enumerate() {
                    for (i, &s) in samples.iter().enumerate() {
                        data[out_off + i * channels + ch] = s;
                    }
                }

                // Scope shows the first channel; drop samples if the UI lags
                for &s in block.channel(0) {
                    if scope_tx.push(s).is_err() {
                        break;
                    }
                }

                frames_written += frames;
            }

            let _ = phase_tx.push(processor.band_phases());
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )?;

    stream.play()?;

    let mut terminal = ratatui::init();
    let mut app = UiApp::new(
        scope_rx,
        phase_rx,
        control_tx,
        bypass,
        params,
        sample_rate as f32,
    );
    let result = app.run(&mut terminal);
    ratatui::restore();

    drop(stream);
    result
}
