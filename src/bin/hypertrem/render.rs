//! Offline rendering to WAV.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use hyper_tremolo::{io::AudioBuffer, HyperTremolo, Parameters, ProcessSpec, Processor};

use super::source::{Source, SourceSpec, WavData};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Destination WAV file
    #[arg(long, short)]
    pub output: PathBuf,
    /// Process this WAV file instead of a generated source
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// sweep, noise or sine:<hz>; ignored with --input
    #[arg(long, default_value = "sweep")]
    pub source: SourceSpec,
    /// Length of generated sources
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f64,
    /// Sample rate of generated sources
    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,
    /// Channel count of generated sources
    #[arg(long, default_value_t = 2)]
    pub channels: u16,
    /// Samples per processing block
    #[arg(long, default_value_t = 512)]
    pub block_size: usize,
    /// JSON preset to render with
    #[arg(long)]
    pub preset: Option<PathBuf>,
    /// Lock the band phases before the first block
    #[arg(long)]
    pub sync: bool,
}

pub fn run(args: &RenderArgs, params: Parameters) -> EyreResult<()> {
    if args.block_size == 0 || args.block_size > hyper_tremolo::MAX_BLOCK_SIZE {
        return Err(eyre!(
            "block size must be between 1 and {}",
            hyper_tremolo::MAX_BLOCK_SIZE
        ));
    }

    let (mut source, sample_rate, num_channels, total_frames) = match &args.input {
        Some(path) => {
            let data = WavData::open(path)?;
            let sample_rate = data.sample_rate;
            let num_channels = data.channels.len();
            let frames = data.num_frames();
            (Source::from_wav(data), sample_rate, num_channels, frames)
        }
        None => {
            if args.seconds <= 0.0 {
                return Err(eyre!("--seconds must be positive"));
            }
            let sample_rate = args.sample_rate;
            let source = Source::open(&args.source, f64::from(sample_rate))?;
            let frames = (args.seconds * f64::from(sample_rate)).round() as usize;
            (source, sample_rate, usize::from(args.channels), frames)
        }
    };

    let spec = ProcessSpec::new(f64::from(sample_rate), args.block_size, num_channels);
    let mut processor = HyperTremolo::with_parameters(&params);
    processor.prepare(&spec);
    if args.sync {
        processor.sync();
    }

    let wav_spec = WavSpec {
        channels: num_channels as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&args.output, wav_spec)
        .wrap_err_with(|| format!("failed to create {}", args.output.display()))?;

    let mut input = AudioBuffer::new(num_channels, args.block_size);
    let mut output = AudioBuffer::new(num_channels, args.block_size);
    let mut frames_written = 0;
    let mut peak = 0.0f32;

    while frames_written < total_frames {
        let frames = (total_frames - frames_written).min(args.block_size);

        source.fill(&mut input.block_mut(frames));
        processor.process(&input.block(frames), &mut output.block_mut(frames), false);

        let block = output.block(frames);
        for i in 0..frames {
            for channel in block.channels() {
                let sample = channel[i];
                peak = peak.max(sample.abs());
                writer.write_sample(sample)?;
            }
        }

        frames_written += frames;
    }

    writer.finalize()?;

    let phases = processor.band_phases();
    log::info!(
        "rendered {} frames x {} channels to {} (peak {:.3}, band difference {:.4} rad)",
        total_frames,
        num_channels,
        args.output.display(),
        peak,
        phases.audible_difference()
    );

    Ok(())
}
