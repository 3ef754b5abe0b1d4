//! Test signals and WAV input for the host.

use std::{
    f64::consts::TAU,
    path::{Path, PathBuf},
    str::FromStr,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavReader};
use hyper_tremolo::io::AudioBlockMut;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Length of one pass of the log sweep.
const SWEEP_SECONDS: f64 = 10.0;
const SWEEP_START_HZ: f64 = 20.0;
const SWEEP_END_HZ: f64 = 20_000.0;
/// Generated signals sit a little below full scale.
const LEVEL: f32 = 0.5;

/// What to feed the effect, as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    Sweep,
    Noise,
    Sine(f64),
    Wav(PathBuf),
}

impl FromStr for SourceSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sweep" => Ok(SourceSpec::Sweep),
            "noise" => Ok(SourceSpec::Noise),
            _ => {
                if let Some(freq) = s.strip_prefix("sine:") {
                    let hz: f64 = freq
                        .parse()
                        .map_err(|_| format!("invalid sine frequency '{freq}'"))?;
                    if hz.is_nan() || hz <= 0.0 {
                        return Err(format!("sine frequency must be positive, got {hz}"));
                    }
                    Ok(SourceSpec::Sine(hz))
                } else if s.ends_with(".wav") || s.ends_with(".WAV") {
                    Ok(SourceSpec::Wav(PathBuf::from(s)))
                } else {
                    Err(format!(
                        "unknown source '{s}' (expected sweep, noise, sine:<hz> or a .wav path)"
                    ))
                }
            }
        }
    }
}

/// Decoded WAV file, one vector per channel.
pub struct WavData {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl WavData {
    pub fn open(path: &Path) -> EyreResult<Self> {
        let mut reader = WavReader::open(path)
            .wrap_err_with(|| format!("failed to open {}", path.display()))?;
        let spec = reader.spec();
        let num_channels = spec.channels as usize;
        if num_channels == 0 {
            return Err(eyre!("{} has no channels", path.display()));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .wrap_err("failed to decode float samples")?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .wrap_err("failed to decode integer samples")?
            }
        };

        let frames = interleaved.len() / num_channels;
        let mut channels: Vec<Vec<f32>> = (0..num_channels)
            .map(|_| Vec::with_capacity(frames))
            .collect();
        for frame in interleaved.chunks_exact(num_channels) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        log::info!(
            "loaded {}: {} frames, {} channels, {} Hz",
            path.display(),
            frames,
            num_channels,
            spec.sample_rate
        );

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

enum Generator {
    Sweep { phase: f64, elapsed: f64 },
    Noise(StdRng),
    Sine { phase: f64, hz: f64 },
    Wav { data: WavData, position: usize },
}

/// Endless block source. WAV input loops.
pub struct Source {
    generator: Generator,
    sample_rate: f64,
}

impl Source {
    pub fn open(spec: &SourceSpec, sample_rate: f64) -> EyreResult<Self> {
        let generator = match spec {
            SourceSpec::Sweep => Generator::Sweep {
                phase: 0.0,
                elapsed: 0.0,
            },
            SourceSpec::Noise => Generator::Noise(StdRng::seed_from_u64(0x5eed)),
            SourceSpec::Sine(hz) => Generator::Sine {
                phase: 0.0,
                hz: *hz,
            },
            SourceSpec::Wav(path) => {
                let data = WavData::open(path)?;
                if data.num_frames() == 0 {
                    return Err(eyre!("{} contains no audio", path.display()));
                }
                if f64::from(data.sample_rate) != sample_rate {
                    log::warn!(
                        "{} is {} Hz, playing at {} Hz without resampling",
                        path.display(),
                        data.sample_rate,
                        sample_rate
                    );
                }
                Generator::Wav { data, position: 0 }
            }
        };

        Ok(Self::from_generator(generator, sample_rate))
    }

    /// Source over already decoded audio.
    pub fn from_wav(data: WavData) -> Self {
        let sample_rate = f64::from(data.sample_rate);
        Self::from_generator(Generator::Wav { data, position: 0 }, sample_rate)
    }

    fn from_generator(generator: Generator, sample_rate: f64) -> Self {
        Self {
            generator,
            sample_rate,
        }
    }

    /// Fill every channel of `block`. Generated signals are identical on all
    /// channels; WAV channels wrap when the block has more.
    pub fn fill(&mut self, block: &mut AudioBlockMut<'_>) {
        if block.num_channels() == 0 {
            return;
        }

        if let Generator::Wav { data, position } = &mut self.generator {
            let frames = data.num_frames();
            for ch in 0..block.num_channels() {
                let source = &data.channels[ch % data.channels.len()];
                for (i, sample) in block.channel_mut(ch).iter_mut().enumerate() {
                    *sample = source[(*position + i) % frames];
                }
            }
            *position = (*position + block.num_samples()) % frames;
            return;
        }

        let sample_rate = self.sample_rate;
        for sample in block.channel_mut(0).iter_mut() {
            *sample = match &mut self.generator {
                Generator::Sweep { phase, elapsed } => {
                    let t = (*elapsed / SWEEP_SECONDS).fract();
                    let hz = SWEEP_START_HZ * (SWEEP_END_HZ / SWEEP_START_HZ).powf(t);
                    let value = phase.sin() as f32;
                    *phase = (*phase + TAU * hz / sample_rate) % TAU;
                    *elapsed += 1.0 / sample_rate;
                    value * LEVEL
                }
                Generator::Noise(rng) => rng.gen_range(-1.0f32..1.0) * LEVEL,
                Generator::Sine { phase, hz } => {
                    let value = phase.sin() as f32;
                    *phase = (*phase + TAU * *hz / sample_rate) % TAU;
                    value * LEVEL
                }
                Generator::Wav { .. } => 0.0,
            };
        }

        for ch in 1..block.num_channels() {
            block.copy_channel(0, ch);
        }
    }
}
