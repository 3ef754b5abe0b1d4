use crate::{
    dsp::{gain::Gain, mix::DryWetMixer, oscillator::WaveShape},
    effect::{
        harmonic::{HarmonicTremolo, RateMap},
        node::{ProcessSpec, Processor},
    },
    io::{
        buffer::AudioBlockMut,
        control::{BandPhases, ControlMessage, ControlReceiver},
    },
    params::Parameters,
};

/*
Top-Level Processor
===================

    block ──┬──────────────────────────────────────────┐ dry
            └─→ [harmonic tremolo] ─→ [makeup gain] ───┴─ mix ─→ block
                                                         wet

The makeup gain only touches the wet path, so at mix = 0 the output is the
untouched input whatever the gain.

Hosts either call the individual setters between blocks, or hand a whole
`Parameters` snapshot to `apply` once per block. `drain_messages` does the
latter from a control queue, and also carries the discrete `Sync` / `Reset`
commands.
*/

pub struct HyperTremolo {
    harmonic: HarmonicTremolo,
    mixer: DryWetMixer,
    gain: Gain,
    spec: Option<ProcessSpec>,
}

impl HyperTremolo {
    pub fn new(rate_map: RateMap) -> Self {
        Self::with_harmonic(HarmonicTremolo::new(rate_map))
    }

    fn with_harmonic(harmonic: HarmonicTremolo) -> Self {
        Self {
            harmonic,
            mixer: DryWetMixer::new(1.0),
            gain: Gain::new(0.0),
            spec: None,
        }
    }

    /// Low band at the base rate, high band at `base × ratio`.
    pub fn dual() -> Self {
        Self::with_harmonic(HarmonicTremolo::dual())
    }

    /// Both bands at the base rate.
    pub fn unison() -> Self {
        Self::with_harmonic(HarmonicTremolo::unison())
    }

    /// Build with every parameter taken from `params`, ramps already settled.
    pub fn with_parameters(params: &Parameters) -> Self {
        let mut processor = Self::dual();
        processor.apply(params);
        processor
    }

    pub fn sync(&mut self) {
        self.harmonic.sync();
    }

    pub fn set_crossover_frequency(&mut self, cutoff_hz: f64) {
        self.harmonic.set_crossover_frequency(cutoff_hz);
    }

    pub fn set_crossover_resonance(&mut self, resonance: f64) {
        self.harmonic.set_crossover_resonance(resonance);
    }

    pub fn set_crossover_mix(&mut self, mix: f64) {
        self.harmonic.set_crossover_mix(mix);
    }

    pub fn set_crossover_balance(&mut self, balance: f64) {
        self.harmonic.set_crossover_balance(balance);
    }

    pub fn set_tremolo_rate(&mut self, rate_hz: f64) {
        self.harmonic.set_tremolo_rate(rate_hz);
    }

    pub fn set_tremolo_ratio(&mut self, ratio: f64) {
        self.harmonic.set_tremolo_ratio(ratio);
    }

    pub fn set_tremolo_phase(&mut self, phase: f64) {
        self.harmonic.set_tremolo_phase(phase);
    }

    pub fn set_tremolo_through_zero(&mut self, enabled: bool) {
        self.harmonic.set_tremolo_through_zero(enabled);
    }

    pub fn set_tremolo_shape(&mut self, shape: WaveShape) {
        self.harmonic.set_tremolo_shape(shape);
    }

    pub fn set_tremolo_mix(&mut self, mix: f64) {
        self.harmonic.set_tremolo_mix(mix);
    }

    /// Global dry/wet.
    pub fn set_mix(&mut self, mix: f64) {
        self.mixer.set_wet_mix_proportion(mix);
    }

    pub fn set_gain_decibels(&mut self, decibels: f64) {
        self.gain.set_gain_decibels(decibels);
    }

    /// Push every field of `params` to the processor.
    ///
    /// Unchanged values are no-ops, so calling this every block is cheap. The
    /// tremolo rate goes through `Parameters::oscillator_rate`.
    pub fn apply(&mut self, params: &Parameters) {
        self.set_gain_decibels(params.gain_db);
        self.set_mix(params.mix);
        self.set_tremolo_through_zero(params.through_zero);
        self.set_tremolo_rate(params.oscillator_rate());
        self.set_tremolo_ratio(params.tremolo_ratio);
        self.set_tremolo_phase(params.tremolo_phase);
        self.set_tremolo_shape(params.tremolo_shape.into());
        self.set_tremolo_mix(params.tremolo_mix);
        self.set_crossover_frequency(params.crossover_frequency);
        self.set_crossover_resonance(params.crossover_resonance);
        self.set_crossover_balance(params.crossover_balance);
        self.set_crossover_mix(params.crossover_mix);
    }

    /// Handle everything queued on `rx`. Returns the number of messages read.
    ///
    /// Only the newest `Params` is applied, but never later than a `Sync` or
    /// `Reset` that arrived after it.
    pub fn drain_messages<R>(&mut self, rx: &mut R) -> usize
    where
        R: ControlReceiver + ?Sized,
    {
        let mut pending: Option<Parameters> = None;
        let mut count = 0;

        while let Some(msg) = rx.pop() {
            count += 1;
            match msg {
                ControlMessage::Params(params) => pending = Some(params),
                ControlMessage::Sync => {
                    if let Some(params) = pending.take() {
                        self.apply(&params);
                    }
                    self.sync();
                }
                ControlMessage::Reset => {
                    if let Some(params) = pending.take() {
                        self.apply(&params);
                    }
                    self.reset();
                }
            }
        }

        if let Some(params) = pending {
            self.apply(&params);
        }

        count
    }

    pub fn band_phases(&self) -> BandPhases {
        self.harmonic.band_phases()
    }

    pub fn harmonic(&self) -> &HarmonicTremolo {
        &self.harmonic
    }

    pub fn mix(&self) -> f64 {
        self.mixer.wet_mix_proportion()
    }

    pub fn gain_decibels(&self) -> f64 {
        self.gain.gain_decibels()
    }

    /// Configuration of the last `prepare`, if any.
    pub fn spec(&self) -> Option<ProcessSpec> {
        self.spec
    }
}

impl Default for HyperTremolo {
    fn default() -> Self {
        Self::dual()
    }
}

impl Processor for HyperTremolo {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.gain.prepare(spec);
        self.mixer.prepare(spec);
        self.harmonic.prepare(spec);
        self.spec = Some(*spec);

        log::info!(
            "prepared at {} Hz, {} samples, {} channels",
            spec.sample_rate,
            spec.max_block_size,
            spec.num_channels
        );
    }

    fn reset(&mut self) {
        self.harmonic.reset();
        self.mixer.reset();
        self.gain.reset();
    }

    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        if bypassed {
            return;
        }

        self.mixer.push_dry_samples(&block.as_block());
        self.harmonic.process_replacing(block, false);
        self.gain.process_block(block);
        self.mixer.mix_wet_samples(block);
    }
}
