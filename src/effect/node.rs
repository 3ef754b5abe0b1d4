use crate::io::buffer::{AudioBlock, AudioBlockMut};

/// Host configuration a processor is prepared for.
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - max_block_size: Largest block `process` will ever be handed
/// - num_channels: Channel count of every block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    pub max_block_size: usize,
    pub num_channels: usize,
}

impl ProcessSpec {
    pub fn new(sample_rate: f64, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self::new(44_100.0, crate::MAX_BLOCK_SIZE, 2)
    }
}

/// Core trait for block processors.
///
/// `prepare` may allocate; `reset` and the process methods must not.
pub trait Processor: Send {
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Clear internal state (phases, filter history, ramps). Configured
    /// parameters are kept.
    fn reset(&mut self);

    /// Process `block` in place.
    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool);

    /// Process `input` into `output`. When bypassed the output is a bit-exact
    /// copy of the input and no state changes.
    fn process(&mut self, input: &AudioBlock<'_>, output: &mut AudioBlockMut<'_>, bypassed: bool) {
        debug_assert_eq!(input.num_channels(), output.num_channels());
        debug_assert_eq!(input.num_samples(), output.num_samples());

        output.copy_from(input);

        if bypassed {
            return;
        }

        self.process_replacing(output, false);
    }
}

/// Allow boxed processors to be used as processors (for dynamic dispatch)
impl Processor for Box<dyn Processor> {
    fn prepare(&mut self, spec: &ProcessSpec) {
        (**self).prepare(spec)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        (**self).process_replacing(block, bypassed)
    }

    fn process(&mut self, input: &AudioBlock<'_>, output: &mut AudioBlockMut<'_>, bypassed: bool) {
        (**self).process(input, output, bypassed)
    }
}

/// Identity processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Processor for Passthrough {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn reset(&mut self) {}

    fn process_replacing(&mut self, _block: &mut AudioBlockMut<'_>, _bypassed: bool) {}
}

/// Adapts a closure into a processor. The closure only sees unbypassed blocks.
pub struct FnProcessor<F> {
    f: F,
}

impl<F> FnProcessor<F>
where
    F: FnMut(&mut AudioBlockMut<'_>) + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: FnMut(&mut AudioBlockMut<'_>) + Send,
{
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn reset(&mut self) {}

    fn process_replacing(&mut self, block: &mut AudioBlockMut<'_>, bypassed: bool) {
        if bypassed {
            return;
        }
        (self.f)(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::buffer::AudioBuffer;

    #[test]
    fn test_default_process_copies_then_processes() {
        let mut doubler = FnProcessor::new(|block: &mut AudioBlockMut<'_>| {
            for channel in block.channels_mut() {
                channel.iter_mut().for_each(|s| *s *= 2.0);
            }
        });
        let input = AudioBuffer::from_channels(&[vec![0.25; 4]]);
        let mut output = AudioBuffer::new(1, 4);

        doubler.process(&input.as_block(), &mut output.as_block_mut(), false);

        assert_eq!(output.channel(0), &[0.5; 4]);
    }

    #[test]
    fn test_default_process_bypass_is_copy() {
        let mut zeroer = FnProcessor::new(|block: &mut AudioBlockMut<'_>| block.fill(0.0));
        let input = AudioBuffer::from_channels(&[vec![0.1, 0.2, 0.3]]);
        let mut output = AudioBuffer::new(1, 3);

        zeroer.process(&input.as_block(), &mut output.as_block_mut(), true);

        assert_eq!(output.channel(0), input.channel(0));
    }

    #[test]
    fn test_boxed_processor_dispatches() {
        let mut boxed: Box<dyn Processor> = Box::new(Passthrough);
        let mut buffer = AudioBuffer::from_channels(&[vec![0.7; 2]]);

        boxed.prepare(&ProcessSpec::default());
        boxed.process_replacing(&mut buffer.as_block_mut(), false);

        assert_eq!(buffer.channel(0), &[0.7; 2]);
    }
}
