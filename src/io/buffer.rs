//! Multichannel sample storage and borrowed block views.

/*
Buffers and Blocks
==================

An `AudioBuffer` owns storage for a fixed number of channels, each with a
fixed capacity in samples. It is sized once (at `prepare` time) and then
reused for every block, so nothing on the render path ever allocates.

Blocks are cheap borrowed views onto a buffer (or onto any channel-major
slice a host hands us):

    data: [ ch0 ........ | ch1 ........ | ch2 ........ ]
            ^ stride ^     ^ stride ^
            [num_samples]  [num_samples]

  stride        Distance between the first samples of two channels. Equal to
                the owning buffer's capacity.
  num_samples   How many samples of each channel belong to this block. Can be
                smaller than the stride when the host delivers a short block.

`AudioBlock` is read-only, `AudioBlockMut` is writable. Processors always take
blocks rather than buffers so a host can process a prefix of its storage.
*/

/// Owned channel-major sample storage.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    data: Vec<f32>,
    num_channels: usize,
    capacity: usize,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            data: vec![0.0; num_channels * capacity],
            num_channels,
            capacity,
        }
    }

    /// Build a buffer from per-channel sample vectors. All channels must have
    /// the same length.
    pub fn from_channels(channels: &[Vec<f32>]) -> Self {
        let capacity = channels.first().map_or(0, Vec::len);
        let mut buffer = Self::new(channels.len(), capacity);
        for (ch, samples) in channels.iter().enumerate() {
            debug_assert_eq!(samples.len(), capacity, "ragged channel {ch}");
            buffer.channel_mut(ch).copy_from_slice(samples);
        }
        buffer
    }

    /// Reallocate for a new layout. Only call this outside the render path.
    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        self.num_channels = num_channels;
        self.capacity = capacity;
        self.data.clear();
        self.data.resize(num_channels * capacity, 0.0);
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.capacity;
        &self.data[start..start + self.capacity]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.capacity;
        &mut self.data[start..start + self.capacity]
    }

    /// Read-only view of the first `num_samples` of every channel.
    pub fn block(&self, num_samples: usize) -> AudioBlock<'_> {
        debug_assert!(num_samples <= self.capacity);
        AudioBlock {
            data: &self.data,
            num_channels: self.num_channels,
            num_samples,
            stride: self.capacity,
        }
    }

    /// Writable view of the first `num_samples` of every channel.
    pub fn block_mut(&mut self, num_samples: usize) -> AudioBlockMut<'_> {
        debug_assert!(num_samples <= self.capacity);
        AudioBlockMut {
            data: &mut self.data,
            num_channels: self.num_channels,
            num_samples,
            stride: self.capacity,
        }
    }

    /// Writable view of the first `num_samples` of the first `num_channels`.
    pub fn block_mut_with_channels(
        &mut self,
        num_channels: usize,
        num_samples: usize,
    ) -> AudioBlockMut<'_> {
        debug_assert!(num_channels <= self.num_channels);
        debug_assert!(num_samples <= self.capacity);
        AudioBlockMut {
            data: &mut self.data,
            num_channels: num_channels.min(self.num_channels),
            num_samples: num_samples.min(self.capacity),
            stride: self.capacity,
        }
    }

    /// Full-capacity read-only view.
    pub fn as_block(&self) -> AudioBlock<'_> {
        self.block(self.capacity)
    }

    /// Full-capacity writable view.
    pub fn as_block_mut(&mut self) -> AudioBlockMut<'_> {
        self.block_mut(self.capacity)
    }
}

/// Borrowed, read-only multichannel block.
#[derive(Debug, Clone, Copy)]
pub struct AudioBlock<'a> {
    data: &'a [f32],
    num_channels: usize,
    num_samples: usize,
    stride: usize,
}

impl<'a> AudioBlock<'a> {
    /// View a channel-major slice where each channel occupies `stride` samples.
    pub fn from_slice(data: &'a [f32], num_channels: usize, num_samples: usize, stride: usize) -> Self {
        debug_assert!(num_samples <= stride);
        debug_assert!(data.len() >= num_channels * stride);
        Self {
            data,
            num_channels,
            num_samples,
            stride,
        }
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &'a [f32] {
        let start = channel * self.stride;
        &self.data[start..start + self.num_samples]
    }

    pub fn channels(&self) -> impl Iterator<Item = &'a [f32]> + '_ {
        (0..self.num_channels).map(move |ch| self.channel(ch))
    }
}

/// Borrowed, writable multichannel block.
#[derive(Debug)]
pub struct AudioBlockMut<'a> {
    data: &'a mut [f32],
    num_channels: usize,
    num_samples: usize,
    stride: usize,
}

impl<'a> AudioBlockMut<'a> {
    pub fn from_slice(
        data: &'a mut [f32],
        num_channels: usize,
        num_samples: usize,
        stride: usize,
    ) -> Self {
        debug_assert!(num_samples <= stride);
        debug_assert!(data.len() >= num_channels * stride);
        Self {
            data,
            num_channels,
            num_samples,
            stride,
        }
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.stride;
        &self.data[start..start + self.num_samples]
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.stride;
        &mut self.data[start..start + self.num_samples]
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> + '_ {
        let num_samples = self.num_samples;
        self.data
            .chunks_mut(self.stride.max(1))
            .take(self.num_channels)
            .map(move |chunk| &mut chunk[..num_samples])
    }

    /// Shorter-lived mutable view of the same samples.
    pub fn reborrow(&mut self) -> AudioBlockMut<'_> {
        AudioBlockMut {
            data: &mut *self.data,
            num_channels: self.num_channels,
            num_samples: self.num_samples,
            stride: self.stride,
        }
    }

    pub fn as_block(&self) -> AudioBlock<'_> {
        AudioBlock {
            data: &*self.data,
            num_channels: self.num_channels,
            num_samples: self.num_samples,
            stride: self.stride,
        }
    }

    /// Copy `source` into this block. Shapes must match.
    pub fn copy_from(&mut self, source: &AudioBlock<'_>) {
        debug_assert_eq!(source.num_channels(), self.num_channels);
        debug_assert_eq!(source.num_samples(), self.num_samples);

        for ch in 0..self.num_channels {
            self.channel_mut(ch).copy_from_slice(source.channel(ch));
        }
    }

    /// Overwrite channel `to` with the contents of channel `from`.
    pub fn copy_channel(&mut self, from: usize, to: usize) {
        debug_assert!(from < self.num_channels && to < self.num_channels);
        let start = from * self.stride;
        self.data
            .copy_within(start..start + self.num_samples, to * self.stride);
    }

    pub fn fill(&mut self, value: f32) {
        for channel in self.channels_mut() {
            channel.fill(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_views_respect_stride() {
        let mut buffer = AudioBuffer::new(2, 8);
        buffer.channel_mut(0).fill(1.0);
        buffer.channel_mut(1).fill(2.0);

        let block = buffer.block(3);
        assert_eq!(block.num_samples(), 3);
        assert_eq!(block.channel(0), &[1.0, 1.0, 1.0]);
        assert_eq!(block.channel(1), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_copy_from_only_touches_block_prefix() {
        let source = AudioBuffer::from_channels(&[vec![0.5; 4], vec![-0.5; 4]]);
        let mut dest = AudioBuffer::new(2, 6);

        dest.block_mut(4).copy_from(&source.as_block());

        assert_eq!(dest.channel(0), &[0.5, 0.5, 0.5, 0.5, 0.0, 0.0]);
        assert_eq!(dest.channel(1), &[-0.5, -0.5, -0.5, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_channels_mut_iterates_every_channel() {
        let mut buffer = AudioBuffer::new(3, 4);
        let mut block = buffer.block_mut(2);
        for (ch, samples) in block.channels_mut().enumerate() {
            samples.fill(ch as f32);
        }

        assert_eq!(buffer.channel(2), &[2.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_resize_zeroes_storage() {
        let mut buffer = AudioBuffer::new(1, 4);
        buffer.channel_mut(0).fill(1.0);
        buffer.resize(2, 16);

        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.capacity(), 16);
        assert!(buffer.channel(1).iter().all(|&s| s == 0.0));
    }
}
