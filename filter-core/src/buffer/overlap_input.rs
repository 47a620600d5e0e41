//! Input side of the analysis chain: overlapping window extraction
//!
//! Turns a stream of arbitrarily-sized appended blocks into a stream of
//! fixed-size, hop-advancing, overlapping analysis windows.

use super::block::AudioBlock;
use crate::error::FilterError;

/// Per-channel circular buffer exposing successive overlapping windows.
///
/// Allocated once at construction, never reallocated. At reset the buffer is
/// primed with `window_size - hop_size` zeros of history, so the first window
/// becomes available after `hop_size` real samples and covers the stream
/// start preceded by silence.
pub struct OverlapInputBuffer {
    channels: Vec<Vec<f64>>,
    capacity: usize,
    /// Start of the next window.
    head: usize,
    /// Unconsumed samples from `head`, including retained overlap history.
    stored: usize,
    window_size: usize,
    hop_size: usize,
}

impl OverlapInputBuffer {
    /// Create a new buffer.
    ///
    /// # Arguments
    /// * `channel_count` - Number of independent channels
    /// * `window_size` - Samples per extracted window
    /// * `hop_size` - Samples the window advances per extraction
    /// * `capacity` - Ring capacity per channel, at least `window_size` plus
    ///   the largest block that will be appended between extractions
    pub fn new(channel_count: usize, window_size: usize, hop_size: usize, capacity: usize) -> Self {
        debug_assert!(hop_size >= 1 && hop_size <= window_size);
        debug_assert!(capacity >= window_size);

        let mut buffer = Self {
            channels: vec![vec![0.0; capacity]; channel_count],
            capacity,
            head: 0,
            stored: 0,
            window_size,
            hop_size,
        };
        buffer.reset();
        buffer
    }

    /// Clear buffered history and re-prime the overlap region with zeros.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
        self.head = 0;
        self.stored = self.window_size - self.hop_size;
    }

    /// Number of unconsumed samples since the last extraction point.
    pub fn available(&self) -> usize {
        self.stored
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one block of samples per channel.
    pub fn write(&mut self, block: &dyn AudioBlock) -> Result<(), FilterError> {
        if block.channel_count() != self.channels.len() {
            return Err(FilterError::ChannelMismatch {
                expected: self.channels.len(),
                actual: block.channel_count(),
            });
        }

        let frames = block.frame_count();
        debug_assert!(self.stored + frames <= self.capacity);

        let tail = (self.head + self.stored) % self.capacity;
        for (ch, ring) in self.channels.iter_mut().enumerate() {
            for (i, &sample) in block.channel(ch).iter().enumerate() {
                ring[(tail + i) % self.capacity] = sample;
            }
        }
        self.stored += frames;

        Ok(())
    }

    /// Copy the next full window into `frames` (one `window_size` slot per
    /// channel) and advance the consumption marker by `hop_size`, retaining
    /// the trailing `window_size - hop_size` samples as the head of the next
    /// window.
    ///
    /// Requires `available() >= window_size`.
    pub fn extract_window(&mut self, frames: &mut [Vec<f64>]) {
        debug_assert!(self.stored >= self.window_size);
        debug_assert_eq!(frames.len(), self.channels.len());

        for (ring, frame) in self.channels.iter().zip(frames.iter_mut()) {
            for (i, slot) in frame[..self.window_size].iter_mut().enumerate() {
                *slot = ring[(self.head + i) % self.capacity];
            }
        }

        self.head = (self.head + self.hop_size) % self.capacity;
        self.stored -= self.hop_size;
    }
}
