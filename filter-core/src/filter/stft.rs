//! Frequency-domain filter base
//!
//! Feed raw audio blocks and process them in the time-frequency domain. The
//! filter owns the framing, transform and reconstruction plumbing; the
//! filter author supplies only the per-frame spectral processing through
//! [`SpectralProcessor`].

use num_complex::Complex;

use crate::buffer::{AudioBlock, OverlapAddBuffer, OverlapInputBuffer};
use crate::error::FilterError;
use crate::transform::TransformEngine;

/// Default analysis window length in samples.
pub const DEFAULT_FFT_SIZE: usize = 2048;
/// Default overlap between consecutive windows (50 %).
pub const DEFAULT_OVERLAP: usize = 1024;
/// Default number of frames per processed block.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Short-time transform configuration.
///
/// Owned by [`StftFilter`], replaced atomically on re-initialization and
/// immutable in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StftConfig {
    /// Number of independent audio channels.
    pub channel_count: usize,
    /// Analysis/synthesis window length in samples.
    pub fft_size: usize,
    /// Samples retained between consecutive windows.
    pub overlap: usize,
    /// Samples per call to the processing entry point.
    pub block_size: usize,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            channel_count: 0,
            fft_size: DEFAULT_FFT_SIZE,
            overlap: DEFAULT_OVERLAP,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl StftConfig {
    /// Window advance per analysis frame.
    pub fn hop_size(&self) -> usize {
        self.fft_size - self.overlap
    }

    /// Number of complex bins per channel spectrum.
    pub fn spectrum_size(&self) -> usize {
        self.fft_size / 2 + 1
    }

    fn validate(&self) -> Result<(), FilterError> {
        if self.channel_count == 0 {
            return Err(FilterError::InvalidConfiguration(
                "channel_count must be greater than zero",
            ));
        }
        if self.fft_size == 0 {
            return Err(FilterError::InvalidConfiguration(
                "fft_size must be greater than zero",
            ));
        }
        if self.overlap >= self.fft_size {
            return Err(FilterError::InvalidConfiguration(
                "overlap must be smaller than fft_size",
            ));
        }
        if self.block_size == 0 {
            return Err(FilterError::InvalidConfiguration(
                "block_size must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Per-frame spectral processing supplied by the filter author.
pub trait SpectralProcessor: Send {
    /// The spectral hook. Called once per analysis frame with one mutable
    /// spectrum per channel, each holding `fft_size/2 + 1` bins to be
    /// modified in place. Implementations must not resize the spectra and,
    /// like the rest of the processing path, should not allocate or block.
    fn process_spectrum(&mut self, spectra: &mut [Vec<Complex<f64>>]);

    /// Called once after every successful (re)initialization, when all
    /// buffers are sized and before any frame is processed. Default is a
    /// no-op.
    fn prepare(&mut self, _config: &StftConfig) {}
}

/// Adapter running a closure as the spectral hook, for filters simple enough
/// not to warrant a named [`SpectralProcessor`] type.
pub struct CallbackProcessor<F> {
    hook: F,
}

impl<F> CallbackProcessor<F>
where
    F: FnMut(&mut [Vec<Complex<f64>>]) + Send,
{
    pub fn new(hook: F) -> Self {
        Self { hook }
    }
}

impl<F> SpectralProcessor for CallbackProcessor<F>
where
    F: FnMut(&mut [Vec<Complex<f64>>]) + Send,
{
    fn process_spectrum(&mut self, spectra: &mut [Vec<Complex<f64>>]) {
        (self.hook)(spectra)
    }
}

/// Everything (re)built by initialization: the two rings, the transform
/// engine, and one frame plus one spectrum of scratch per channel.
struct PipelineState {
    input: OverlapInputBuffer,
    output: OverlapAddBuffer,
    engine: TransformEngine,
    frames: Vec<Vec<f64>>,
    spectra: Vec<Vec<Complex<f64>>>,
}

/// Base of frequency-domain filters.
///
/// Owns the input overlap ring, the output overlap-add ring and the
/// transform engine, and drives exactly one [`SpectralProcessor`] over one
/// audio stream. After [`init`](Self::init), [`process_block`](Self::process_block)
/// neither allocates nor blocks.
pub struct StftFilter {
    config: StftConfig,
    state: Option<PipelineState>,
    processor: Box<dyn SpectralProcessor>,
}

impl StftFilter {
    /// Create an uninitialized filter driving the given spectral processor.
    pub fn new(processor: Box<dyn SpectralProcessor>) -> Self {
        Self {
            config: StftConfig::default(),
            state: None,
            processor,
        }
    }

    /// Initialize the filter.
    ///
    /// Validates the configuration, (re)allocates all owned buffers and
    /// transform state, clears any buffered history and calls the
    /// processor's [`prepare`](SpectralProcessor::prepare) hook. On failure
    /// the previous state is left untouched.
    ///
    /// # Arguments
    /// * `channel_count` - Number of channels of the input signal
    /// * `fft_size` - Length in samples of the transform window
    /// * `overlap` - Number of samples kept between consecutive windows
    pub fn init(
        &mut self,
        channel_count: usize,
        fft_size: usize,
        overlap: usize,
    ) -> Result<(), FilterError> {
        let candidate = StftConfig {
            channel_count,
            fft_size,
            overlap,
            block_size: self.config.block_size,
        };
        candidate.validate()?;

        self.config = candidate;
        self.rebuild();
        self.processor.prepare(&self.config);
        Ok(())
    }

    /// Initialize with the default transform parameters
    /// ([`DEFAULT_FFT_SIZE`], [`DEFAULT_OVERLAP`]).
    pub fn init_default(&mut self, channel_count: usize) -> Result<(), FilterError> {
        self.init(channel_count, DEFAULT_FFT_SIZE, DEFAULT_OVERLAP)
    }

    /// Define the block size, the number of frames contained in each block
    /// sent to [`process_block`](Self::process_block).
    ///
    /// May be called before or after [`init`](Self::init). Called after, it
    /// rebuilds the rings (their capacity and alignment depend on the block
    /// size) and clears buffered history.
    pub fn set_block_size(&mut self, value: usize) -> Result<(), FilterError> {
        if value == 0 {
            return Err(FilterError::InvalidConfiguration(
                "block_size must be greater than zero",
            ));
        }

        self.config.block_size = value;
        if self.state.is_some() {
            self.rebuild();
        }
        Ok(())
    }

    fn rebuild(&mut self) {
        let config = &self.config;
        let hop_size = config.hop_size();
        let capacity = config.fft_size + config.block_size;
        // Worst-case phase mismatch between the hop grid and the block grid;
        // priming the output ring with this many zeros makes every popped
        // sample final. See frame_latency.
        let initial_offset = hop_size - gcd(config.block_size, hop_size);

        self.state = Some(PipelineState {
            input: OverlapInputBuffer::new(
                config.channel_count,
                config.fft_size,
                hop_size,
                capacity,
            ),
            output: OverlapAddBuffer::new(config.channel_count, hop_size, initial_offset, capacity),
            engine: TransformEngine::new(config.fft_size, hop_size),
            frames: vec![vec![0.0; config.fft_size]; config.channel_count],
            spectra: vec![
                vec![Complex::new(0.0, 0.0); config.spectrum_size()];
                config.channel_count
            ],
        });
    }

    /// Process one block of audio in place.
    ///
    /// The block must have the configured channel count and exactly
    /// `block_size` frames. Precondition violations are reported before any
    /// state is touched and leave the stream unaffected. The call performs
    /// no allocation, locking or I/O.
    pub fn process_block(&mut self, block: &mut dyn AudioBlock) -> Result<(), FilterError> {
        let config = self.config;
        let state = self.state.as_mut().ok_or(FilterError::NotInitialized)?;
        if block.channel_count() != config.channel_count {
            return Err(FilterError::ChannelMismatch {
                expected: config.channel_count,
                actual: block.channel_count(),
            });
        }
        if block.frame_count() != config.block_size {
            return Err(FilterError::FrameSizeMismatch {
                expected: config.block_size,
                actual: block.frame_count(),
            });
        }

        state.input.write(&*block)?;

        while state.input.available() >= config.fft_size {
            state.input.extract_window(&mut state.frames);

            for (frame, spectrum) in state.frames.iter_mut().zip(state.spectra.iter_mut()) {
                state.engine.forward(frame, spectrum);
            }

            self.processor.process_spectrum(&mut state.spectra);

            for (spectrum, frame) in state.spectra.iter_mut().zip(state.frames.iter_mut()) {
                state.engine.inverse(spectrum, frame);
            }

            state.output.overlap_add(&state.frames);
        }

        state.output.pop_block(block);
        Ok(())
    }

    /// End-to-end delay introduced by the pipeline, in samples: the output
    /// sample matching a given input sample leaves the filter this many
    /// samples later.
    ///
    /// The analysis side delays by `fft_size - hop_size` (a window of history
    /// precedes every sample) and the output ring priming adds
    /// `hop_size - gcd(block_size, hop_size)` to absorb hop/block grid
    /// misalignment:
    ///
    /// latency = fft_size - gcd(block_size, hop_size)
    ///
    /// Computed from configuration only, so it is valid any time after
    /// initialization and identical across re-initializations with the same
    /// parameters. When the hop divides the block size this reduces to the
    /// classical `fft_size - hop_size`.
    pub fn frame_latency(&self) -> usize {
        self.config.fft_size - gcd(self.config.block_size, self.config.hop_size())
    }

    /// The transform window length in samples.
    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// The overlap in samples.
    pub fn overlap(&self) -> usize {
        self.config.overlap
    }

    /// The hop size in samples.
    pub fn hop_size(&self) -> usize {
        self.config.hop_size()
    }

    /// The window size in samples, identical to [`fft_size`](Self::fft_size).
    pub fn window_size(&self) -> usize {
        self.config.fft_size
    }

    /// The block size in frames.
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// The number of channels of the input signal.
    pub fn channel_count(&self) -> usize {
        self.config.channel_count
    }

    /// The complete current configuration.
    pub fn config(&self) -> &StftConfig {
        &self.config
    }

    /// Whether a successful initialization has happened.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
