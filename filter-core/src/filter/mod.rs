//! Frequency-domain filter orchestration

pub mod stft;

pub use stft::{
    CallbackProcessor, SpectralProcessor, StftConfig, StftFilter, DEFAULT_BLOCK_SIZE,
    DEFAULT_FFT_SIZE, DEFAULT_OVERLAP,
};
