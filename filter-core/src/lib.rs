//! Spectral Filter - Real-Time Frequency-Domain Audio Filtering Core
//!
//! Feed raw multichannel audio blocks and process them in the time-frequency
//! domain. The engine frames the stream into overlapping analysis windows,
//! runs the forward transform, hands each frame's spectra to a
//! [`SpectralProcessor`], and reconstructs a continuous output stream by
//! overlap-add. With an identity processor the pipeline reproduces its input
//! exactly, delayed by [`StftFilter::frame_latency`] samples.
//!
//! After initialization, [`StftFilter::process_block`] performs no
//! allocation, locking or I/O, making it safe to call from a real-time audio
//! callback.

pub mod buffer;
pub mod error;
pub mod filter;
pub mod transform;

pub use buffer::{AudioBlock, SampleBuffer};
pub use error::FilterError;
pub use filter::{CallbackProcessor, SpectralProcessor, StftConfig, StftFilter};
pub use transform::TransformEngine;
