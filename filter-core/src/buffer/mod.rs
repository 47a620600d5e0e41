//! Sample containers and the overlap ring buffers backing the analysis chain

pub mod block;
pub mod overlap_input;
pub mod overlap_output;

pub use block::{AudioBlock, SampleBuffer};
pub use overlap_input::OverlapInputBuffer;
pub use overlap_output::OverlapAddBuffer;
