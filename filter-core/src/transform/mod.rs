//! Time/frequency conversion with window normalization

pub mod engine;
pub mod window;

pub use engine::TransformEngine;
pub use window::{analysis_window, synthesis_window};
