//! Dimension transformations from overall openings to frame and glass sizes.

mod pipeline;

pub use pipeline::*;
