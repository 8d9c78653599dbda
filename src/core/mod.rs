//! Core data model: per-pixel observation records and segmentation results.

pub mod record;
pub mod segment;

pub use record::{Observation, TimeseriesRecord};
pub use segment::{PixelResult, RowResult, Segment, SegmentFit};
