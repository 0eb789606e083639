//! Per-cell processing stages of the split pipeline: background trimming,
//! canvas normalization, the end-to-end `pipeline`, and JPEG `save` helpers.
pub mod canvas;
pub mod pipeline;
pub mod save;
pub mod trim;
