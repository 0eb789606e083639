//! Core building blocks: the in-memory `SourceImage`, partitioning strategies,
//! trimming and canvas normalization, and split parameters. These are the
//! primitives consumed by the high-level `api` module.
pub mod image;
pub mod params;
pub mod partition;
pub mod processing;
