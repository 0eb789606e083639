//! Command Line Interface (CLI) layer for pdfsplit.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for PDF, single-image and
//! directory flows. It wires user-provided options to the library
//! functionality exposed via `pdfsplit::api`.
//!
//! If you are embedding pdfsplit into another application, prefer using
//! the high-level `pdfsplit::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
