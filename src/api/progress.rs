//! Progress reporting for long-running PDF jobs.
//!
//! The pipeline emits `ProgressEvent`s into a caller-supplied `ProgressSink`
//! instead of mutating shared status. Front-ends either pass a closure, or
//! drain the receiving end of an `mpsc` channel (see `api::spawn_pdf_job`).
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use super::{BatchReport, ImageStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started { source: String },
    Extracting,
    Extracted { count: usize },
    /// About to split image `index` (1-based) of `total`
    Splitting { index: usize, total: usize, name: String },
    /// Image `index` (1-based) of `total` has been handled
    ImageDone {
        index: usize,
        total: usize,
        name: String,
        status: ImageStatus,
    },
    Finished { report: BatchReport },
}

impl ProgressEvent {
    /// Coarse completion percentage for progress bars.
    pub fn percent(&self) -> u8 {
        match self {
            ProgressEvent::Started { .. } => 0,
            ProgressEvent::Extracting => 20,
            ProgressEvent::Extracted { .. } => 50,
            ProgressEvent::Splitting { index, total, .. } => {
                splitting_percent(index.saturating_sub(1), *total)
            }
            ProgressEvent::ImageDone { index, total, .. } => splitting_percent(*index, *total),
            ProgressEvent::Finished { .. } => 100,
        }
    }
}

/// 50..=99 while splitting, `done` of `total` images handled.
fn splitting_percent(done: usize, total: usize) -> u8 {
    let share = done * 50 / total.max(1);
    (50 + share.min(49)) as u8
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::Started { source } => write!(f, "Processing PDF: {}", source),
            ProgressEvent::Extracting => write!(f, "Extracting images from PDF..."),
            ProgressEvent::Extracted { count } => write!(f, "Extracted {} images", count),
            ProgressEvent::Splitting { index, total, name } => {
                write!(f, "Splitting {} ({}/{})", name, index, total)
            }
            ProgressEvent::ImageDone { name, status, .. } => match status {
                ImageStatus::Split { count } => {
                    write!(f, "Extracted {} sub-images from {}", count, name)
                }
                ImageStatus::Skipped { reason } => {
                    write!(f, "Skipped {} - does not meet partition requirements ({})", name, reason)
                }
                ImageStatus::Failed { reason } => write!(f, "Error processing {}: {}", name, reason),
            },
            ProgressEvent::Finished { report } => write!(f, "Done: {}", report.summary()),
        }
    }
}

pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _event: ProgressEvent) {}
}

impl ProgressSink for Sender<ProgressEvent> {
    fn emit(&self, event: ProgressEvent) {
        // receiver may have hung up; progress is best-effort
        let _ = self.send(event);
    }
}

impl<F: Fn(ProgressEvent)> ProgressSink for F {
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}
