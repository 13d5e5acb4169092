//! Per-run context threaded through the pipeline.

use chrono::{DateTime, Utc};

/// Values fixed once at startup and shared by every event in the batch.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// DTSTAMP used for every event in this run.
    pub batch_stamp: DateTime<Utc>,
    /// Optional name appended to each event summary.
    pub person_name: Option<String>,
}

impl RunContext {
    pub fn new(person_name: Option<String>) -> Self {
        Self {
            batch_stamp: Utc::now(),
            person_name,
        }
    }

    /// Context with a caller-chosen stamp, for deterministic output.
    pub fn with_stamp(batch_stamp: DateTime<Utc>, person_name: Option<String>) -> Self {
        Self {
            batch_stamp,
            person_name,
        }
    }
}
