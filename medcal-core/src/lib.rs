//! Core library for medcal.
//!
//! Converts Medicover appointment exports (JSON) into calendar events:
//! - `catalog` + `resolver` map free-text clinic names to physical locations
//! - `event` builds provider-neutral calendar events from appointments
//! - `ics` assembles per-event and combined ICS documents
//! - `sink` writes the result to a file or publishes it over CalDAV

pub mod appointment;
pub mod catalog;
pub mod context;
pub mod error;
pub mod event;
pub mod ics;
pub mod resolver;
pub mod sink;

pub use error::{MedcalError, MedcalResult};
