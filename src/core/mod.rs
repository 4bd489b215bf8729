//! Core module
//!
//! This module contains the data the drawing code consumes:
//! - Settings: user configuration and its file format
//! - Samples: telemetry snapshots handed over by the collector
//! - FieldWidths: process list column allocation

mod field_widths;
pub mod samples;
pub mod settings;

pub use field_widths::*;
pub use samples::*;
pub use settings::*;
