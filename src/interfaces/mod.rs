//! Batch-file front end: CSV commands in, CSV wallet state out.

pub mod batch;
pub mod csv;
