//! topd-core - sampling engine for the topd telemetry daemon.
//!
//! Provides:
//! - `collector` - source readers, external probes, CPU counter deltas and
//!   the per-poll snapshot aggregator
//! - `config` - section selection
//! - `model` - report records and the snapshot
//! - `render` - text layout of a snapshot
//! - `fmt` - shared formatting helpers (GB, HH:MM:SS, timestamp)
//! - `output` - atomic log file writer
//! - `pidfile` - single-instance PID file guard
//! - `scheduler` - fixed-interval poll loop

pub mod collector;
pub mod config;
pub mod fmt;
pub mod model;
pub mod output;
pub mod pidfile;
pub mod render;
pub mod scheduler;
