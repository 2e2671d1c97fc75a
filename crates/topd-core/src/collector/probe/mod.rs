//! External probes: measurements obtained from command-line tools.
//!
//! A probe has three outcomes: a value, [`ReadError::ToolUnavailable`] when
//! the tool is not installed, or [`ReadError::MalformedOutput`] when its
//! output cannot be parsed. The collector only sees the [`Probe`] trait, so a
//! backend that talks to a vendor API instead of shelling out can replace the
//! default one without touching the aggregation code.
//!
//! No timeout is applied: a probe returns when its tool exits.

pub mod display;
pub mod gpu;
pub mod netspeed;

pub use display::Xrandr;
pub use gpu::NvidiaSmi;
pub use netspeed::SpeedtestCli;

use crate::collector::error::ReadError;

/// Source of one externally produced measurement.
pub trait Probe: Send + Sync {
    type Output;

    /// Tool or backend name, used in diagnostics.
    fn name(&self) -> &str;

    fn probe(&self) -> Result<Self::Output, ReadError>;
}
