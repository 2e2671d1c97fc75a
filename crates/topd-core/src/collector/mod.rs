//! Host telemetry collector for Linux.
//!
//! This module reads every report section from its source: `/proc` files,
//! filesystem statistics, the process environment and external tools. All host
//! access goes through three seams so the whole pipeline can run against
//! in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Collector                           │
//! │  ┌───────────────────┐ ┌──────────────┐ ┌─────────────────┐  │
//! │  │  SystemCollector  │ │  os / disk   │ │     Probes      │  │
//! │  │  - cpuinfo, stat  │ │ - os-release │ │ - nvidia-smi    │  │
//! │  │  - meminfo        │ │ - statvfs    │ │ - xrandr        │  │
//! │  │  - uptime         │ │ - $SHELL     │ │ - speedtest-cli │  │
//! │  └─────────┬─────────┘ └──────┬───────┘ └────────┬────────┘  │
//! │            │   CounterState   │                  │           │
//! │     ┌──────▼──────┐   ┌───────▼─────┐   ┌────────▼──────┐    │
//! │     │ FileSystem  │   │ Environment │   │ CommandRunner │    │
//! │     └──────┬──────┘   └───────┬─────┘   └────────┬──────┘    │
//! └────────────┼──────────────────┼──────────────────┼───────────┘
//!              │                  │                  │
//!       ┌──────▼──────┐    ┌──────▼──────┐    ┌──────▼──────┐
//!       │ RealFs      │    │ RealEnv     │    │ RealRunner  │
//!       │ MockFs      │    │ MockEnv     │    │ MockRunner  │
//!       └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use topd_core::collector::{Collector, RealFs, RealRunner};
//!
//! let mut collector = Collector::new(RealFs::new(), RealRunner::new(), "/proc");
//! let snapshot = collector.collect_snapshot();
//! ```
//!
//! ## Testing (with mocks)
//!
//! ```
//! use topd_core::collector::{Collector, MockEnv, MockFs, MockRunner};
//!
//! let mut collector = Collector::new(MockFs::typical_system(), MockRunner::typical_tools(), "/proc")
//!     .with_environment(MockEnv::typical_system());
//! let snapshot = collector.collect_snapshot();
//! assert_eq!(snapshot.failures(), 0);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod delta;
pub mod disk;
pub mod error;
pub mod mock;
pub mod os;
pub mod probe;
pub mod procfs;
pub mod traits;

pub use collector::{Collector, PollTiming};
pub use delta::CounterState;
pub use error::ReadError;
pub use mock::{MockEnv, MockFs, MockRunner};
pub use probe::Probe;
pub use traits::{CommandRunner, Environment, FileSystem, FsStats, RealEnv, RealFs, RealRunner};
