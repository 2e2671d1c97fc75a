//! Records produced by the source readers and the per-poll snapshot.
//!
//! Every record is built fresh on each poll. The only state that outlives a
//! poll is [`crate::collector::CounterState`].

use chrono::{DateTime, Local};

use crate::collector::ReadError;
use crate::config::Section;

/// One logical processor.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreSample {
    pub core_index: usize,
    /// `None` when the description source has no `cpu MHz` for this core.
    pub frequency_ghz: Option<f64>,
    /// `None` when no counters were available for this core.
    pub utilization_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuReport {
    pub model_name: String,
    pub core_count: usize,
    /// One entry per online core, in index order.
    pub cores: Vec<CoreSample>,
}

/// Memory figures in KiB as read from `/proc/meminfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryReport {
    pub total_kib: u64,
    pub free_kib: u64,
    pub buffers_kib: u64,
    pub cached_kib: u64,
}

impl MemoryReport {
    /// `total - free - buffers - cached`.
    ///
    /// Negative only when the source is inconsistent.
    pub fn used_kib(&self) -> i64 {
        self.total_kib as i64
            - self.free_kib as i64
            - self.buffers_kib as i64
            - self.cached_kib as i64
    }

    pub fn is_consistent(&self) -> bool {
        self.used_kib() >= 0
    }

    /// Used share of total memory, 0 when total is unknown.
    pub fn used_pct(&self) -> f64 {
        if self.total_kib == 0 {
            return 0.0;
        }
        self.used_kib() as f64 / self.total_kib as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpuReport {
    pub name: String,
    pub utilization_pct: f64,
}

/// Operating system identity. `None` fields are rendered as "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OsReport {
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub default_shell: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayReport {
    pub name: String,
    pub width_px: u32,
    pub height_px: u32,
    pub resolution_known: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskReport {
    pub path: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    pub used_pct: f64,
}

/// Speed-test results, kept as the tool printed them (value and unit).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSpeedReport {
    pub ping: Option<String>,
    pub download: Option<String>,
    pub upload: Option<String>,
}

/// Payload of one successfully read section.
#[derive(Debug, Clone, PartialEq)]
pub enum DataBlock {
    Time(DateTime<Local>),
    Uptime(f64),
    Cpu(CpuReport),
    Memory(MemoryReport),
    Gpu(GpuReport),
    Os(OsReport),
    Display(DisplayReport),
    Disk(DiskReport),
    NetworkSpeed(NetworkSpeedReport),
}

/// Outcome of one section for one poll.
#[derive(Debug)]
pub struct SectionEntry {
    pub section: Section,
    pub outcome: Result<DataBlock, ReadError>,
}

/// Everything gathered during one poll, in render order.
#[derive(Debug)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub entries: Vec<SectionEntry>,
}

impl Snapshot {
    pub fn entry(&self, section: Section) -> Option<&SectionEntry> {
        self.entries.iter().find(|e| e.section == section)
    }

    /// Number of sections whose reader failed.
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_err()).count()
    }
}
