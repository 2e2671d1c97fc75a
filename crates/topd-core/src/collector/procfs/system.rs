//! Readers for the system-wide `/proc` sources.

use std::path::Path;

use tracing::{debug, warn};

use crate::collector::delta::CounterState;
use crate::collector::error::ReadError;
use crate::collector::procfs::parser::{
    parse_cpu_counters, parse_cpu_mhz, parse_cpu_model, parse_meminfo, parse_uptime,
};
use crate::collector::traits::FileSystem;
use crate::model::{CoreSample, CpuReport, MemoryReport};

/// Reads CPU, memory and uptime information from `/proc/`.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    fn read(&self, name: &str) -> Result<String, ReadError> {
        let path = format!("{}/{}", self.proc_path, name);
        self.fs
            .read_to_string(Path::new(&path))
            .map_err(|e| ReadError::source_unavailable(path, e))
    }

    /// Builds the CPU report for `core_count` online cores.
    ///
    /// Model name and frequencies come from `cpuinfo`; usage comes from the
    /// `stat` counters fed through `counters`. A missing model line gives an
    /// empty name. An unreadable `stat` leaves every core's usage unset rather
    /// than failing the section.
    pub fn collect_cpu(
        &self,
        core_count: usize,
        counters: &mut CounterState,
    ) -> Result<CpuReport, ReadError> {
        let cpuinfo = self.read("cpuinfo")?;

        let model_name = parse_cpu_model(&cpuinfo).unwrap_or_else(|| {
            debug!("no model name line in cpuinfo");
            String::new()
        });
        let mhz = parse_cpu_mhz(&cpuinfo);

        let stat = match self.read("stat") {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("CPU usage unavailable: {}", e);
                None
            }
        };

        let mut cores = Vec::with_capacity(core_count);
        for core in 0..core_count {
            let frequency_ghz = mhz.get(core).copied().flatten().map(|m| m / 1000.0);
            let utilization_pct = match stat.as_deref() {
                Some(content) => core_utilization(content, core, counters),
                None => None,
            };
            cores.push(CoreSample {
                core_index: core,
                frequency_ghz,
                utilization_pct,
            });
        }

        Ok(CpuReport {
            model_name,
            core_count,
            cores,
        })
    }

    /// Reads `meminfo`. All four of MemTotal, MemFree, Buffers and Cached
    /// must be present.
    pub fn collect_memory(&self) -> Result<MemoryReport, ReadError> {
        let content = self.read("meminfo")?;
        let info = parse_meminfo(&content);

        match (info.mem_total, info.mem_free, info.buffers, info.cached) {
            (Some(total_kib), Some(free_kib), Some(buffers_kib), Some(cached_kib)) => {
                let report = MemoryReport {
                    total_kib,
                    free_kib,
                    buffers_kib,
                    cached_kib,
                };
                if !report.is_consistent() {
                    warn!(
                        "meminfo is inconsistent: used memory computes to {} kB",
                        report.used_kib()
                    );
                }
                Ok(report)
            }
            _ => Err(ReadError::IncompleteSource {
                source: format!("{}/meminfo", self.proc_path),
                missing: info.missing(),
            }),
        }
    }

    /// Seconds since boot from `uptime`.
    pub fn collect_uptime(&self) -> Result<f64, ReadError> {
        let content = self.read("uptime")?;
        parse_uptime(&content)
            .map_err(|e| ReadError::malformed(format!("{}/uptime", self.proc_path), e.message))
    }
}

/// Usage of one core, updating its baseline in `counters`.
fn core_utilization(stat: &str, core: usize, counters: &mut CounterState) -> Option<f64> {
    match parse_cpu_counters(stat, core) {
        Ok(Some(c)) => Some(counters.compute(core, c.total(), c.idle_total())),
        Ok(None) => {
            debug!("no counters for cpu{}", core);
            None
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}
