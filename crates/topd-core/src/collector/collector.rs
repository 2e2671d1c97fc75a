//! Snapshot aggregator.
//!
//! The `Collector` runs the readers of every enabled section once per poll
//! and gathers their outcomes into a [`Snapshot`]. A failing reader only
//! affects its own section.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::collector::delta::CounterState;
use crate::collector::disk::{DEFAULT_DISK_PATH, collect_disk};
use crate::collector::error::ReadError;
use crate::collector::os::{OS_RELEASE_PATH, collect_os};
use crate::collector::probe::{NvidiaSmi, Probe, SpeedtestCli, Xrandr};
use crate::collector::procfs::SystemCollector;
use crate::collector::traits::{CommandRunner, Environment, FileSystem, RealEnv};
use crate::config::{Section, Sections};
use crate::model::{
    DataBlock, DisplayReport, GpuReport, NetworkSpeedReport, SectionEntry, Snapshot,
};

/// Time spent on each section during the last poll.
#[derive(Debug, Clone, Default)]
pub struct PollTiming {
    /// Wall time of the whole poll.
    pub total: Duration,
    /// Per-section durations in render order. For the speed test this is the
    /// time from spawning its thread to joining it.
    pub sections: Vec<(Section, Duration)>,
}

impl PollTiming {
    pub fn section(&self, section: Section) -> Option<Duration> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, d)| *d)
    }
}

type SpeedResult = Result<NetworkSpeedReport, ReadError>;

/// Speed test started at the beginning of a poll.
enum PendingSpeedTest {
    Running(JoinHandle<SpeedResult>, Instant),
    Finished(SpeedResult, Duration),
}

/// Gathers all selected sections for one poll.
pub struct Collector<F: FileSystem + Clone, R: CommandRunner + Clone + 'static> {
    fs: F,
    runner: R,
    env: Box<dyn Environment>,
    system_collector: SystemCollector<F>,
    gpu: Box<dyn Probe<Output = GpuReport>>,
    display: Box<dyn Probe<Output = DisplayReport>>,
    netspeed: Arc<dyn Probe<Output = NetworkSpeedReport>>,
    sections: Sections,
    os_release_path: PathBuf,
    disk_path: PathBuf,
    /// Previous CPU counters; the only state carried across polls.
    counters: CounterState,
    /// Sections whose last read failed, to log transitions only once.
    failing: HashSet<Section>,
    last_timing: Option<PollTiming>,
}

impl<F: FileSystem + Clone, R: CommandRunner + Clone + 'static> Collector<F, R> {
    /// Creates a collector reading the default sections.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `runner` - Launches external tools (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, runner: R, proc_path: impl Into<String>) -> Self {
        Self {
            fs: fs.clone(),
            runner: runner.clone(),
            env: Box::new(RealEnv::new()),
            system_collector: SystemCollector::new(fs, proc_path),
            gpu: Box::new(NvidiaSmi::new(runner.clone())),
            display: Box::new(Xrandr::new(runner.clone())),
            netspeed: Arc::new(SpeedtestCli::new(runner)),
            sections: Sections::default_selection(),
            os_release_path: PathBuf::from(OS_RELEASE_PATH),
            disk_path: PathBuf::from(DEFAULT_DISK_PATH),
            counters: CounterState::new(),
            failing: HashSet::new(),
            last_timing: None,
        }
    }

    /// Selects the sections to include in each snapshot.
    pub fn with_sections(mut self, sections: Sections) -> Self {
        self.sections = sections;
        self
    }

    /// Replaces the process environment (online CPUs, `SHELL`).
    pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_os_release_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release_path = path.into();
        self
    }

    /// Mount path sampled by the disk section.
    pub fn with_disk_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.disk_path = path.into();
        self
    }

    /// Substitutes the GPU backend.
    pub fn with_gpu_probe(mut self, probe: impl Probe<Output = GpuReport> + 'static) -> Self {
        self.gpu = Box::new(probe);
        self
    }

    /// Substitutes the display backend.
    pub fn with_display_probe(
        mut self,
        probe: impl Probe<Output = DisplayReport> + 'static,
    ) -> Self {
        self.display = Box::new(probe);
        self
    }

    /// Substitutes the speed-test backend.
    pub fn with_netspeed_probe(
        mut self,
        probe: impl Probe<Output = NetworkSpeedReport> + 'static,
    ) -> Self {
        self.netspeed = Arc::new(probe);
        self
    }

    /// CPU counter baselines kept between polls.
    pub fn counters(&self) -> &CounterState {
        &self.counters
    }

    /// Returns timing information from the last `collect_snapshot` call.
    pub fn last_timing(&self) -> Option<&PollTiming> {
        self.last_timing.as_ref()
    }

    /// Runs every enabled reader once.
    ///
    /// Local readers run in sequence on the calling thread. The speed test,
    /// if enabled, runs concurrently on its own thread and is joined before
    /// returning; it is not cancelled or timed out.
    pub fn collect_snapshot(&mut self) -> Snapshot {
        let total_start = Instant::now();
        let timestamp = Local::now();
        let sections = self.sections;
        let mut timing = PollTiming::default();

        let mut speed_test = sections
            .is_enabled(Section::NetSpeed)
            .then(|| self.start_speed_test());

        let mut entries = Vec::new();
        for section in sections.enabled() {
            let (outcome, elapsed) = if section == Section::NetSpeed {
                match speed_test.take() {
                    Some(pending) => self.finish_speed_test(pending),
                    None => continue,
                }
            } else {
                let start = Instant::now();
                let outcome = self.read_section(section, timestamp);
                (outcome, start.elapsed())
            };

            self.track_outcome(section, &outcome);
            timing.sections.push((section, elapsed));
            entries.push(SectionEntry { section, outcome });
        }

        timing.total = total_start.elapsed();
        debug!(
            "Poll took {:?}: {}",
            timing.total,
            timing
                .sections
                .iter()
                .map(|(s, d)| format!("{}={:?}", s, d))
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.last_timing = Some(timing);

        Snapshot { timestamp, entries }
    }

    fn read_section(
        &mut self,
        section: Section,
        timestamp: DateTime<Local>,
    ) -> Result<DataBlock, ReadError> {
        match section {
            Section::Time => Ok(DataBlock::Time(timestamp)),
            Section::Uptime => self.system_collector.collect_uptime().map(DataBlock::Uptime),
            Section::Cpu => {
                let online = self
                    .env
                    .online_cpus()
                    .map_err(|e| ReadError::source_unavailable("online processor count", e))?;
                self.system_collector
                    .collect_cpu(online, &mut self.counters)
                    .map(DataBlock::Cpu)
            }
            Section::Ram => self.system_collector.collect_memory().map(DataBlock::Memory),
            Section::Gpu => self.gpu.probe().map(DataBlock::Gpu),
            Section::Os => Ok(DataBlock::Os(collect_os(
                &self.fs,
                &self.runner,
                self.env.as_ref(),
                &self.os_release_path,
            ))),
            Section::Monitor => self.display.probe().map(DataBlock::Display),
            Section::Disk => collect_disk(&self.fs, &self.disk_path).map(DataBlock::Disk),
            Section::NetSpeed => self.netspeed.probe().map(DataBlock::NetworkSpeed),
        }
    }

    fn start_speed_test(&self) -> PendingSpeedTest {
        let probe = Arc::clone(&self.netspeed);
        let started = Instant::now();
        let spawned = thread::Builder::new()
            .name("netspeed".to_string())
            .spawn(move || probe.probe());

        match spawned {
            Ok(handle) => PendingSpeedTest::Running(handle, started),
            Err(e) => {
                warn!("cannot spawn speed test thread, running inline: {}", e);
                let result = self.netspeed.probe();
                PendingSpeedTest::Finished(result, started.elapsed())
            }
        }
    }

    fn finish_speed_test(
        &self,
        pending: PendingSpeedTest,
    ) -> (Result<DataBlock, ReadError>, Duration) {
        let (result, elapsed) = match pending {
            PendingSpeedTest::Running(handle, started) => {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(ReadError::source_unavailable(
                        self.netspeed.name(),
                        io::Error::other("speed test thread panicked"),
                    ))
                });
                (result, started.elapsed())
            }
            PendingSpeedTest::Finished(result, elapsed) => (result, elapsed),
        };
        (result.map(DataBlock::NetworkSpeed), elapsed)
    }

    /// Logs a failing section once, and again when it recovers.
    fn track_outcome(&mut self, section: Section, outcome: &Result<DataBlock, ReadError>) {
        match outcome {
            Err(e) => {
                if self.failing.insert(section) {
                    warn!("{} section unavailable: {}", section, e);
                } else {
                    debug!("{} section still unavailable: {}", section, e);
                }
            }
            Ok(_) => {
                if self.failing.remove(&section) {
                    info!("{} section recovered", section);
                }
            }
        }
    }
}
