//! Poll loop: collect, render, overwrite the log file, sleep.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::collector::{Collector, CommandRunner, FileSystem};
use crate::output::LogWriter;
use crate::render::render;

/// Seconds between polls unless configured otherwise.
pub const DEFAULT_INTERVAL_SECS: u64 = 3;

/// Granularity of the shutdown check while sleeping.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Drives the collector at a fixed interval.
pub struct Scheduler<F: FileSystem + Clone, R: CommandRunner + Clone + 'static> {
    collector: Collector<F, R>,
    writer: LogWriter,
    interval: Duration,
    polls: u64,
}

impl<F: FileSystem + Clone, R: CommandRunner + Clone + 'static> Scheduler<F, R> {
    pub fn new(collector: Collector<F, R>, writer: LogWriter, interval: Duration) -> Self {
        Self {
            collector,
            writer,
            interval,
            polls: 0,
        }
    }

    /// Number of polls performed so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Runs one poll and writes its report. Returns the rendered text.
    pub fn poll_once(&mut self) -> io::Result<String> {
        self.polls += 1;
        let snapshot = self.collector.collect_snapshot();
        let text = render(&snapshot);
        self.writer.write(&text)?;

        debug!(
            "Poll #{}: {} sections, {} unavailable, {} bytes",
            self.polls,
            snapshot.entries.len(),
            snapshot.failures(),
            text.len()
        );
        Ok(text)
    }

    /// One poll under the write-failure policy: the first write must succeed,
    /// later failures are logged and retried on the next poll.
    fn step(&mut self) -> io::Result<()> {
        match self.poll_once() {
            Ok(_) => Ok(()),
            Err(e) if self.polls == 1 => Err(e),
            Err(e) => {
                error!(
                    "Failed to write report to {}: {}",
                    self.writer.path().display(),
                    e
                );
                Ok(())
            }
        }
    }

    /// Polls immediately, then every interval until `running` is cleared.
    ///
    /// Returns an error only if the first report cannot be written.
    pub fn run(&mut self, running: &AtomicBool) -> io::Result<()> {
        info!(
            "Starting collection loop: every {:?} into {}",
            self.interval,
            self.writer.path().display()
        );

        loop {
            self.step()?;
            if !running.load(Ordering::SeqCst) {
                break;
            }
            sleep_while_running(self.interval, running);
            if !running.load(Ordering::SeqCst) {
                break;
            }
        }

        info!("Collection loop stopped after {} polls", self.polls);
        Ok(())
    }
}

/// Sleeps for `duration` in short slices, returning early once `running`
/// is cleared.
fn sleep_while_running(duration: Duration, running: &AtomicBool) {
    let mut remaining = duration;
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let sleep_time = remaining.min(SLEEP_SLICE);
        std::thread::sleep(sleep_time);
        remaining = remaining.saturating_sub(sleep_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{MockEnv, MockFs, MockRunner};
    use crate::config::Sections;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;
    use tempfile::TempDir;

    fn scheduler(log: &Path, interval: Duration) -> Scheduler<MockFs, MockRunner> {
        let collector = Collector::new(
            MockFs::typical_system(),
            MockRunner::typical_tools(),
            "/proc",
        )
        .with_environment(MockEnv::typical_system())
        .with_sections(Sections::all());
        Scheduler::new(collector, LogWriter::new(log), interval)
    }

    #[test]
    fn test_poll_once_writes_report() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("topd.log");
        let mut scheduler = scheduler(&log, Duration::from_secs(3));

        let text = scheduler.poll_once().unwrap();
        assert_eq!(fs::read_to_string(&log).unwrap(), text);
        assert_eq!(scheduler.polls(), 1);

        assert!(text.contains("System Uptime: 03:25:45\n"));
        assert!(text.contains("   Core 3: Frequency = unavailable, Usage = 0.00%\n"));
        assert!(text.contains("   Name: NVIDIA GeForce RTX 3080\n   Usage: 37%\n"));
        assert!(text.contains("OS: Debian GNU/Linux 12 (bookworm)\n"));
        assert!(text.contains("Display: HDMI-1\nResolution: 1920x1080\n"));
        assert!(text.contains("Used: 75.00 GB (75.00%)\n"));
        assert!(text.contains("Download: 95.12 Mbit/s\n"));
        assert!(!text.contains("unavailable ("));
    }

    #[test]
    fn test_second_poll_reflects_counter_deltas() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("topd.log");
        let fs = MockFs::typical_system();
        let collector = Collector::new(fs.clone(), MockRunner::typical_tools(), "/proc")
            .with_environment(MockEnv::typical_system());
        let mut scheduler = Scheduler::new(collector, LogWriter::new(&log), Duration::ZERO);

        scheduler.poll_once().unwrap();
        fs.advance_busy();
        let text = scheduler.poll_once().unwrap();

        assert!(text.contains("   Core 0: Frequency = 2.40 GHz, Usage = 75.00%\n"));
        assert_eq!(scheduler.polls(), 2);
    }

    #[test]
    fn test_first_write_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("missing").join("topd.log");
        let mut scheduler = scheduler(&log, Duration::from_secs(3));

        let running = AtomicBool::new(true);
        assert!(scheduler.run(&running).is_err());
        assert_eq!(scheduler.polls(), 1);
    }

    #[test]
    fn test_later_write_failure_is_retried() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("logs");
        fs::create_dir(&sub).unwrap();
        let log = sub.join("topd.log");
        let mut scheduler = scheduler(&log, Duration::ZERO);

        scheduler.step().unwrap();
        fs::remove_dir_all(&sub).unwrap();
        scheduler.step().unwrap();
        assert!(!log.exists());

        fs::create_dir(&sub).unwrap();
        scheduler.step().unwrap();
        assert!(log.exists());
        assert_eq!(scheduler.polls(), 3);
    }

    #[test]
    fn test_run_polls_once_even_when_stopped() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("topd.log");
        let mut scheduler = scheduler(&log, Duration::from_secs(3));

        let running = AtomicBool::new(false);
        scheduler.run(&running).unwrap();
        assert_eq!(scheduler.polls(), 1);
        assert!(log.exists());
    }

    #[test]
    fn test_run_stops_promptly_when_flag_cleared() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("topd.log");
        let mut scheduler = scheduler(&log, Duration::from_secs(3));

        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        let handle = thread::spawn(move || {
            scheduler.run(&r).unwrap();
            scheduler.polls()
        });

        thread::sleep(Duration::from_millis(300));
        let stop = Instant::now();
        running.store(false, Ordering::SeqCst);
        let polls = handle.join().unwrap();

        assert_eq!(polls, 1);
        assert!(stop.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_run_repeats_at_interval() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("topd.log");
        let mut scheduler = scheduler(&log, Duration::from_millis(50));

        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        let handle = thread::spawn(move || {
            scheduler.run(&r).unwrap();
            scheduler.polls()
        });

        thread::sleep(Duration::from_millis(400));
        running.store(false, Ordering::SeqCst);
        let polls = handle.join().unwrap();
        assert!(polls >= 2, "only {} polls", polls);
    }

    #[test]
    fn test_sleep_while_running_returns_early() {
        let running = AtomicBool::new(false);
        let start = Instant::now();
        sleep_while_running(Duration::from_secs(10), &running);
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
