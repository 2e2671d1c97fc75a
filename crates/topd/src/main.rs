//! topd - host telemetry daemon.
//!
//! Samples CPU, memory, GPU, OS, display, disk and network figures at a fixed
//! interval and overwrites a plain-text report file with the latest snapshot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use topd_core::collector::disk::DEFAULT_DISK_PATH;
use topd_core::collector::{Collector, RealFs, RealRunner};
use topd_core::config::Sections;
use topd_core::output::{DEFAULT_LOG_PATH, LogWriter};
use topd_core::pidfile::{self, DEFAULT_PID_PATH, PidFile};
use topd_core::scheduler::{DEFAULT_INTERVAL_SECS, Scheduler};

/// Host telemetry daemon.
///
/// Without any section flag, CPU and GPU information is reported.
#[derive(Parser, Debug)]
#[command(name = "topd", about = "Host telemetry daemon", version)]
struct Args {
    /// Show time.
    #[arg(short = 't')]
    time: bool,

    /// Show uptime.
    #[arg(short = 'u')]
    uptime: bool,

    /// Show info about the CPU.
    #[arg(short = 'c')]
    cpu: bool,

    /// Show info about the RAM.
    #[arg(short = 'r')]
    ram: bool,

    /// Show info about the GPU.
    #[arg(short = 'g')]
    gpu: bool,

    /// Show info about the OS.
    #[arg(short = 'o')]
    os: bool,

    /// Show info about the monitor.
    #[arg(short = 'm')]
    monitor: bool,

    /// Show info about the disk.
    #[arg(short = 'd')]
    disk: bool,

    /// Show info about the speed of the Internet.
    #[arg(short = 'i')]
    internet: bool,

    /// Seconds between polls.
    #[arg(
        long,
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Report file, overwritten on every poll.
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    log_file: PathBuf,

    /// PID file used to refuse a second instance.
    #[arg(long, default_value = DEFAULT_PID_PATH)]
    pid_file: PathBuf,

    /// Mount path sampled by the disk section.
    #[arg(long, default_value = DEFAULT_DISK_PATH)]
    disk_path: PathBuf,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Stay attached to the terminal instead of daemonizing.
    #[arg(long)]
    foreground: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Sections chosen by flags, or the CPU + GPU default.
    fn sections(&self) -> Sections {
        Sections {
            time: self.time,
            uptime: self.uptime,
            cpu: self.cpu,
            ram: self.ram,
            gpu: self.gpu,
            os: self.os,
            monitor: self.monitor,
            disk: self.disk,
            netspeed: self.internet,
        }
        .or_default_selection()
    }

    fn explicit_selection(&self) -> bool {
        self.time
            || self.uptime
            || self.cpu
            || self.ram
            || self.gpu
            || self.os
            || self.monitor
            || self.disk
            || self.internet
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["topd", "topd_core"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Resolves `path` against the current directory, which changes to `/` once
/// the process daemonizes.
fn absolute(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    std::path::absolute(path)
        .map_err(|e| format!("cannot resolve path {}: {}", path.display(), e).into())
}

/// Clears `running` on SIGINT, SIGTERM or SIGHUP so the loop exits and the
/// PID file guard is dropped.
fn install_shutdown_handler(running: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set shutdown handler: {}", e);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let sections = args.sections();
    if !args.explicit_selection() {
        info!("Default mode. Use 'topd -h' for help.");
    }
    info!("Reporting sections: {}", sections);

    let log_file = absolute(&args.log_file)?;
    let pid_path = absolute(&args.pid_file)?;
    let disk_path = absolute(&args.disk_path)?;
    let proc_path = absolute(Path::new(&args.proc_path))?;

    pidfile::check_existing(&pid_path)?;

    if args.foreground {
        debug!("Running in foreground");
    } else {
        info!("Detaching from terminal");
        nix::unistd::daemon(false, false)?;
    }

    let pid_file = PidFile::create(&pid_path)?;
    info!(
        "PID {} written to {}",
        pid_file.pid(),
        pid_file.path().display()
    );

    let collector = Collector::new(
        RealFs::new(),
        RealRunner::new(),
        proc_path.to_string_lossy().into_owned(),
    )
    .with_sections(sections)
    .with_disk_path(disk_path);

    let mut scheduler = Scheduler::new(
        collector,
        LogWriter::new(log_file),
        Duration::from_secs(args.interval),
    );

    let running = Arc::new(AtomicBool::new(true));
    install_shutdown_handler(running.clone());

    scheduler.run(&running)?;

    info!("Shutdown complete");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
