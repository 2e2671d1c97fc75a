//! Text layout of a snapshot.
//!
//! Each section is a labeled block; blocks are separated by one blank line.
//! A failed section collapses to a single `<title>: unavailable (<error>)`
//! line so that it is never silently dropped.

use std::fmt;

use crate::collector::ReadError;
use crate::config::Section;
use crate::fmt::{UNAVAILABLE, bytes_to_gb, format_hms, format_timestamp, kib_to_gb, or_unknown};
use crate::model::{
    CpuReport, DataBlock, DiskReport, DisplayReport, GpuReport, MemoryReport, NetworkSpeedReport,
    OsReport, SectionEntry, Snapshot,
};

/// Renders a snapshot to the text written to the log file.
pub fn render(snapshot: &Snapshot) -> String {
    Report(snapshot).to_string()
}

/// `Display` adapter over a [`Snapshot`].
pub struct Report<'a>(pub &'a Snapshot);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_entry(f, entry)?;
        }
        Ok(())
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &SectionEntry) -> fmt::Result {
    match &entry.outcome {
        Ok(block) => write_block(f, block),
        Err(e) => write_failure(f, entry.section, e),
    }
}

fn write_failure(f: &mut fmt::Formatter<'_>, section: Section, err: &ReadError) -> fmt::Result {
    writeln!(f, "{}: unavailable ({})", section.title(), err)
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &DataBlock) -> fmt::Result {
    match block {
        DataBlock::Time(ts) => writeln!(f, "{}", format_timestamp(ts)),
        DataBlock::Uptime(secs) => writeln!(f, "System Uptime: {}", format_hms(*secs)),
        DataBlock::Cpu(cpu) => write_cpu(f, cpu),
        DataBlock::Memory(mem) => write_memory(f, mem),
        DataBlock::Gpu(gpu) => write_gpu(f, gpu),
        DataBlock::Os(os) => write_os(f, os),
        DataBlock::Display(display) => write_display(f, display),
        DataBlock::Disk(disk) => write_disk(f, disk),
        DataBlock::NetworkSpeed(speed) => write_speed(f, speed),
    }
}

fn write_cpu(f: &mut fmt::Formatter<'_>, cpu: &CpuReport) -> fmt::Result {
    writeln!(f, "CPU Info:")?;
    writeln!(f, "{}", or_unknown(Some(cpu.model_name.as_str())))?;
    writeln!(f, "Cores({}):", cpu.core_count)?;
    for core in &cpu.cores {
        let freq = core
            .frequency_ghz
            .map_or_else(|| UNAVAILABLE.to_string(), |ghz| format!("{:.2} GHz", ghz));
        let usage = core
            .utilization_pct
            .map_or_else(|| UNAVAILABLE.to_string(), |pct| format!("{:.2}%", pct));
        writeln!(
            f,
            "   Core {}: Frequency = {}, Usage = {}",
            core.core_index, freq, usage
        )?;
    }
    Ok(())
}

fn write_memory(f: &mut fmt::Formatter<'_>, mem: &MemoryReport) -> fmt::Result {
    writeln!(f, "RAM Info:")?;
    writeln!(f, "   Total: {:.2} GB", kib_to_gb(mem.total_kib as i64))?;
    writeln!(
        f,
        "   Used: {:.2} GB ({:.0}%)",
        kib_to_gb(mem.used_kib()),
        mem.used_pct()
    )?;
    if !mem.is_consistent() {
        writeln!(f, "   (inconsistent source data)")?;
    }
    Ok(())
}

fn write_gpu(f: &mut fmt::Formatter<'_>, gpu: &GpuReport) -> fmt::Result {
    writeln!(f, "GPU Info:")?;
    writeln!(f, "   Name: {}", or_unknown(Some(gpu.name.as_str())))?;
    writeln!(f, "   Usage: {:.0}%", gpu.utilization_pct)
}

fn write_os(f: &mut fmt::Formatter<'_>, os: &OsReport) -> fmt::Result {
    writeln!(
        f,
        "OS: {} {}",
        or_unknown(os.os_name.as_deref()),
        or_unknown(os.os_version.as_deref())
    )?;
    writeln!(f, "Kernel version: {}", or_unknown(os.kernel_version.as_deref()))?;
    writeln!(f, "Shell: {}", or_unknown(os.default_shell.as_deref()))
}

fn write_display(f: &mut fmt::Formatter<'_>, display: &DisplayReport) -> fmt::Result {
    let name = or_unknown(Some(display.name.as_str()));
    if display.resolution_known {
        writeln!(f, "Display: {}", name)?;
        writeln!(f, "Resolution: {}x{}", display.width_px, display.height_px)
    } else {
        writeln!(f, "Display: {} (resolution is not defined)", name)
    }
}

fn write_disk(f: &mut fmt::Formatter<'_>, disk: &DiskReport) -> fmt::Result {
    writeln!(f, "Disk ({}):", disk.path)?;
    writeln!(f, "Total: {:.2} GB", bytes_to_gb(disk.total_bytes))?;
    writeln!(
        f,
        "Used: {:.2} GB ({:.2}%)",
        bytes_to_gb(disk.used_bytes),
        disk.used_pct
    )?;
    writeln!(f, "Free: {:.2} GB", bytes_to_gb(disk.free_bytes))
}

fn write_speed(f: &mut fmt::Formatter<'_>, speed: &NetworkSpeedReport) -> fmt::Result {
    writeln!(f, "Internet Speed:")?;
    writeln!(f, "Ping: {}", or_unknown(speed.ping.as_deref()))?;
    writeln!(f, "Download: {}", or_unknown(speed.download.as_deref()))?;
    writeln!(f, "Upload: {}", or_unknown(speed.upload.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoreSample;
    use chrono::Local;
    use std::io;

    fn snapshot(entries: Vec<(Section, Result<DataBlock, ReadError>)>) -> Snapshot {
        Snapshot {
            timestamp: Local::now(),
            entries: entries
                .into_iter()
                .map(|(section, outcome)| SectionEntry { section, outcome })
                .collect(),
        }
    }

    #[test]
    fn test_render_cpu_with_sentinels() {
        let cpu = CpuReport {
            model_name: "Test CPU".to_string(),
            core_count: 2,
            cores: vec![
                CoreSample {
                    core_index: 0,
                    frequency_ghz: Some(2.4),
                    utilization_pct: Some(12.5),
                },
                CoreSample {
                    core_index: 1,
                    frequency_ghz: None,
                    utilization_pct: None,
                },
            ],
        };
        let text = render(&snapshot(vec![(Section::Cpu, Ok(DataBlock::Cpu(cpu)))]));
        assert_eq!(
            text,
            "CPU Info:\n\
             Test CPU\n\
             Cores(2):\n   \
             Core 0: Frequency = 2.40 GHz, Usage = 12.50%\n   \
             Core 1: Frequency = unavailable, Usage = unavailable\n"
        );
    }

    #[test]
    fn test_render_memory() {
        let mem = MemoryReport {
            total_kib: 16 * 1024 * 1024,
            free_kib: 8 * 1024 * 1024,
            buffers_kib: 0,
            cached_kib: 4 * 1024 * 1024,
        };
        let text = render(&snapshot(vec![(Section::Ram, Ok(DataBlock::Memory(mem)))]));
        assert_eq!(
            text,
            "RAM Info:\n   Total: 16.00 GB\n   Used: 4.00 GB (25%)\n"
        );
    }

    #[test]
    fn test_render_inconsistent_memory_is_flagged() {
        let mem = MemoryReport {
            total_kib: 100,
            free_kib: 80,
            buffers_kib: 30,
            cached_kib: 10,
        };
        let text = render(&snapshot(vec![(Section::Ram, Ok(DataBlock::Memory(mem)))]));
        assert!(text.contains("inconsistent source data"));
    }

    #[test]
    fn test_render_display_without_resolution() {
        let display = DisplayReport::default();
        let text = render(&snapshot(vec![(
            Section::Monitor,
            Ok(DataBlock::Display(display)),
        )]));
        assert_eq!(text, "Display: unknown (resolution is not defined)\n");
        assert!(!text.contains("0x0"));
    }

    #[test]
    fn test_render_display_with_resolution() {
        let display = DisplayReport {
            name: "HDMI-1".to_string(),
            width_px: 1920,
            height_px: 1080,
            resolution_known: true,
        };
        let text = render(&snapshot(vec![(
            Section::Monitor,
            Ok(DataBlock::Display(display)),
        )]));
        assert_eq!(text, "Display: HDMI-1\nResolution: 1920x1080\n");
    }

    #[test]
    fn test_render_os_unknown_fields() {
        let os = OsReport {
            os_name: Some("Arch".to_string()),
            ..OsReport::default()
        };
        let text = render(&snapshot(vec![(Section::Os, Ok(DataBlock::Os(os)))]));
        assert_eq!(
            text,
            "OS: Arch unknown\nKernel version: unknown\nShell: unknown\n"
        );

        let text = render(&snapshot(vec![(
            Section::Os,
            Ok(DataBlock::Os(OsReport::default())),
        )]));
        assert!(text.starts_with("OS: unknown unknown\n"));
    }

    #[test]
    fn test_render_disk() {
        let disk = DiskReport {
            path: "/".to_string(),
            total_bytes: 100 << 30,
            free_bytes: 25 << 30,
            used_bytes: 75 << 30,
            used_pct: 75.0,
        };
        let text = render(&snapshot(vec![(Section::Disk, Ok(DataBlock::Disk(disk)))]));
        assert_eq!(
            text,
            "Disk (/):\nTotal: 100.00 GB\nUsed: 75.00 GB (75.00%)\nFree: 25.00 GB\n"
        );
    }

    #[test]
    fn test_render_failure_is_one_line_and_sections_are_separated() {
        let gpu_err = ReadError::tool(
            "nvidia-smi",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        let text = render(&snapshot(vec![
            (Section::Uptime, Ok(DataBlock::Uptime(12345.67))),
            (Section::Gpu, Err(gpu_err)),
            (
                Section::NetSpeed,
                Ok(DataBlock::NetworkSpeed(NetworkSpeedReport {
                    ping: Some("23.456 ms".to_string()),
                    download: None,
                    upload: None,
                })),
            ),
        ]));
        assert_eq!(
            text,
            "System Uptime: 03:25:45\n\
             \n\
             GPU Info: unavailable (nvidia-smi is not available: not found)\n\
             \n\
             Internet Speed:\nPing: 23.456 ms\nDownload: unknown\nUpload: unknown\n"
        );
    }

    #[test]
    fn test_render_time() {
        let snap = snapshot(vec![]);
        let ts = snap.timestamp;
        let text = render(&snapshot(vec![(Section::Time, Ok(DataBlock::Time(ts)))]));
        assert_eq!(text, format!("{}\n", format_timestamp(&ts)));
        assert_eq!(text.matches('[').count(), 5);
    }

    #[test]
    fn test_render_empty_snapshot() {
        assert_eq!(render(&snapshot(vec![])), "");
    }
}
