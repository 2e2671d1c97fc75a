//! Pre-built mock host scenarios for testing.

use super::env::MockEnv;
use super::filesystem::MockFs;
use super::runner::MockRunner;
use crate::collector::traits::FsStats;

/// `/proc/cpuinfo` of a four-core machine; core 3 reports no `cpu MHz`.
const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cpu MHz\t\t: 2400.000
cache size\t: 35840 KB

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cpu MHz\t\t: 2600.500
cache size\t: 35840 KB

processor\t: 2
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cpu MHz\t\t: 1200.250
cache size\t: 35840 KB

processor\t: 3
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cache size\t: 35840 KB
";

impl MockFs {
    /// A four-core host with every file source the readers use.
    pub fn typical_system() -> Self {
        let fs = Self::new();

        fs.add_file("/proc/cpuinfo", CPUINFO);
        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );
        fs.add_file(
            "/etc/os-release",
            "\
PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"
NAME=\"Debian GNU/Linux\"
VERSION_ID=\"12\"
VERSION=\"12 (bookworm)\"
VERSION_CODENAME=bookworm
ID=debian
",
        );
        // 100 GiB filesystem, 25 GiB free.
        fs.add_mount(
            "/",
            FsStats {
                blocks: 26_214_400,
                blocks_free: 6_553_600,
                block_size: 4096,
            },
        );

        fs
    }

    /// Same host after one busy interval: every core spent 300 of 400 ticks
    /// working, so usage is 75%.
    pub fn advance_busy(&self) {
        self.add_file(
            "/proc/stat",
            "\
cpu  11200 500 3000 80400 1000 200 100 0 0 0
cpu0 2800 125 750 20100 250 50 25 0 0 0
cpu1 2800 125 750 20100 250 50 25 0 0 0
cpu2 2800 125 750 20100 250 50 25 0 0 0
cpu3 2800 125 750 20100 250 50 25 0 0 0
",
        );
    }
}

impl MockRunner {
    /// Every external tool installed and answering normally.
    pub fn typical_tools() -> Self {
        Self::new()
            .with_output("nvidia-smi", "NVIDIA GeForce RTX 3080, 37\n")
            .with_output(
                "xrandr",
                "\
Screen 0: minimum 320 x 200, current 1920 x 1080, maximum 16384 x 16384
HDMI-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+
",
            )
            .with_output("uname", "6.1.0-18-amd64\n")
            .with_output(
                "speedtest-cli",
                "Ping: 23.456 ms\nDownload: 95.12 Mbit/s\nUpload: 11.70 Mbit/s\n",
            )
    }
}

impl MockEnv {
    /// Four online CPUs and a bash login shell.
    pub fn typical_system() -> Self {
        Self::new()
            .with_online_cpus(4)
            .with_var("SHELL", "/bin/bash")
    }
}
