//! Section selection.
//!
//! The daemon samples a fixed set of host properties. Which of them end up in
//! the report is a plain name → bool mapping chosen on the command line.

use std::fmt;

/// One labeled part of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Time,
    Uptime,
    Cpu,
    Ram,
    Gpu,
    Os,
    Monitor,
    Disk,
    NetSpeed,
}

impl Section {
    /// All sections in render order.
    pub const ALL: [Section; 9] = [
        Section::Time,
        Section::Uptime,
        Section::Cpu,
        Section::Ram,
        Section::Gpu,
        Section::Os,
        Section::Monitor,
        Section::Disk,
        Section::NetSpeed,
    ];

    /// Configuration key of the section.
    pub fn name(self) -> &'static str {
        match self {
            Section::Time => "time",
            Section::Uptime => "uptime",
            Section::Cpu => "cpu",
            Section::Ram => "ram",
            Section::Gpu => "gpu",
            Section::Os => "os",
            Section::Monitor => "monitor",
            Section::Disk => "disk",
            Section::NetSpeed => "netspeed",
        }
    }

    /// Heading used in the rendered report and in failure diagnostics.
    pub fn title(self) -> &'static str {
        match self {
            Section::Time => "Time",
            Section::Uptime => "System Uptime",
            Section::Cpu => "CPU Info",
            Section::Ram => "RAM Info",
            Section::Gpu => "GPU Info",
            Section::Os => "OS Info",
            Section::Monitor => "Display",
            Section::Disk => "Disk",
            Section::NetSpeed => "Internet Speed",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which sections are included in each report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections {
    pub time: bool,
    pub uptime: bool,
    pub cpu: bool,
    pub ram: bool,
    pub gpu: bool,
    pub os: bool,
    pub monitor: bool,
    pub disk: bool,
    pub netspeed: bool,
}

impl Sections {
    /// Selection used when no section was requested explicitly: CPU and GPU.
    pub fn default_selection() -> Self {
        Self {
            cpu: true,
            gpu: true,
            ..Self::default()
        }
    }

    /// Every section enabled.
    pub fn all() -> Self {
        Section::ALL.into_iter().collect()
    }

    /// Returns the explicit selection, or the default one if it is empty.
    pub fn or_default_selection(self) -> Self {
        if self.is_empty() {
            Self::default_selection()
        } else {
            self
        }
    }

    pub fn is_enabled(&self, section: Section) -> bool {
        match section {
            Section::Time => self.time,
            Section::Uptime => self.uptime,
            Section::Cpu => self.cpu,
            Section::Ram => self.ram,
            Section::Gpu => self.gpu,
            Section::Os => self.os,
            Section::Monitor => self.monitor,
            Section::Disk => self.disk,
            Section::NetSpeed => self.netspeed,
        }
    }

    pub fn set(&mut self, section: Section, enabled: bool) {
        let slot = match section {
            Section::Time => &mut self.time,
            Section::Uptime => &mut self.uptime,
            Section::Cpu => &mut self.cpu,
            Section::Ram => &mut self.ram,
            Section::Gpu => &mut self.gpu,
            Section::Os => &mut self.os,
            Section::Monitor => &mut self.monitor,
            Section::Disk => &mut self.disk,
            Section::NetSpeed => &mut self.netspeed,
        };
        *slot = enabled;
    }

    pub fn is_empty(&self) -> bool {
        !Section::ALL.iter().any(|s| self.is_enabled(*s))
    }

    /// Enabled sections in render order.
    pub fn enabled(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL
            .into_iter()
            .filter(move |s| self.is_enabled(*s))
    }
}

impl FromIterator<Section> for Sections {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        let mut sections = Sections::default();
        for section in iter {
            sections.set(section, true);
        }
        sections
    }
}

impl fmt::Display for Sections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.enabled().map(Section::name).collect();
        f.write_str(&names.join(","))
    }
}
