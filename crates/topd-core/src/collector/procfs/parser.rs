//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions over file contents. They tokenize lines and look
//! fields up by label instead of relying on fixed column widths, but keep the
//! kernel's field names and units (`kB`, `MHz`) as the contract.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Splits a `/proc/cpuinfo` style `key : value` line.
fn split_labeled(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Returns the processor model from `/proc/cpuinfo`.
///
/// Takes the first `model name` line. `None` if no such line exists.
pub fn parse_cpu_model(content: &str) -> Option<String> {
    content
        .lines()
        .filter_map(split_labeled)
        .find(|(key, _)| *key == "model name")
        .map(|(_, value)| value.to_string())
}

/// Returns the `cpu MHz` value of every `processor` block, in block order.
///
/// Entry `n` belongs to the n-th block. A block without a parseable
/// `cpu MHz` field yields `None`. Lines before the first `processor` marker
/// are ignored.
pub fn parse_cpu_mhz(content: &str) -> Vec<Option<f64>> {
    let mut blocks: Vec<Option<f64>> = Vec::new();

    for (key, value) in content.lines().filter_map(split_labeled) {
        if key == "processor" {
            blocks.push(None);
        } else if key == "cpu MHz"
            && let Some(slot) = blocks.last_mut()
            && slot.is_none()
        {
            *slot = value.parse().ok();
        }
    }

    blocks
}

/// Frequency of one core in GHz, or `None` when it cannot be determined.
pub fn cpu_frequency_ghz(content: &str, core: usize) -> Option<f64> {
    parse_cpu_mhz(content)
        .get(core)
        .copied()
        .flatten()
        .map(|mhz| mhz / 1000.0)
}

/// Cumulative tick counters of one `cpuN` line from `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
}

impl CpuCounters {
    /// Sum of all seven counters.
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.iowait)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
    }

    /// Ticks spent not doing work: `idle + iowait`.
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }
}

/// Finds the counters for `core` in `/proc/stat`.
///
/// The first token must equal `cpu<core>` exactly, so core 3 never matches
/// the `cpu30` line. Returns `Ok(None)` if no line exists for the core and an
/// error if the line has fewer than seven numeric counters.
pub fn parse_cpu_counters(content: &str, core: usize) -> Result<Option<CpuCounters>, ParseError> {
    let label = format!("cpu{}", core);

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some(label.as_str()) {
            continue;
        }

        let mut values = [0u64; 7];
        for (idx, slot) in values.iter_mut().enumerate() {
            let token = parts.next().ok_or_else(|| {
                ParseError::new(format!("{}: expected 7 counters, got {}", label, idx))
            })?;
            *slot = token.parse().map_err(|_| {
                ParseError::new(format!("{}: invalid counter '{}'", label, token))
            })?;
        }

        let [user, nice, system, idle, iowait, irq, softirq] = values;
        return Ok(Some(CpuCounters {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }));
    }

    Ok(None)
}

/// The four `/proc/meminfo` fields the memory report needs, in KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemInfo {
    pub mem_total: Option<u64>,
    pub mem_free: Option<u64>,
    pub buffers: Option<u64>,
    pub cached: Option<u64>,
}

impl MemInfo {
    /// Labels of the required fields that were never found.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("MemTotal", self.mem_total),
            ("MemFree", self.mem_free),
            ("Buffers", self.buffers),
            ("Cached", self.cached),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(label, _)| label)
        .collect()
    }
}

/// Parses `/proc/meminfo` content.
///
/// Labels are matched exactly (`Cached` does not match `SwapCached`). The
/// first occurrence of each label wins. Values carry a `kB` unit.
pub fn parse_meminfo(content: &str) -> MemInfo {
    let mut info = MemInfo::default();

    // Accepts `1000 kB`, `1000kB` and a bare `1000`.
    let parse_kb = |value: &str| -> Option<u64> {
        let mut parts = value.split_whitespace();
        let token = parts.next()?;
        let (digits, unit_attached) = match token.strip_suffix("kB") {
            Some(digits) => (digits, true),
            None => (token, false),
        };
        let number = digits.parse().ok()?;
        match parts.next() {
            None => Some(number),
            Some("kB") if !unit_attached => Some(number),
            Some(_) => None,
        }
    };

    for (key, value) in content.lines().filter_map(split_labeled) {
        let slot = match key {
            "MemTotal" => &mut info.mem_total,
            "MemFree" => &mut info.mem_free,
            "Buffers" => &mut info.buffers,
            "Cached" => &mut info.cached,
            _ => continue,
        };
        if slot.is_none() {
            *slot = parse_kb(value);
        }
    }

    info
}

/// Parses `/proc/uptime`: seconds since boot (first field).
pub fn parse_uptime(content: &str) -> Result<f64, ParseError> {
    let first = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?;
    let secs: f64 = first
        .parse()
        .map_err(|_| ParseError::new(format!("invalid uptime '{}'", first)))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ParseError::new(format!("invalid uptime '{}'", first)));
    }
    Ok(secs)
}
