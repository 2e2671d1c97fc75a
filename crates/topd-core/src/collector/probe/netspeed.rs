//! Internet speed via `speedtest-cli --simple`.
//!
//! This probe takes seconds to tens of seconds. The collector runs it on its
//! own thread so local readers finish independently of it.

use crate::collector::error::ReadError;
use crate::collector::probe::Probe;
use crate::collector::traits::CommandRunner;
use crate::model::NetworkSpeedReport;

const TOOL: &str = "speedtest-cli";

/// Picks the `Ping:`, `Download:` and `Upload:` lines out of the output.
///
/// Values are kept verbatim (`"23.4 ms"`, `"95.12 Mbit/s"`). Output without
/// any of the three labels is malformed; a partial result is accepted.
pub fn parse_speedtest(output: &str) -> Result<NetworkSpeedReport, ReadError> {
    let mut report = NetworkSpeedReport::default();

    for line in output.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let slot = match label.trim() {
            "Ping" => &mut report.ping,
            "Download" => &mut report.download,
            "Upload" => &mut report.upload,
            _ => continue,
        };
        let value = value.trim();
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }

    if report == NetworkSpeedReport::default() {
        let first = output.lines().next().unwrap_or("").trim();
        return Err(ReadError::malformed(
            TOOL,
            if first.is_empty() {
                "empty output".to_string()
            } else {
                format!("no speed figures in '{}'", first)
            },
        ));
    }

    Ok(report)
}

/// Runs a full speed test against the nearest server.
#[derive(Debug, Clone)]
pub struct SpeedtestCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SpeedtestCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Probe for SpeedtestCli<R> {
    type Output = NetworkSpeedReport;

    fn name(&self) -> &str {
        TOOL
    }

    fn probe(&self) -> Result<NetworkSpeedReport, ReadError> {
        let output = self
            .runner
            .run(TOOL, &["--simple"])
            .map_err(|e| ReadError::tool(TOOL, e))?;
        parse_speedtest(&output)
    }
}
