//! GPU name and utilization via `nvidia-smi`.

use crate::collector::error::ReadError;
use crate::collector::probe::Probe;
use crate::collector::traits::CommandRunner;
use crate::model::GpuReport;

const TOOL: &str = "nvidia-smi";
const ARGS: [&str; 2] = [
    "--query-gpu=name,utilization.gpu",
    "--format=csv,noheader,nounits",
];

/// Parses one `name, utilization` line of CSV output.
///
/// Only the first line (first GPU) is used.
pub fn parse_gpu_query(output: &str) -> Result<GpuReport, ReadError> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ReadError::malformed(TOOL, "empty output"))?;

    let (name, utilization) = line
        .rsplit_once(',')
        .ok_or_else(|| ReadError::malformed(TOOL, format!("no utilization in '{}'", line)))?;

    let utilization = utilization.trim();
    let utilization_pct: f64 = utilization
        .trim_end_matches('%')
        .trim()
        .parse()
        .map_err(|_| ReadError::malformed(TOOL, format!("invalid utilization '{}'", utilization)))?;

    Ok(GpuReport {
        name: name.trim().to_string(),
        utilization_pct,
    })
}

/// Queries the first NVIDIA GPU.
#[derive(Debug, Clone)]
pub struct NvidiaSmi<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> NvidiaSmi<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Probe for NvidiaSmi<R> {
    type Output = GpuReport;

    fn name(&self) -> &str {
        TOOL
    }

    fn probe(&self) -> Result<GpuReport, ReadError> {
        let output = self
            .runner
            .run(TOOL, &ARGS)
            .map_err(|e| ReadError::tool(TOOL, e))?;
        parse_gpu_query(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockRunner;

    #[test]
    fn test_parse_gpu_query() {
        let gpu = parse_gpu_query("NVIDIA GeForce RTX 3080, 37\n").unwrap();
        assert_eq!(gpu.name, "NVIDIA GeForce RTX 3080");
        assert_eq!(gpu.utilization_pct, 37.0);
    }

    #[test]
    fn test_parse_gpu_query_uses_first_gpu() {
        let gpu = parse_gpu_query("Tesla T4, 5\nTesla T4, 99\n").unwrap();
        assert_eq!(gpu.utilization_pct, 5.0);
    }

    #[test]
    fn test_parse_gpu_query_unsupported_field() {
        let err = parse_gpu_query("NVIDIA GeForce GT 710, [N/A]\n").unwrap_err();
        assert_eq!(err.kind(), "MalformedOutput");
    }

    #[test]
    fn test_parse_gpu_query_driver_error_text() {
        let output = "NVIDIA-SMI has failed because it couldn't communicate with the NVIDIA driver.\n";
        assert_eq!(parse_gpu_query(output).unwrap_err().kind(), "MalformedOutput");
        assert_eq!(parse_gpu_query("").unwrap_err().kind(), "MalformedOutput");
    }

    #[test]
    fn test_probe_missing_tool() {
        let probe = NvidiaSmi::new(MockRunner::new());
        assert_eq!(probe.probe().unwrap_err().kind(), "ToolUnavailable");
    }

    #[test]
    fn test_probe_passes_query_arguments() {
        let runner = MockRunner::new().with_output(TOOL, "Quadro P1000, 12\n");
        let probe = NvidiaSmi::new(runner.clone());
        assert_eq!(probe.probe().unwrap().name, "Quadro P1000");
        assert_eq!(
            runner.calls(),
            vec![format!("{} {}", TOOL, ARGS.join(" "))]
        );
    }
}
