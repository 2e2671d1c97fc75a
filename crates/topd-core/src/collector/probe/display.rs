//! Connected display and its resolution via `xrandr`.

use crate::collector::error::ReadError;
use crate::collector::probe::Probe;
use crate::collector::traits::CommandRunner;
use crate::model::DisplayReport;

const TOOL: &str = "xrandr";

/// Parses a `WIDTHxHEIGHT[+X+Y]` geometry token.
fn parse_geometry(token: &str) -> Option<(u32, u32)> {
    let size = token.split('+').next()?;
    let (w, h) = size.split_once('x')?;
    let width = w.parse().ok()?;
    let height = h.parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// Extracts the first connected output from `xrandr --current`.
///
/// A connected line looks like
/// `HDMI-1 connected primary 1920x1080+0+0 (normal left ...) 527mm x 296mm`.
/// The resolution is the first geometry token after `connected`; outputs
/// that are connected but inactive have none. With no connected output the
/// report has an empty name and `resolution_known == false`.
pub fn parse_xrandr(output: &str) -> DisplayReport {
    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(name), Some("connected")) = (tokens.next(), tokens.next()) else {
            continue;
        };

        let geometry = tokens
            .take_while(|t| !t.starts_with('('))
            .find_map(parse_geometry);

        return match geometry {
            Some((width_px, height_px)) => DisplayReport {
                name: name.to_string(),
                width_px,
                height_px,
                resolution_known: true,
            },
            None => DisplayReport {
                name: name.to_string(),
                ..DisplayReport::default()
            },
        };
    }

    DisplayReport::default()
}

/// Queries the X server for the first connected output.
#[derive(Debug, Clone)]
pub struct Xrandr<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Xrandr<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Probe for Xrandr<R> {
    type Output = DisplayReport;

    fn name(&self) -> &str {
        TOOL
    }

    fn probe(&self) -> Result<DisplayReport, ReadError> {
        let output = self
            .runner
            .run(TOOL, &["--current"])
            .map_err(|e| ReadError::tool(TOOL, e))?;
        Ok(parse_xrandr(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockRunner;

    const XRANDR: &str = "\
Screen 0: minimum 320 x 200, current 1920 x 1080, maximum 16384 x 16384
eDP-1 disconnected (normal left inverted right x axis y axis)
HDMI-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+  50.00
   1280x720      60.00
DP-1 connected 2560x1440+1920+0 (normal left inverted right x axis y axis) 597mm x 336mm
";

    #[test]
    fn test_parse_xrandr_primary() {
        let display = parse_xrandr(XRANDR);
        assert_eq!(display.name, "HDMI-1");
        assert_eq!((display.width_px, display.height_px), (1920, 1080));
        assert!(display.resolution_known);
    }

    #[test]
    fn test_parse_xrandr_non_primary() {
        let output = "DP-2 connected 3840x2160+0+0 (normal left) 600mm x 340mm\n";
        let display = parse_xrandr(output);
        assert_eq!(display.name, "DP-2");
        assert_eq!((display.width_px, display.height_px), (3840, 2160));
    }

    #[test]
    fn test_parse_xrandr_connected_but_inactive() {
        let output = "VGA-1 connected (normal left inverted right x axis y axis)\n";
        let display = parse_xrandr(output);
        assert_eq!(display.name, "VGA-1");
        assert!(!display.resolution_known);
        assert_eq!((display.width_px, display.height_px), (0, 0));
    }

    #[test]
    fn test_parse_xrandr_nothing_connected() {
        let output = "Screen 0: minimum 8 x 8\nHDMI-1 disconnected (normal left)\n";
        let display = parse_xrandr(output);
        assert!(!display.resolution_known);
        assert!(display.name.is_empty());
    }

    #[test]
    fn test_probe_missing_tool() {
        let probe = Xrandr::new(MockRunner::new());
        assert_eq!(probe.probe().unwrap_err().kind(), "ToolUnavailable");
    }

    #[test]
    fn test_probe_empty_output_is_not_an_error() {
        let probe = Xrandr::new(MockRunner::new().with_output(TOOL, ""));
        assert!(!probe.probe().unwrap().resolution_known);
    }
}
