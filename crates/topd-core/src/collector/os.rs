//! Operating system identity: distribution, kernel and login shell.

use std::path::Path;

use tracing::debug;

use crate::collector::traits::{CommandRunner, Environment, FileSystem};
use crate::model::OsReport;

/// Default location of the distribution identification file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// `NAME` and `VERSION` from an os-release file.
///
/// Values may be double- or single-quoted or bare. Later duplicates are
/// ignored. Empty values count as absent.
pub fn parse_os_release(content: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut version = None;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let slot = match key.trim() {
            "NAME" => &mut name,
            "VERSION" => &mut version,
            _ => continue,
        };
        if slot.is_none() {
            *slot = unquote(value.trim()).filter(|v| !v.is_empty());
        }
    }

    (name, version)
}

fn unquote(value: &str) -> Option<String> {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote) {
            return Some(inner.strip_suffix(quote).unwrap_or(inner).to_string());
        }
    }
    Some(value.to_string())
}

/// Kernel release from `uname -r` (first output line), if the tool runs.
pub fn kernel_version<R: CommandRunner + ?Sized>(runner: &R) -> Option<String> {
    match runner.run("uname", &["-r"]) {
        Ok(output) => output
            .lines()
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        Err(e) => {
            debug!("uname -r failed: {}", e);
            None
        }
    }
}

/// Builds the OS report. Each field is resolved independently and is `None`
/// when its source is unavailable; this reader never fails.
pub fn collect_os<F, R, E>(fs: &F, runner: &R, env: &E, os_release: &Path) -> OsReport
where
    F: FileSystem + ?Sized,
    R: CommandRunner + ?Sized,
    E: Environment + ?Sized,
{
    let (os_name, os_version) = match fs.read_to_string(os_release) {
        Ok(content) => parse_os_release(&content),
        Err(e) => {
            debug!("cannot read {}: {}", os_release.display(), e);
            (None, None)
        }
    };

    OsReport {
        os_name,
        os_version,
        kernel_version: kernel_version(runner),
        default_shell: env.var("SHELL").filter(|s| !s.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockEnv, MockFs, MockRunner};

    #[test]
    fn test_parse_os_release() {
        let content = "\
NAME=\"Ubuntu\"
VERSION=\"22.04.3 LTS (Jammy Jellyfish)\"
ID=ubuntu
VERSION_ID=\"22.04\"
PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"
";
        let (name, version) = parse_os_release(content);
        assert_eq!(name.as_deref(), Some("Ubuntu"));
        assert_eq!(version.as_deref(), Some("22.04.3 LTS (Jammy Jellyfish)"));
    }

    #[test]
    fn test_parse_os_release_unquoted_and_missing_version() {
        let content = "# rolling release\nNAME=Arch\nID=arch\n";
        let (name, version) = parse_os_release(content);
        assert_eq!(name.as_deref(), Some("Arch"));
        assert_eq!(version, None);
    }

    #[test]
    fn test_version_id_does_not_match_version() {
        let (_, version) = parse_os_release("VERSION_ID=\"12\"\n");
        assert_eq!(version, None);
    }

    #[test]
    fn test_collect_os() {
        let fs = MockFs::typical_system();
        let runner = MockRunner::typical_tools();
        let env = MockEnv::new().with_var("SHELL", "/bin/zsh");

        let os = collect_os(&fs, &runner, &env, Path::new(OS_RELEASE_PATH));
        assert_eq!(os.os_name.as_deref(), Some("Debian GNU/Linux"));
        assert_eq!(os.os_version.as_deref(), Some("12 (bookworm)"));
        assert_eq!(os.kernel_version.as_deref(), Some("6.1.0-18-amd64"));
        assert_eq!(os.default_shell.as_deref(), Some("/bin/zsh"));
    }

    #[test]
    fn test_collect_os_everything_missing() {
        let os = collect_os(
            &MockFs::new(),
            &MockRunner::new(),
            &MockEnv::new(),
            Path::new(OS_RELEASE_PATH),
        );
        assert_eq!(os, OsReport::default());
    }
}
