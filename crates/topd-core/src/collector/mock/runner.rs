//! Scripted external tools.

use crate::collector::traits::CommandRunner;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    outputs: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    calls: Vec<String>,
}

/// Command runner that answers from a table of canned outputs.
///
/// Programs without an entry fail with `ErrorKind::NotFound`, as if the tool
/// were not installed. Clones share the table and the call log.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    inner: Arc<Mutex<Inner>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the stdout returned for `program`, whatever the arguments.
    pub fn with_output(self, program: &str, stdout: impl Into<String>) -> Self {
        self.set_output(program, stdout);
        self
    }

    /// Makes `program` take `delay` before answering.
    pub fn with_delay(self, program: &str, delay: Duration) -> Self {
        self.lock().delays.insert(program.to_string(), delay);
        self
    }

    pub fn set_output(&self, program: &str, stdout: impl Into<String>) {
        self.lock()
            .outputs
            .insert(program.to_string(), stdout.into());
    }

    /// Uninstalls `program`.
    pub fn remove(&self, program: &str) {
        self.lock().outputs.remove(program);
    }

    /// Every invocation so far as `"program arg1 arg2"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let (output, delay) = {
            let mut inner = self.lock();
            let mut call = program.to_string();
            for arg in args {
                call.push(' ');
                call.push_str(arg);
            }
            inner.calls.push(call);
            (
                inner.outputs.get(program).cloned(),
                inner.delays.get(program).copied(),
            )
        };

        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        output.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: command not found", program),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_program_is_not_found() {
        let runner = MockRunner::new();
        let err = runner.run("nvidia-smi", &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_records_calls() {
        let runner = MockRunner::new().with_output("uname", "6.1.0\n");
        assert_eq!(runner.run("uname", &["-r"]).unwrap(), "6.1.0\n");
        assert_eq!(runner.calls(), vec!["uname -r".to_string()]);
    }
}
