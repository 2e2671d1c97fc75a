//! Fixed process environment.

use crate::collector::traits::Environment;
use std::collections::HashMap;
use std::io;

/// Environment with a configurable online CPU count and variables.
#[derive(Debug, Clone)]
pub struct MockEnv {
    online_cpus: usize,
    vars: HashMap<String, String>,
}

impl Default for MockEnv {
    fn default() -> Self {
        Self {
            online_cpus: 1,
            vars: HashMap::new(),
        }
    }
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_online_cpus(mut self, count: usize) -> Self {
        self.online_cpus = count;
        self
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl Environment for MockEnv {
    fn online_cpus(&self) -> io::Result<usize> {
        Ok(self.online_cpus)
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
