//! In-memory doubles for the host seams, with prebuilt scenarios.
//!
//! Used by tests on any platform; none of them touch the real system.

mod env;
mod filesystem;
mod runner;
mod scenarios;

pub use env::MockEnv;
pub use filesystem::MockFs;
pub use runner::MockRunner;
