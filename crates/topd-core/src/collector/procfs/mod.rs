//! Readers for the Linux `/proc` filesystem.
//!
//! `parser` holds pure text parsers; `system` wires them to a
//! [`FileSystem`](crate::collector::FileSystem) and produces report records.

pub mod parser;
pub mod system;

pub use parser::ParseError;
pub use system::SystemCollector;
