//! Token output sinks

pub mod sink;

pub use sink::{BufferSink, OutputSink, TerminalSink};
