//! Output sinks for streamed tokens
//!
//! The coordinator streams into a sink so the terminal frontend and
//! tests observe the same token sequence. One begin/commit pair wraps
//! a whole visible message, however many completions feed it.

use std::io::{self, Write};
use std::sync::Mutex;

/// Destination for streamed completion text
pub trait OutputSink: Send + Sync {
    /// Open a visible message
    fn begin(&self);

    /// Append a token to the open message
    fn push(&self, token: &str);

    /// Close the open message
    fn commit(&self);
}

/// Sink that prints tokens to stdout as they arrive
pub struct TerminalSink;

impl OutputSink for TerminalSink {
    fn begin(&self) {}

    fn push(&self, token: &str) {
        print!("{}", token);
        let _ = io::stdout().flush();
    }

    fn commit(&self) {
        println!();
    }
}

/// Sink that records everything for assertions
#[derive(Default)]
pub struct BufferSink {
    text: Mutex<String>,
    begins: Mutex<usize>,
    commits: Mutex<usize>,
}

impl BufferSink {
    /// Create an empty buffer sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything pushed so far
    pub fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    /// Number of begin calls seen
    pub fn begins(&self) -> usize {
        *self.begins.lock().unwrap()
    }

    /// Number of commit calls seen
    pub fn commits(&self) -> usize {
        *self.commits.lock().unwrap()
    }
}

impl OutputSink for BufferSink {
    fn begin(&self) {
        *self.begins.lock().unwrap() += 1;
    }

    fn push(&self, token: &str) {
        self.text.lock().unwrap().push_str(token);
    }

    fn commit(&self) {
        *self.commits.lock().unwrap() += 1;
    }
}
