//! Pluggable standard streams for the `print` and `input` builtins.
//!
//! The interpreter never touches stdout/stdin directly: `print` goes through
//! a [`PrintWriter`] and `input` through an [`InputReader`], so hosts and
//! tests can capture or script the streams.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write as _},
};

use crate::exception::{ExcType, Exception};

/// Trait for handling output from the `print()` builtin function.
///
/// `print` formats one atomic chunk per call (arguments joined by spaces plus
/// the trailing newline) and hands it over in a single write.
pub trait PrintWriter {
    fn stdout_write(&mut self, output: &str) -> Result<(), Exception>;
}

/// Default `PrintWriter` that writes to stdout.
///
/// Writes are flushed immediately so that `input()` prompts appear before
/// the read blocks.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: &str) -> Result<(), Exception> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.as_bytes())
            .and_then(|()| handle.flush())
            .map_err(|err| ExcType::RuntimeError.msg(format!("stdout write failed: {err}")))
    }
}

/// A `PrintWriter` that collects all output into a string.
///
/// Useful for testing or capturing print output programmatically.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected output as a string slice.
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the writer and returns the collected output.
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: &str) -> Result<(), Exception> {
        self.0.push_str(output);
        Ok(())
    }
}

/// Trait for supplying lines to the `input()` builtin function.
pub trait InputReader {
    /// Reads one line, without the trailing newline. End of input raises.
    fn read_line(&mut self) -> Result<String, Exception>;
}

/// Default `InputReader` that reads from stdin.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputReader for StdInput {
    fn read_line(&mut self) -> Result<String, Exception> {
        let mut line = String::new();
        let bytes = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| ExcType::RuntimeError.msg(format!("stdin read failed: {err}")))?;
        if bytes == 0 {
            return Err(ExcType::RuntimeError.msg("EOF when reading a line"));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

/// An `InputReader` fed from a fixed queue of lines, for tests and embedding.
#[derive(Debug, Default)]
pub struct QueuedInput(VecDeque<String>);

impl QueuedInput {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(lines.into_iter().map(Into::into).collect())
    }
}

impl InputReader for QueuedInput {
    fn read_line(&mut self) -> Result<String, Exception> {
        self.0
            .pop_front()
            .ok_or_else(|| ExcType::RuntimeError.msg("EOF when reading a line"))
    }
}
