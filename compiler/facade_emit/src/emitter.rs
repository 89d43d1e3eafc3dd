//! Output Emitter
//!
//! Sink for generated source. `StringEmitter` builds the text in memory;
//! `FileEmitter` streams it to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Trait for emitting generated source text.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation (4 spaces per level).
    fn emit_indent(&mut self, level: usize);

    /// Emit one indented line.
    fn emit_line(&mut self, level: usize, text: &str) {
        if !text.is_empty() {
            self.emit_indent(level);
            self.emit(text);
        }
        self.emit_newline();
    }
}

/// In-memory emitter.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Take the generated text.
    pub fn output(self) -> String {
        self.buffer
    }

    /// Ensure the output ends with exactly one newline.
    pub fn ensure_trailing_newline(&mut self) {
        if !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    /// Drop blank lines and trailing spaces at the end of the output.
    pub fn trim_trailing_blank_lines(&mut self) {
        while self.buffer.ends_with("\n\n") || self.buffer.ends_with(" \n") {
            self.buffer.pop();
        }
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        self.buffer.extend(std::iter::repeat(' ').take(level * 4));
    }
}

/// Buffered emitter writing straight to a file.
///
/// Write errors are held back until [`FileEmitter::finish`], which reports
/// the first one.
pub struct FileEmitter {
    writer: BufWriter<File>,
    error: Option<io::Error>,
}

impl FileEmitter {
    /// Create (or truncate) the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            error: None,
        })
    }

    /// Flush and report the first write error, if any.
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.error.is_none() {
            if let Err(err) = self.writer.write_all(bytes) {
                self.error = Some(err);
            }
        }
    }
}

impl Emitter for FileEmitter {
    fn emit(&mut self, text: &str) {
        self.write(text.as_bytes());
    }

    fn emit_newline(&mut self) {
        self.write(b"\n");
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.write(b"    ");
        }
    }
}
