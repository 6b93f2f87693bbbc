//! IR text emitter - builds the generated module as a string
//!
//! Function bodies are indented by two spaces, labels and `define` lines are not.

use std::fmt::Write;

/// A buffer for building IR text with indentation
#[derive(Debug)]
pub struct IrEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl Default for IrEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl IrEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "  ",
        }
    }

    /// Consume the emitter and return the text
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Write an indented line
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write an indented line from format arguments
    pub fn linef(&mut self, args: std::fmt::Arguments<'_>) {
        self.write_indent();
        self.buffer
            .write_fmt(args)
            .expect("INVARIANT: writing to a String cannot fail");
        self.buffer.push('\n');
    }

    /// Write a basic-block label (`entry:`), never indented
    pub fn label(&mut self, name: &str) {
        self.buffer.push_str(name);
        self.buffer.push_str(":\n");
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write `header {`, the indented contents produced by `f`, then `}`.
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{header} {{"));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }
}
