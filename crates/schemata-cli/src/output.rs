//! Output formatting and writing utilities
//!
//! Results go to stdout in the selected format; status lines go to stderr so
//! piping a resolved schema into another tool stays clean.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

/// Format a serializable value
pub fn format_value<T: Serialize>(format: OutputFormat, value: &T) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Writer for command results and status messages
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a writer over stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create a writer over any sink
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write a serializable result
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let rendered = format_value(self.format, value)?;
        writeln!(self.writer, "{}", rendered.trim_end())?;
        Ok(())
    }

    /// Write a plain text result
    pub fn text(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        Ok(())
    }

    /// Write an informational status line
    pub fn info(&mut self, message: &str) -> Result<()> {
        if !self.quiet {
            if self.use_color {
                eprintln!("{} {}", "info:".blue().bold(), message);
            } else {
                eprintln!("info: {}", message);
            }
        }
        Ok(())
    }

    /// Write a success status line
    pub fn success(&mut self, message: &str) -> Result<()> {
        if !self.quiet {
            if self.use_color {
                eprintln!("{}", message.green());
            } else {
                eprintln!("{}", message);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        let value = json!({"type": "object"});
        assert_eq!(format_value(OutputFormat::Json, &value).unwrap(), r#"{"type":"object"}"#);
        assert_eq!(format_value(OutputFormat::Yaml, &value).unwrap(), "type: object\n");
        assert!(format_value(OutputFormat::JsonPretty, &value).unwrap().contains('\n'));
    }
}
