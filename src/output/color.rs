use std::io::{self, Write};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Buffered writer that renders colour as ANSI codes unless colour is
/// disabled with `--no-color` or `NO_COLOR`.
pub struct ColorWriter {
    buffer: Buffer,
    no_color: bool,
}

impl ColorWriter {
    pub fn new(no_color: bool) -> Self {
        let colors_enabled = !no_color && std::env::var("NO_COLOR").is_err();

        Self {
            buffer: if colors_enabled {
                Buffer::ansi()
            } else {
                Buffer::no_color()
            },
            no_color: !colors_enabled,
        }
    }

    pub fn into_string(self) -> Result<String, std::io::Error> {
        String::from_utf8(self.buffer.into_inner())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    fn with_spec(&mut self, spec: &ColorSpec, text: &str, newline: bool) -> io::Result<()> {
        if !self.no_color {
            self.buffer.set_color(spec)?;
        }
        write!(self.buffer, "{}", text)?;
        if !self.no_color {
            self.buffer.reset()?;
        }
        if newline {
            writeln!(self.buffer)?;
        }
        Ok(())
    }

    pub fn print_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color));
        self.with_spec(&spec, text, false)
    }

    pub fn print_header(&mut self, text: &str) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Cyan)).set_bold(true);
        self.with_spec(&spec, text, true)
    }

    /// Print a `label: value` line.
    pub fn print_field(&mut self, label: &str, value: &str) -> io::Result<()> {
        self.print_colored(label, Color::Blue)?;
        write!(self.buffer, ": ")?;
        writeln!(self.buffer, "{}", value)?;
        Ok(())
    }

    /// Same as `print_field`, indented for list entries.
    pub fn print_item_field(&mut self, label: &str, value: &str) -> io::Result<()> {
        write!(self.buffer, "  ")?;
        self.print_field(label, value)
    }

    pub fn print_success(&mut self, text: &str) -> io::Result<()> {
        self.print_colored("✓ ", Color::Green)?;
        writeln!(self.buffer, "{}", text)?;
        Ok(())
    }

    pub fn print_warning(&mut self, text: &str) -> io::Result<()> {
        self.print_colored("! ", Color::Yellow)?;
        writeln!(self.buffer, "{}", text)?;
        Ok(())
    }

    pub fn print_error(&mut self, text: &str) -> io::Result<()> {
        self.print_colored("✗ ", Color::Red)?;
        writeln!(self.buffer, "{}", text)?;
        Ok(())
    }

    pub fn print_separator(&mut self) -> io::Result<()> {
        let width = crate::output::width::get_wrap_width().min(80);
        self.print_colored(&"─".repeat(width), Color::White)?;
        writeln!(self.buffer)?;
        Ok(())
    }

    pub fn write(&mut self, text: &str) -> io::Result<()> {
        write!(self.buffer, "{}", text)
    }

    pub fn writeln(&mut self) -> io::Result<()> {
        writeln!(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_output_is_plain() {
        let mut writer = ColorWriter::new(true);
        writer.print_success("Upload successful!").unwrap();
        writer.print_field("URL", "https://x/y").unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            "✓ Upload successful!\nURL: https://x/y\n"
        );
    }

    #[test]
    fn test_color_output_has_escapes() {
        if std::env::var("NO_COLOR").is_ok() {
            return;
        }
        let mut writer = ColorWriter::new(false);
        writer.print_error("boom").unwrap();
        let out = writer.into_string().unwrap();
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("boom"));
    }
}
