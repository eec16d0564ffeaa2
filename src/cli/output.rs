//! Terminal output for the packager.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints progress, warnings and results according to verbosity flags.
///
/// Errors and warnings go to stderr; everything else to stdout. Colour is
/// only used when the stream is a terminal.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Detail only shown with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.is_verbose() {
            writeln!(stdout(), "{message}")?;
        }
        Ok(())
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        status(&mut stdout(), "→", Color::Cyan, message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        status(&mut stdout(), "✓", Color::Green, message)
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        heading(&mut stdout(), title)
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(stdout(), "   {message}")?;
        }
        Ok(())
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        status(&mut stderr(), "⚠ warning:", Color::Yellow, message)
    }

    /// Always printed.
    pub fn error(&self, message: &str) -> io::Result<()> {
        status(&mut stderr(), "✗ error:", Color::Red, message)
    }
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(io::stdout().is_terminal()))
}

fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(io::stderr().is_terminal()))
}

/// Writes `marker` in bold `color`, then the message.
fn status(out: &mut impl WriteColor, marker: &str, color: Color, message: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{marker}")?;
    out.reset()?;
    writeln!(out, " {message}")
}

fn heading(out: &mut impl WriteColor, title: &str) -> io::Result<()> {
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{title}")?;
    out.reset()?;
    writeln!(out, "{}", "─".repeat(title.chars().count()))
}
