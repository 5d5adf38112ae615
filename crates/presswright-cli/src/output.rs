//! Terminal output for command results.
//!
//! Everything a command prints goes through [`OutputManager`]; tracing
//! output goes to stderr separately (see `logging`).

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Leading glyph and colour of a status line.
#[derive(Debug, Clone, Copy)]
enum Status {
    Success,
    Warning,
    Info,
}

impl Status {
    fn glyph(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Info => Style::new().blue(),
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// `Auto` becomes `Human` on a terminal and `Plain` otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// A live progress bar only makes sense for a person watching a terminal.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Human && self.term.is_term()
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.write(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.no_color {
            self.write(text)
        } else {
            self.write(&text.cyan().bold().to_string())
        }
    }

    /// Aligned `label value` row under a header.
    pub fn field(&self, label: &str, value: &str) -> io::Result<()> {
        if self.no_color {
            self.write(&format!("  {label:<22} {value}"))
        } else {
            self.write(&format!("  {:<22} {value}", label.dimmed()))
        }
    }

    /// Pretty-printed JSON on stdout. Quiet mode does not apply: the
    /// document is the result.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    fn status(&self, status: Status, msg: &str) -> io::Result<()> {
        let glyph = status.glyph();
        if self.no_color {
            return self.write(&format!("{glyph} {msg}"));
        }
        let style = status.style();
        self.write(&format!("{} {}", glyph.style(style.bold()), msg.style(style)))
    }

    fn write(&self, line: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            // Plain skips terminal detection.
            output_format: OutputFormat::Plain,
            log_file: None,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_mode_writes_nothing() {
        let out = manager(true, true);
        assert!(out.print("hello").is_ok());
        assert!(out.success("done").is_ok());
        assert!(out.field("Environment", "localhost").is_ok());
    }

    #[test]
    fn config_no_color_is_honoured() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Plain,
            log_file: None,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(OutputManager::new(&args, &config).no_color);
        assert!(!manager(false, false).no_color);
    }

    #[test]
    fn plain_output_has_no_progress_bar() {
        assert!(!manager(false, true).show_progress());
    }

    #[test]
    fn explicit_format_is_kept() {
        assert_eq!(manager(false, false).format(), OutputFormat::Plain);
    }

    #[test]
    fn status_glyphs_differ() {
        assert_ne!(Status::Success.glyph(), Status::Warning.glyph());
        assert_ne!(Status::Warning.glyph(), Status::Info.glyph());
    }
}
