//! Output system for pairgit
//!
//! [`UserIo`] is the notice channel the repository manager writes to;
//! [`Output`] renders it on the terminal alongside the CLI's own messages.

use console::style;

/// User-facing notices emitted by library operations
pub trait UserIo {
    /// Informational notice
    fn tool_output(&self, message: &str);

    /// Error notice
    fn tool_error(&self, message: &str);
}

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a table row
    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    /// Print unstyled text, e.g. a file listing meant for pipes
    pub fn plain(&self, text: &str) {
        println!("{text}");
    }
}

impl UserIo for Output {
    fn tool_output(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn tool_error(&self, message: &str) {
        self.error(message);
    }
}
