//! Colored log output for source fetching
//!
//! Uses owo-colors for terminal colors. Every function is fire-and-forget:
//! write failures on stdout/stderr (a closed pipe, a full disk) are ignored
//! and never change fetch behavior.

use owo_colors::OwoColorize;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static TRACE: AtomicBool = AtomicBool::new(false);

/// Enable or disable trace output for the whole process.
pub fn set_trace(enabled: bool) {
    TRACE.store(enabled, Ordering::Relaxed);
}

/// Whether trace output is enabled. `SOURCE_FETCH_TRACE=1` turns it on too.
pub fn trace_enabled() -> bool {
    TRACE.load(Ordering::Relaxed)
        || std::env::var("SOURCE_FETCH_TRACE").is_ok_and(|v| v == "1")
}

/// Write one line, dropping any I/O error.
fn write_line(mut out: impl Write, line: fmt::Arguments<'_>) {
    let _ = writeln!(out, "{}", line);
}

/// Print a notice (what is about to happen)
/// Example: "==> download: http://... -> sources/foo.tar.gz"
pub fn notice(message: &str) {
    #[cfg(test)]
    capture::record("notice", message);
    write_line(
        std::io::stdout().lock(),
        format_args!("{} {}", "==>".blue().bold(), message),
    );
}

/// Print a detail line that belongs in the build log (dimmed)
/// Example: "     checksums: foo.tar.gz: abc... => abc..."
pub fn output(message: &str) {
    #[cfg(test)]
    capture::record("output", message);
    write_line(
        std::io::stdout().lock(),
        format_args!("     {}", message.dimmed()),
    );
}

/// Print a trace line, only when tracing is enabled
pub fn trace(message: &str) {
    if trace_enabled() {
        #[cfg(test)]
        capture::record("trace", message);
        write_line(
            std::io::stdout().lock(),
            format_args!("  {} {}", "->".cyan(), message.dimmed()),
        );
    }
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    #[cfg(test)]
    capture::record("warning", message);
    write_line(
        std::io::stderr().lock(),
        format_args!("{} {}", "warning:".yellow().bold(), message.yellow()),
    );
}

/// Print an error message (red)
pub fn error(message: &str) {
    #[cfg(test)]
    capture::record("error", message);
    write_line(
        std::io::stderr().lock(),
        format_args!("{} {}", "error:".red().bold(), message.red()),
    );
}

/// Write raw text to stdout without a newline and flush it.
pub fn stdout_raw(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(text.as_bytes());
    let _ = out.flush();
}
