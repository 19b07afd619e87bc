//! Progress display for transfers and VCS commands
//!
//! Thin wrappers over indicatif so every downloader draws the same way.

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Standard spinner characters
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard tick interval for spinners
const TICK_INTERVAL_MS: u64 = 80;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("     {spinner:.cyan} {msg}")
        .expect("static progress template")
        .tick_chars(SPINNER_CHARS)
}

/// Create a spinner progress bar with standard styling.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(TICK_INTERVAL_MS));
    pb
}

/// Status line for a running download.
///
/// Renders `downloading: <dst> - <have> [of <total> (<pct>%)]` and only
/// redraws when the rendered text changes.
pub struct TransferStatus {
    pb: ProgressBar,
    dst: String,
    length: Option<u64>,
    last: String,
}

impl TransferStatus {
    pub fn new(dst: &str, length: Option<u64>) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        let mut status = Self {
            pb,
            dst: dst.to_string(),
            length,
            last: String::new(),
        };
        status.update(0);
        status
    }

    pub fn render(&self, have: u64) -> String {
        let mut msg = format!("downloading: {} - {}", self.dst, HumanBytes(have));
        if let Some(length) = self.length.filter(|l| *l > 0) {
            let percent = (have as f64 / length as f64) * 100.0;
            msg.push_str(&format!(" of {} ({:.0}%)", HumanBytes(length), percent));
        }
        msg
    }

    pub fn update(&mut self, have: u64) {
        let msg = self.render(have);
        if msg != self.last {
            self.pb.set_message(msg.clone());
            self.pb.tick();
            self.last = msg;
        }
    }
}

impl Drop for TransferStatus {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}

/// RAII guard that clears a progress bar when dropped.
pub struct ProgressGuard<'a>(&'a ProgressBar);

impl<'a> ProgressGuard<'a> {
    pub fn new(pb: &'a ProgressBar) -> Self {
        Self(pb)
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
