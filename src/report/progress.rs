use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Per-pass progress on stderr: a cyan header line, a spinner ticking once per
/// record, and a closing count. Silent when hidden.
pub struct Progress {
    visible: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn visible() -> Self {
        Self {
            visible: true,
            bar: None,
        }
    }

    /// No output at all; used with `--quiet` and in tests.
    pub fn hidden() -> Self {
        Self {
            visible: false,
            bar: None,
        }
    }

    pub fn start_pass(&mut self, label: &str) {
        self.finish_bar();
        if !self.visible {
            return;
        }
        eprintln!("  {} {}", "→".cyan(), label);

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {pos} {msg}")
        {
            pb.set_style(style);
        }
        self.bar = Some(pb);
    }

    pub fn record(&self, id: &str) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
            pb.set_message(id.to_string());
        }
    }

    pub fn finish_pass(&mut self, written: usize, noun: &str) {
        self.finish_bar();
        if self.visible {
            eprintln!("    {} {} written", written, noun);
        }
    }

    /// Console-only notice that does not become a warning.
    pub fn notice(&self, message: &str) {
        if self.visible {
            match &self.bar {
                Some(pb) => pb.println(format!("  {} {}", "!".yellow(), message)),
                None => eprintln!("  {} {}", "!".yellow(), message),
            }
        }
    }

    fn finish_bar(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_bar();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_never_creates_a_bar() {
        let mut progress = Progress::hidden();
        progress.start_pass("Licenses");
        progress.record("MIT");
        assert!(progress.bar.is_none());
        progress.finish_pass(1, "licenses");
        assert!(progress.bar.is_none());
    }
}
