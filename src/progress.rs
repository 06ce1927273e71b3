//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Spinner shown while a compare run moves through its stages
#[derive(Debug)]
pub struct ProgressReporter {
    stage_pb: Option<ProgressBar>,
    show_progress: bool,
    start_time: Instant,
}

impl ProgressReporter {
    /// Create progress reporter for compare runs
    pub fn new_for_compare() -> Self {
        Self {
            stage_pb: None,
            show_progress: true,
            start_time: Instant::now(),
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            stage_pb: None,
            show_progress: false,
            start_time: Instant::now(),
        }
    }

    /// Start a new stage, finishing the previous one silently
    pub fn start_stage(&mut self, message: &str) {
        if let Some(pb) = self.stage_pb.take() {
            pb.finish_and_clear();
        }
        if self.show_progress {
            self.stage_pb = Some(create_spinner(message));
        }
        log::debug!("{}", message);
    }

    /// Finish the current stage with a message left on screen
    pub fn finish_stage(&mut self, message: &str) {
        if let Some(pb) = self.stage_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn is_active(&self) -> bool {
        self.stage_pb.is_some()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.stage_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
