//! Progress bar display for batch runs

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress over the archives of one batch
pub struct ProgressDisplay {
    archive_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a progress display over `total_archives`; hidden when stderr is not a terminal
    pub fn new(total_archives: u64) -> Self {
        let archive_pb = ProgressBar::with_draw_target(
            Some(total_archives),
            ProgressDrawTarget::stderr(),
        );

        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
            archive_pb.set_style(style.progress_chars("#>-"));
        }

        if !console::Term::stderr().is_term() {
            archive_pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self { archive_pb }
    }

    /// Show which archive is being processed
    pub fn update_archive(&self, archive_name: &str, current: usize, total: usize) {
        let msg = format!("({current}/{total}) {archive_name}");
        self.archive_pb.set_message(msg);
    }

    /// Increment archive progress
    pub fn inc_archive(&self) {
        self.archive_pb.inc(1);
    }

    /// Clear the bar once the batch is done
    pub fn finish(&self) {
        self.archive_pb.finish_and_clear();
    }
}
