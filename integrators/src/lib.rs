//! Integrators

#[macro_use]
extern crate log;

mod bdpt;

// Re-export.
pub use bdpt::*;

use indicatif::{ProgressBar, ProgressStyle};

/// Returns a progress bar for tracking render progress.
///
/// * `len` - Total number of work units.
pub(crate) fn create_progress_bar(len: u64) -> ProgressBar {
    let progress_style = ProgressStyle::default_bar()
        .template("{msg:25.cyan.bold} [{bar:40.green/white}] {pos:>5}/{len:5} ({elapsed}|{eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ");
    let pb = ProgressBar::new(len);
    pb.set_style(progress_style);
    pb
}
