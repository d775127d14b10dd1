//! Console output utilities.

use console::style;

use crate::download::DownloadOutcome;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    println!(
        "{} {} started",
        style("Skraper").green(),
        style(concat!("v.", env!("CARGO_PKG_VERSION"))).magenta()
    );
}

/// Print the result of one media download.
pub fn print_outcome(outcome: &DownloadOutcome) {
    match outcome {
        DownloadOutcome::Downloaded { path, .. } => print_success(&path.display().to_string()),
        DownloadOutcome::Failed { url, error, .. } => {
            print_error(&format!("Cannot download {} , Reason: {}", url, style(error).red()))
        }
    }
}
