//! Statistics reporting.

use console::style;

use crate::download::BatchStats;

/// Print statistics of a media run.
pub fn print_batch_stats(stats: &BatchStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Statistics:").bold());
    println!("  Pictures: {}", stats.pic_count);
    println!("  Videos:   {}", stats.vid_count);
    println!("  Audio:    {}", stats.audio_count);
    if stats.failed_count > 0 {
        println!("  Failed:   {}", style(stats.failed_count).red());
    }
    println!("  Total:    {} downloaded", stats.total_downloaded());
    println!("{}", style("═".repeat(50)).dim());
}
