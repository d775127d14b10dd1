//! Download statistics.

use crate::download::batch::DownloadOutcome;
use crate::media::MediaKind;

/// Counts over the outcomes of a batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub pic_count: u64,
    pub vid_count: u64,
    pub audio_count: u64,
    pub failed_count: u64,
}

impl BatchStats {
    /// Tally a list of outcomes.
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats
    }

    /// Count a single outcome.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        if !outcome.is_success() {
            self.failed_count += 1;
            return;
        }

        match outcome.kind() {
            MediaKind::Image => self.pic_count += 1,
            MediaKind::Video => self.vid_count += 1,
            MediaKind::Audio => self.audio_count += 1,
        }
    }

    /// Get total downloaded count.
    pub fn total_downloaded(&self) -> u64 {
        self.pic_count + self.vid_count + self.audio_count
    }
}
