//! Render pass statistics.

use std::time::{Duration, Instant};

/// Counters collected during one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    /// Fragments emitted (one for a full render).
    pub fragments: usize,

    /// Dirty ids that no longer resolved and were dropped
    pub stale_skipped: usize,

    /// Dirty ids already contained in a dirty ancestor's fragment
    pub covered_skipped: usize,

    /// Widgets whose render failed and were replaced by a placeholder
    pub failures: usize,

    /// Widgets whose markup was produced, descendants included
    pub widgets_rendered: usize,

    /// Wall time of the pass
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of dirty entries that produced no fragment of their own (0.0 to 1.0).
    pub fn skip_ratio(&self) -> f32 {
        let skipped = self.stale_skipped + self.covered_skipped;
        let total = skipped + self.fragments;
        if total == 0 {
            0.0
        } else {
            skipped as f32 / total as f32
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} fragments ({} widgets) in {:.2}ms, {} stale, {} covered, {} failed",
            self.fragments,
            self.widgets_rendered,
            self.elapsed.as_secs_f64() * 1000.0,
            self.stale_skipped,
            self.covered_skipped,
            self.failures,
        )
    }
}

/// Measures the elapsed time of a pass.
pub(crate) struct StatsTimer {
    start: Instant,
}

impl StatsTimer {
    pub(crate) fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub(crate) fn finish(self, stats: &mut RenderStats) {
        stats.elapsed = self.start.elapsed();
    }
}
