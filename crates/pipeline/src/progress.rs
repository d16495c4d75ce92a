use crate::event::SummaryEvent;

/// Consumer-side progress: bytes processed against a precomputed total.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    total: u64,
    processed: u64,
}

impl Progress {
    pub fn new(total: u64) -> Self {
        Self { total, processed: 0 }
    }

    pub fn advance(&mut self, bytes: u64) {
        self.processed = self.processed.saturating_add(bytes);
    }

    pub fn record(&mut self, event: &SummaryEvent) {
        self.advance(event.source_bytes() as u64);
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Percentage in 0..=100. An unknown (zero) total reports 0.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.processed.saturating_mul(100) / self.total;
        pct.min(100) as u8
    }

    /// Mark the work as done regardless of what was counted.
    pub fn finish(&mut self) {
        self.processed = self.processed.max(self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn percent_is_capped() {
        let mut p = Progress::new(200);
        assert_eq!(p.percent(), 0);
        p.advance(50);
        assert_eq!(p.percent(), 25);
        p.advance(500);
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn unknown_total_is_zero_until_finished() {
        let mut p = Progress::new(0);
        p.advance(10);
        assert_eq!(p.percent(), 0);
        let mut q = Progress::new(10);
        q.finish();
        assert_eq!(q.percent(), 100);
    }

    #[test]
    fn records_summary_source_bytes() {
        let mut p = Progress::new(100);
        p.record(&SummaryEvent::Summary {
            file: PathBuf::from("a.txt"),
            unit: 1,
            chunk: 0,
            source_bytes: 40,
            text: "short".into(),
        });
        p.record(&SummaryEvent::Unsupported { file: PathBuf::from("b.xyz") });
        assert_eq!(p.processed(), 40);
        assert_eq!(p.percent(), 40);
    }
}
