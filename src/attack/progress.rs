//! Progress reporting sinks

use indicatif::ProgressBar;

/// Receives periodic progress from an attack.
///
/// `attempts` is the number of candidates tried since the previous report.
pub trait ProgressSink: Send + Sync {
    fn report(&self, candidate: &str, attempts: u64);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, u64) + Send + Sync,
{
    fn report(&self, candidate: &str, attempts: u64) {
        self(candidate, attempts)
    }
}

/// Logs the latest candidate through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, candidate: &str, attempts: u64) {
        tracing::info!(candidate = %candidate, attempts, "Attack progress");
    }
}

impl ProgressSink for ProgressBar {
    fn report(&self, candidate: &str, attempts: u64) {
        self.inc(attempts);
        self.set_message(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |candidate: &str, attempts: u64| seen.lock().push((candidate.to_string(), attempts));
        sink.report("abc", 10);
        sink.report("abd", 10);
        assert_eq!(
            *seen.lock(),
            vec![("abc".to_string(), 10), ("abd".to_string(), 10)]
        );
    }

    #[test]
    fn test_progress_bar_sink() {
        let bar = ProgressBar::hidden();
        bar.report("zz", 25);
        bar.report("zzz", 5);
        assert_eq!(bar.position(), 30);
        assert_eq!(bar.message(), "zzz");
    }
}
