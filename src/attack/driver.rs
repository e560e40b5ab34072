//! Sequential attack loop

use std::time::{Duration, Instant};

use super::{ProgressSink, StopReason, StopSignal};
use crate::error::Result;
use crate::oracle::DecryptionOracle;
use crate::types::{AttackConfig, AttackResult, DEFAULT_PROGRESS_INTERVAL};

/// Outcome of one attack run with its bookkeeping
#[derive(Debug, Clone)]
pub struct AttackReport {
    pub result: AttackResult,
    /// Candidates tried (including a successful one)
    pub attempts: u64,
    pub elapsed: Duration,
    /// Last candidate tried without success
    pub last_candidate: Option<String>,
    /// Set when the run stopped before its source ran out
    pub stopped: Option<StopReason>,
}

impl AttackReport {
    /// True when every candidate of the source was tried
    pub fn exhausted(&self) -> bool {
        !self.result.is_found() && self.stopped.is_none()
    }

    pub fn attempts_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drives a candidate source against an oracle, one candidate at a time.
#[derive(Debug, Clone)]
pub struct AttackDriver {
    progress_interval: u64,
}

impl AttackDriver {
    pub fn new() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_config(config: &AttackConfig) -> Self {
        Self::new().with_progress_interval(config.progress_interval)
    }

    /// Report progress every `interval` failed candidates; 0 disables reporting
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    /// Try every candidate until one opens the archive.
    ///
    /// Oracle errors other than a mismatch abort the run and are returned as-is.
    pub fn run<S, O>(
        &self,
        source: S,
        oracle: &mut O,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<AttackResult>
    where
        S: IntoIterator<Item = String>,
        O: DecryptionOracle + ?Sized,
    {
        self.attack(source, oracle, progress, &StopSignal::new())
            .map(|report| report.result)
    }

    /// Like [`AttackDriver::run`], but observes `stop` before each candidate
    /// and returns the full report.
    pub fn attack<S, O>(
        &self,
        source: S,
        oracle: &mut O,
        progress: Option<&dyn ProgressSink>,
        stop: &StopSignal,
    ) -> Result<AttackReport>
    where
        S: IntoIterator<Item = String>,
        O: DecryptionOracle + ?Sized,
    {
        let started = Instant::now();
        let mut candidates = source.into_iter();
        let mut attempts = 0u64;
        let mut since_report = 0u64;
        let mut last_candidate: Option<String> = None;

        let finish = |result, attempts, last_candidate, stopped| AttackReport {
            result,
            attempts,
            elapsed: started.elapsed(),
            last_candidate,
            stopped,
        };

        loop {
            if let Some(reason) = stop.check() {
                tracing::debug!(attempts, reason = %reason, "Attack stopped early");
                return Ok(finish(AttackResult::NotFound, attempts, last_candidate, Some(reason)));
            }

            let Some(candidate) = candidates.next() else {
                break;
            };

            let opened = match oracle.try_password(&candidate) {
                Ok(opened) => opened,
                Err(e) if e.is_mismatch() => false,
                Err(e) => {
                    tracing::warn!(candidate = %candidate, error = %e, "Oracle failed");
                    return Err(e.into());
                }
            };
            attempts += 1;

            if opened {
                tracing::info!(attempts, "Password found");
                return Ok(finish(AttackResult::Found(candidate), attempts, last_candidate, None));
            }

            since_report += 1;
            if self.progress_interval > 0 && since_report >= self.progress_interval {
                if let Some(sink) = progress {
                    sink.report(&candidate, since_report);
                }
                since_report = 0;
            }
            last_candidate = Some(candidate);
        }

        tracing::debug!(attempts, "Candidate source exhausted");
        Ok(finish(AttackResult::NotFound, attempts, last_candidate, None))
    }
}

impl Default for AttackDriver {
    fn default() -> Self {
        Self::new()
    }
}
