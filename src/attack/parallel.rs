//! Multi-worker attack over interleaved partitions

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use super::{AttackDriver, AttackReport, ProgressSink, StopReason, StopSignal};
use crate::error::Result;
use crate::generator::CandidateSource;
use crate::oracle::DecryptionOracle;
use crate::types::{AttackConfig, AttackResult};

/// Report of a single worker
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Partition index; the worker saw candidates `partition, partition + stride, ...`
    pub partition: usize,
    pub report: AttackReport,
}

/// Combined report of a parallel attack
#[derive(Debug, Clone)]
pub struct ParallelReport {
    pub result: AttackResult,
    pub workers: Vec<WorkerReport>,
    pub stride: usize,
    pub elapsed: Duration,
}

impl ParallelReport {
    /// Total candidates tried across workers
    pub fn attempts(&self) -> u64 {
        self.workers.iter().map(|w| w.report.attempts).sum()
    }

    /// Why the run stopped early, if it did and nothing was found
    pub fn stopped(&self) -> Option<StopReason> {
        if self.result.is_found() {
            return None;
        }
        self.workers.iter().find_map(|w| w.report.stopped)
    }

    /// Length of the leading run of source positions that were all tried.
    ///
    /// `None` when every partition ran out, i.e. the whole source was covered.
    pub fn covered(&self) -> Option<u64> {
        let stride = self.stride as u64;
        self.workers
            .iter()
            .filter(|w| !w.report.exhausted())
            .map(|w| w.partition as u64 + w.report.attempts * stride)
            .min()
    }

    pub fn attempts_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Runs one [`AttackDriver`] per partition on blocking worker threads.
///
/// The first worker to find the password stops the rest; so does the first
/// fatal oracle error.
#[derive(Debug, Clone)]
pub struct ParallelAttack {
    driver: AttackDriver,
    workers: usize,
}

impl ParallelAttack {
    pub fn new(workers: usize, driver: AttackDriver) -> Self {
        Self {
            driver,
            workers: workers.max(1),
        }
    }

    pub fn from_config(config: &AttackConfig) -> Self {
        Self::new(config.worker_count(), AttackDriver::with_config(config))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run<O>(
        &self,
        source: CandidateSource,
        oracle: O,
        progress: Arc<dyn ProgressSink>,
        stop: &StopSignal,
    ) -> Result<ParallelReport>
    where
        O: DecryptionOracle + Clone + Send + 'static,
    {
        let started = Instant::now();
        let stride = self.workers;
        let halt = stop.linked();

        tracing::info!(workers = stride, "Starting attack");

        let handles: Vec<_> = (0..stride)
            .map(|index| {
                let partition = source.clone().partition(index, stride);
                let mut oracle = oracle.clone();
                let driver = self.driver.clone();
                let progress = Arc::clone(&progress);
                let halt = halt.clone();

                tokio::task::spawn_blocking(move || {
                    tracing::debug!(worker = index, "Worker started");
                    let outcome = driver.attack(partition, &mut oracle, Some(&*progress), &halt);
                    match &outcome {
                        Ok(report) if report.result.is_found() => halt.cancel(),
                        Err(_) => halt.cancel(),
                        Ok(_) => {}
                    }
                    tracing::debug!(worker = index, ok = outcome.is_ok(), "Worker finished");
                    outcome
                })
            })
            .collect();

        let mut workers = Vec::with_capacity(stride);
        let mut first_error = None;
        for (partition, outcome) in join_all(handles).await.into_iter().enumerate() {
            match outcome? {
                Ok(report) => workers.push(WorkerReport { partition, report }),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        // Lowest partition wins if several workers succeed at once
        let found = workers
            .iter()
            .find(|w| w.report.result.is_found())
            .map(|w| w.report.result.clone());

        let result = match (found, first_error) {
            (Some(result), _) => result,
            (None, Some(e)) => return Err(e),
            (None, None) => AttackResult::NotFound,
        };

        Ok(ParallelReport {
            result,
            workers,
            stride,
            elapsed: started.elapsed(),
        })
    }
}
