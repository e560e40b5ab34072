//! Attack execution - feed candidates to an oracle until one opens the archive
//!
//! [`AttackDriver`] runs one source sequentially; [`ParallelAttack`] splits a
//! source into interleaved partitions and drives each on its own worker.

mod driver;
mod parallel;
mod progress;
mod state;

pub use driver::{AttackDriver, AttackReport};
pub use parallel::{ParallelAttack, ParallelReport, WorkerReport};
pub use progress::{LogProgress, ProgressSink};
pub use state::AttackState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::AttackConfig;

/// Why an attack stopped before exhausting its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Stopped on request (another worker succeeded, or the user interrupted)
    Cancelled,
    /// The configured time limit passed
    TimedOut,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Cooperative stop flag with an optional deadline.
///
/// Checked once per candidate. Clones share the same flag; [`StopSignal::linked`]
/// creates a signal that can be cancelled on its own but also observes its
/// parent.
#[derive(Debug, Clone)]
pub struct StopSignal {
    own: Arc<AtomicBool>,
    watched: Vec<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl StopSignal {
    /// Create a signal with no deadline
    pub fn new() -> Self {
        Self {
            own: Arc::new(AtomicBool::new(false)),
            watched: Vec::new(),
            deadline: None,
        }
    }

    /// Create a signal that also stops once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..Self::new()
        }
    }

    pub fn from_config(config: &AttackConfig) -> Self {
        match config.timeout {
            Some(timeout) => Self::with_timeout(timeout),
            None => Self::new(),
        }
    }

    /// New signal that observes this one, cancellable independently
    pub fn linked(&self) -> Self {
        let mut watched = self.watched.clone();
        watched.push(Arc::clone(&self.own));
        Self {
            own: Arc::new(AtomicBool::new(false)),
            watched,
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.own.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.own.load(Ordering::Acquire) || self.watched.iter().any(|f| f.load(Ordering::Acquire))
    }

    /// Reason to stop now, if any
    pub fn check(&self) -> Option<StopReason> {
        if self.is_cancelled() {
            return Some(StopReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StopReason::TimedOut),
            _ => None,
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
