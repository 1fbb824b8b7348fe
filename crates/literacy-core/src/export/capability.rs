//! Runtime capability detection for the export pipeline.
//!
//! ```text
//! Unavailable -> Ready
//!             -> Error   (ceiling elapsed; permanent for this probe)
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityStatus {
    Unavailable,
    Ready,
    Error,
}

/// Something the export needs that may only become usable at runtime.
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;

    fn is_ready(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct CapabilityProbe {
    status: CapabilityStatus,
    missing: Vec<String>,
}

impl CapabilityProbe {
    pub fn new() -> Self {
        Self {
            status: CapabilityStatus::Unavailable,
            missing: Vec::new(),
        }
    }

    pub fn status(&self) -> CapabilityStatus {
        self.status
    }

    /// Names of the capabilities that never became ready.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Wait for every capability, polling every `interval` up to `ceiling`.
    ///
    /// Only runs from `Unavailable`; a settled probe returns its status
    /// unchanged, so an `Error` is never retried.
    pub async fn run(
        &mut self,
        capabilities: &[&dyn Capability],
        interval: Duration,
        ceiling: Duration,
    ) -> CapabilityStatus {
        if self.status != CapabilityStatus::Unavailable {
            return self.status;
        }
        let all_ready = || capabilities.iter().all(|c| c.is_ready());

        if all_ready() {
            self.status = CapabilityStatus::Ready;
            return self.status;
        }

        let poll = async {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if all_ready() {
                    break;
                }
            }
        };

        match tokio::time::timeout(ceiling, poll).await {
            Ok(()) => {
                tracing::debug!("export capabilities ready");
                self.status = CapabilityStatus::Ready;
            }
            Err(_) => {
                self.missing = capabilities
                    .iter()
                    .filter(|c| !c.is_ready())
                    .map(|c| c.name().to_string())
                    .collect();
                tracing::error!(
                    missing = ?self.missing,
                    ceiling_ms = ceiling.as_millis() as u64,
                    "export capabilities failed to load"
                );
                self.status = CapabilityStatus::Error;
            }
        }
        self.status
    }
}

impl Default for CapabilityProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Becomes ready after `after` checks.
    struct Delayed {
        checks: AtomicUsize,
        after: usize,
    }

    impl Delayed {
        fn new(after: usize) -> Self {
            Self {
                checks: AtomicUsize::new(0),
                after,
            }
        }
    }

    impl Capability for Delayed {
        fn name(&self) -> &str {
            "delayed"
        }

        fn is_ready(&self) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst) + 1 > self.after
        }
    }

    const INTERVAL: Duration = Duration::from_millis(500);
    const CEILING: Duration = Duration::from_millis(8000);

    #[tokio::test(start_paused = true)]
    async fn ready_immediately() {
        let cap = Delayed::new(0);
        let mut probe = CapabilityProbe::new();
        let started = tokio::time::Instant::now();
        assert_eq!(probe.run(&[&cap], INTERVAL, CEILING).await, CapabilityStatus::Ready);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_polling() {
        let cap = Delayed::new(3);
        let mut probe = CapabilityProbe::new();
        assert_eq!(probe.status(), CapabilityStatus::Unavailable);
        let started = tokio::time::Instant::now();
        assert_eq!(probe.run(&[&cap], INTERVAL, CEILING).await, CapabilityStatus::Ready);
        // initial check + polls at 500, 1000, 1500 ms
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn error_after_ceiling_is_permanent() {
        let never = Delayed::new(usize::MAX);
        let ready = Delayed::new(0);
        let mut probe = CapabilityProbe::new();
        let status = probe.run(&[&ready, &never], INTERVAL, CEILING).await;
        assert_eq!(status, CapabilityStatus::Error);
        assert_eq!(probe.missing(), ["delayed".to_string()]);

        // no retry, even if the capability would now succeed
        let now_ready = Delayed::new(0);
        assert_eq!(
            probe.run(&[&now_ready], INTERVAL, CEILING).await,
            CapabilityStatus::Error
        );
    }
}
