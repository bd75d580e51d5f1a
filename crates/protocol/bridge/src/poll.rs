//! Bounded, cancellable polling.

use crate::{BridgeError, BridgeResult};
use core::{future::Future, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How a wait polls chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PollOptions {
    /// The delay before the second attempt.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub interval: Duration,
    /// The upper bound of the delay between attempts.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub max_interval: Duration,
    /// The factor the delay grows by after every attempt. `1` polls at a fixed interval.
    pub backoff_factor: u32,
    /// The total time to wait before failing with [`BridgeError::Timeout`], or `None` to wait
    /// until cancelled.
    #[cfg_attr(feature = "serde", serde(with = "option_duration_secs"))]
    pub timeout: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(4),
            max_interval: Duration::from_secs(60),
            backoff_factor: 1,
            timeout: None,
        }
    }
}

impl PollOptions {
    /// Returns the options with a fixed `interval` and no timeout.
    pub fn every(interval: Duration) -> Self {
        Self { interval, max_interval: interval, ..Default::default() }
    }

    /// Returns the options with the given `timeout`.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the options with exponential backoff by `factor`, capped at `max_interval`.
    pub const fn with_backoff(mut self, factor: u32, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval = max_interval;
        self
    }

    fn next_interval(&self, current: Duration) -> Duration {
        current.saturating_mul(self.backoff_factor.max(1)).min(self.max_interval.max(self.interval))
    }
}

/// Calls `poll` until it yields a value, sleeping between attempts as `options` describe.
///
/// `Ok(None)` means "not yet". Retryable errors are logged and the attempt is repeated;
/// any other error ends the wait. The wait fails with [`BridgeError::Cancelled`] as soon as
/// `cancel` fires and with [`BridgeError::Timeout`] once the timeout elapses, including
/// while an attempt is in flight.
pub async fn poll_with_backoff<T, F, Fut>(
    options: &PollOptions,
    cancel: &CancellationToken,
    mut poll: F,
) -> BridgeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BridgeResult<Option<T>>>,
{
    let deadline = options.timeout.map(|timeout| Instant::now() + timeout);
    let timed_out = || BridgeError::Timeout(options.timeout.unwrap_or_default());
    let mut interval = options.interval;
    let mut attempt: u64 = 0;

    loop {
        attempt += 1;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(target: "bridge::poll", attempt, "Wait cancelled");
                return Err(BridgeError::Cancelled);
            }
            _ = until(deadline) => return Err(timed_out()),
            outcome = poll() => outcome,
        };

        match outcome {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                trace!(target: "bridge::poll", attempt, ?interval, "Condition not met yet");
            }
            Err(err) if err.is_retryable() => {
                warn!(target: "bridge::poll", attempt, %err, "Retryable error while polling");
            }
            Err(err) => return Err(err),
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(target: "bridge::poll", attempt, "Wait cancelled");
                return Err(BridgeError::Cancelled);
            }
            _ = until(deadline) => return Err(timed_out()),
            _ = tokio::time::sleep(interval) => {}
        }
        interval = options.next_interval(interval);
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => core::future::pending().await,
    }
}

#[cfg(feature = "serde")]
mod duration_secs {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(feature = "serde")]
mod option_duration_secs {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|secs| secs.map(Duration::from_secs))
    }
}
