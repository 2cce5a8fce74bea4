//! Shared rate-limit pause handling for Graph API requests.
//!
//! Graph throttles this kind of bulk-create workload tenant-wide, so the
//! gate keeps a single resume deadline that every caller waits on, instead
//! of per-request backoff state.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Tenant-wide pause deadline shared by all outbound requests.
///
/// The deadline only ever moves forward: a new throttle signal never
/// shortens an existing pause. It clears implicitly once the clock passes
/// it.
#[derive(Debug)]
pub struct ThrottleGate {
    paused_until: RwLock<Option<Instant>>,
    /// Pause applied when a throttle carries no usable `Retry-After`.
    fallback: Duration,
}

impl ThrottleGate {
    /// Creates a gate with the given fallback pause window.
    #[must_use]
    pub fn new(fallback: Duration) -> Self {
        Self {
            paused_until: RwLock::new(None),
            fallback,
        }
    }

    /// Returns the fallback pause window.
    #[must_use]
    pub fn fallback(&self) -> Duration {
        self.fallback
    }

    /// Parses a `Retry-After` header value as whole seconds.
    ///
    /// HTTP-date forms are not supported and yield `None`, which callers
    /// treat the same as an absent header.
    #[must_use]
    pub fn parse_retry_after(header_value: &str) -> Option<u64> {
        header_value.trim().parse::<u64>().ok()
    }

    /// Suspends the caller until the shared deadline has passed.
    ///
    /// No-op when the deadline is unset or already behind the clock.
    pub async fn wait_if_paused(&self) {
        let remaining = self.pause_remaining().await;
        if let Some(wait) = remaining {
            info!("Rate limited globally, waiting {:.1}s", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }

    /// Records a throttle signal, pausing all requests.
    ///
    /// Uses the `Retry-After` seconds when the header parses, otherwise the
    /// fallback window.
    pub async fn record_throttle(&self, retry_after: Option<&str>) {
        match retry_after.and_then(Self::parse_retry_after) {
            Some(secs) => {
                warn!("Throttled (429), pausing all requests for {} seconds", secs);
                self.pause_for(Duration::from_secs(secs)).await;
            }
            None => {
                warn!(
                    "Throttled (429) without usable Retry-After, pausing for {:.0} seconds",
                    self.fallback.as_secs_f64()
                );
                self.pause_for(self.fallback).await;
            }
        }
    }

    /// Advances the shared deadline to at least `duration` from now.
    pub async fn pause_for(&self, duration: Duration) {
        let candidate = Instant::now() + duration;
        let mut paused = self.paused_until.write().await;
        match *paused {
            Some(current) if current >= candidate => {
                debug!("Existing pause already extends past the new deadline");
            }
            _ => *paused = Some(candidate),
        }
    }

    /// Returns how long the current pause has left, if one is active.
    pub async fn pause_remaining(&self) -> Option<Duration> {
        let paused = self.paused_until.read().await;
        paused
            .and_then(|until| until.checked_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(ThrottleGate::parse_retry_after("60"), Some(60));
        assert_eq!(ThrottleGate::parse_retry_after("  120  "), Some(120));
        assert_eq!(
            ThrottleGate::parse_retry_after("Fri, 31 Dec 1999 23:59:59 GMT"),
            None
        );
        assert_eq!(ThrottleGate::parse_retry_after(""), None);
    }

    #[tokio::test]
    async fn test_unset_gate_does_not_wait() {
        let gate = ThrottleGate::new(Duration::from_secs(150));

        let start = Instant::now();
        gate.wait_if_paused().await;
        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(gate.pause_remaining().await.is_none());
    }

    #[tokio::test]
    async fn test_wait_blocks_until_deadline() {
        let gate = ThrottleGate::new(Duration::from_secs(150));
        gate.pause_for(Duration::from_millis(60)).await;

        let start = Instant::now();
        gate.wait_if_paused().await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(50), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_record_throttle_prefers_header_seconds() {
        let gate = ThrottleGate::new(Duration::from_secs(150));
        gate.record_throttle(Some("3")).await;

        let remaining = gate.pause_remaining().await.expect("pause should be set");
        assert!(remaining <= Duration::from_secs(3));
        assert!(remaining > Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_record_throttle_falls_back_without_header() {
        let gate = ThrottleGate::new(Duration::from_millis(500));
        gate.record_throttle(None).await;

        let remaining = gate.pause_remaining().await.expect("pause should be set");
        assert!(remaining <= Duration::from_millis(500));
        assert!(remaining > Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_record_throttle_falls_back_on_http_date() {
        let gate = ThrottleGate::new(Duration::from_millis(500));
        gate.record_throttle(Some("Wed, 21 Oct 2026 07:28:00 GMT")).await;

        let remaining = gate.pause_remaining().await.expect("pause should be set");
        assert!(remaining <= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_deadline_never_decreases() {
        let gate = ThrottleGate::new(Duration::from_secs(150));
        gate.pause_for(Duration::from_secs(10)).await;
        let long = gate.pause_remaining().await.expect("pause should be set");

        // A shorter signal must not shorten the existing pause.
        gate.pause_for(Duration::from_secs(1)).await;
        let after = gate.pause_remaining().await.expect("pause should remain");
        assert!(after >= long - Duration::from_millis(100), "after {after:?}");

        // A longer signal extends it.
        gate.pause_for(Duration::from_secs(30)).await;
        let extended = gate.pause_remaining().await.expect("pause should remain");
        assert!(extended > Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_pause_clears_after_deadline() {
        let gate = ThrottleGate::new(Duration::from_secs(150));
        gate.pause_for(Duration::from_millis(20)).await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(gate.pause_remaining().await.is_none());

        let start = Instant::now();
        gate.wait_if_paused().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
