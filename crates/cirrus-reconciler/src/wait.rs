//! Fixed-interval condition polling.
//!
//! The control plane performs provisioning work in the background with no
//! push notification; the only way to observe completion is to ask again.
//! The deadline policy stays entirely with the caller through the
//! [`OpContext`] cancellation token.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::context::OpContext;
use crate::error::ReconcileError;

/// Interval between condition checks. Constant — remote completion times
/// are short and bounded, so there is no backoff growth.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll `check` until it reports done, fails, or the context is cancelled.
///
/// The first check runs immediately, covering the common case where the
/// condition already holds without spending a wait tick. A check error
/// propagates at the tick it occurs and is never masked as "not yet done";
/// cancellation surfaces as [`ReconcileError::Timeout`] naming `what`.
///
/// `check` must be idempotent and free of side effects beyond the read it
/// performs; failed reads are not retried here.
pub async fn wait_for_condition<F, Fut>(
    ctx: &OpContext,
    what: &str,
    interval: Duration,
    mut check: F,
) -> Result<(), ReconcileError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, ReconcileError>>,
{
    if check().await? {
        return Ok(());
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a fresh interval completes immediately; consume it
    // so the loop below waits a full interval before re-checking.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tracing::trace!(what, "re-checking awaited condition");
                if check().await? {
                    return Ok(());
                }
            }
            _ = ctx.cancellation().cancelled() => {
                return Err(ReconcileError::Timeout(what.to_string()));
            }
        }
    }
}
