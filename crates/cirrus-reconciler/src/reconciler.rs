//! The shared CRUD contract every resource reconciler implements.

use crate::context::OpContext;
use crate::error::ReconcileError;

/// Per-resource reconciliation contract.
///
/// `Config` is the caller-supplied target state, `State` the
/// last-synchronized record the host persists between passes. Observed from
/// the host, each instance moves through
/// `absent → creating → present → (present ⇄ mutating) → deleting → absent`;
/// the transient states are collapsed inside the operations by the poller,
/// so control only returns once the entity is settled.
///
/// Operations against one instance must be invoked sequentially by the
/// host; the reconciler holds no state of its own between calls, so
/// independent instances may reconcile concurrently over the same shared
/// service handles.
#[allow(async_fn_in_trait)]
pub trait Reconcile {
    type Config;
    type State;

    /// Create the remote entity, wait out any deferred provisioning, and
    /// read the result back so the returned record carries server-computed
    /// attributes rather than echoing the input.
    ///
    /// On a failed dependent follow-up call the half-created entity is
    /// removed best-effort; a failed rollback is reported alongside the
    /// primary error, never in place of it.
    async fn create(
        &self,
        ctx: &OpContext,
        desired: &Self::Config,
    ) -> Result<Self::State, ReconcileError>;

    /// Refresh the record from remote truth. `NotFound` signals the entity
    /// was deleted out-of-band.
    async fn read(
        &self,
        ctx: &OpContext,
        current: &Self::State,
    ) -> Result<Self::State, ReconcileError>;

    /// Apply the minimal remote mutations implied by the difference between
    /// `desired` and `previous`. A changed immutable attribute yields
    /// `NotSupported` before any call is issued; the host performs
    /// replacement instead.
    async fn update(
        &self,
        ctx: &OpContext,
        previous: &Self::State,
        desired: &Self::Config,
    ) -> Result<Self::State, ReconcileError>;

    /// Tear the entity down, running detach/unlink preconditions first.
    /// Deleting an already-absent entity succeeds.
    async fn delete(&self, ctx: &OpContext, current: &Self::State) -> Result<(), ReconcileError>;
}
