//! cirrus-reconciler
//!
//! Reconciliation core: brings remote cloud resources into agreement with a
//! desired configuration through Create/Read/Update/Delete against the
//! service traits of `cirrus-api`, and hands the host a state record to
//! persist between passes.
//!
//! Building blocks:
//! - `filter` — predicate matching over listed collections
//! - `wait` — fixed-interval polling with caller-owned cancellation
//! - `diff` — mutability-classified field diffing
//! - `resources` — one reconciler per resource kind, all implementing the
//!   [`Reconcile`] contract
//! - `lookup` — unambiguous find-by-selector over list endpoints

pub mod context;
pub mod diff;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod order;
pub mod reconciler;
pub mod resources;
pub mod wait;

pub use crate::context::{OpContext, Warning};
pub use crate::diff::{AttributeSchema, Change, Mutability};
pub use crate::error::ReconcileError;
pub use crate::filter::FilterError;
pub use crate::reconciler::Reconcile;
