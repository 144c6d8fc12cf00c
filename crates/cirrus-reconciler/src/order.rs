//! Settlement of deferred provisioning orders.

use cirrus_api::service::OrderService;
use cirrus_api::{OrderStatus, Ordering};

use crate::context::OpContext;
use crate::error::ReconcileError;
use crate::wait;

/// Poll the order behind `ordering` until it settles and resolve the id of
/// the entity it provisioned.
///
/// A failed order surfaces as [`ReconcileError::OrderFailed`]; cancellation
/// leaves the order in an unknown state (it may still complete remotely)
/// and surfaces as `Timeout`.
pub async fn wait_until_processed(
    ctx: &OpContext,
    orders: &dyn OrderService,
    ordering: Ordering,
) -> Result<u64, ReconcileError> {
    let order_id = ordering.order_id;

    wait::wait_for_condition(ctx, "order to be processed", wait::POLL_INTERVAL, || async move {
        let order = orders.get(order_id).await?;
        tracing::trace!(order_id, status = ?order.status, "order status");
        match order.status {
            OrderStatus::Processed => Ok(true),
            OrderStatus::Failed => Err(ReconcileError::OrderFailed(order_id)),
            OrderStatus::Created | OrderStatus::Processing => Ok(false),
        }
    })
    .await?;

    // Settled — one more read to learn what the order produced.
    let order = orders.get(order_id).await?;
    let product = order
        .product
        .ok_or_else(|| ReconcileError::NotFound(format!("product of order {order_id}")))?;

    tracing::debug!(order_id, product = product.id, "order processed");
    Ok(product.id)
}
