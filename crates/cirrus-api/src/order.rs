use serde::{Deserialize, Serialize};

use crate::entity::ResourceRef;

/// Handle returned by a create call the control plane defers.
///
/// Carries only the order id; the caller polls [`Order`] status through
/// `OrderService` until the order settles, then resolves the concrete
/// entity via [`Order::product`]. Consumed by exactly one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub order_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Processing,
    Processed,
    Failed,
}

impl OrderStatus {
    /// An order is settled once the control plane will no longer change it.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Processed | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub status: OrderStatus,
    /// The entity this order provisions. Populated once processed.
    pub product: Option<ResourceRef>,
}
