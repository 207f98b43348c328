use crate::services::db_models::{Catalog, PendingOrder};
use crate::services::messages::{CommittedOrder, PizzaOrder};
use crate::types::StoreResult;

/// Data access used by the order workflow.
///
/// Implementations own their connection lifecycle; callers never see a
/// connection. `commit_order` must be atomic: either every row of the order
/// is written or none is.
pub trait OrderStore: Send + Sync {
    fn catalog(&self) -> StoreResult<Catalog>;

    fn crust_name(&self, crust_id: i32) -> StoreResult<Option<String>>;

    fn sauce_name(&self, sauce_id: i32) -> StoreResult<Option<String>>;

    fn topping_name(&self, topping_id: i32) -> StoreResult<Option<String>>;

    /// Resolves crust and sauce, finds or creates the customer, then writes the
    /// order, its pizza, the topping links and the pending marker.
    /// `order.topping_ids` is written as given.
    fn commit_order(&self, order: &PizzaOrder) -> StoreResult<CommittedOrder>;

    /// Orders in the queue that have at least one topping.
    fn pending_orders(&self) -> StoreResult<Vec<PendingOrder>>;

    /// Returns the number of orders removed (0 or 1).
    fn delete_order(&self, order_id: i32) -> StoreResult<usize>;
}
