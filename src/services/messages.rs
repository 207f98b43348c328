use actix::Message;
use serde::Serialize;

use crate::services::db_models::{Catalog, PendingOrder, Topping};
use crate::types::{CatalogRef, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A fully resolved order ready to be written.
#[derive(Debug, Clone)]
pub struct PizzaOrder {
    pub customer: CustomerDetails,
    pub crust: CatalogRef,
    pub sauce: CatalogRef,
    pub topping_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedOrder {
    pub order_id: i32,
    pub customer_id: i32,
    pub pizza_id: i32,
}

/// What the confirmation page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub customer: CustomerDetails,
    pub crust_id: i32,
    pub crust: String,
    pub sauce_id: i32,
    pub sauce: String,
    /// Resolved toppings in the order they were selected.
    pub toppings: Vec<Topping>,
}

#[derive(Message, Debug)]
#[rtype(result = "StoreResult<Catalog>")]
pub struct FetchCatalog;

#[derive(Message, Debug)]
#[rtype(result = "StoreResult<OrderSummary>")]
pub struct SummarizeOrder {
    pub customer: CustomerDetails,
    pub crust_id: i32,
    pub sauce_id: i32,
    pub topping_ids: Vec<i32>,
}

#[derive(Message, Debug)]
#[rtype(result = "StoreResult<CommittedOrder>")]
pub struct CommitOrder(pub PizzaOrder);

#[derive(Message, Debug)]
#[rtype(result = "StoreResult<Vec<PendingOrder>>")]
pub struct FetchPendingOrders;

#[derive(Message, Debug)]
#[rtype(result = "StoreResult<usize>")]
pub struct DeleteOrder(pub i32);
