use std::collections::HashSet;

use actix::Handler;
use tracing::{debug, error};

use crate::services::db_models::{Catalog, PendingOrder, Topping};
use crate::services::db_utils::DbActor;
use crate::services::messages::{
    CommitOrder, CommittedOrder, DeleteOrder, FetchCatalog, FetchPendingOrders, OrderSummary,
    SummarizeOrder,
};
use crate::types::{CatalogRef, StoreError, StoreResult, NO_TOPPING_ID};

impl Handler<FetchCatalog> for DbActor {
    type Result = StoreResult<Catalog>;

    fn handle(&mut self, _msg: FetchCatalog, _ctx: &mut Self::Context) -> Self::Result {
        self.0.catalog()
    }
}

impl Handler<SummarizeOrder> for DbActor {
    type Result = StoreResult<OrderSummary>;

    fn handle(&mut self, msg: SummarizeOrder, _ctx: &mut Self::Context) -> Self::Result {
        let crust = self
            .0
            .crust_name(msg.crust_id)?
            .ok_or(StoreError::UnknownCrust(CatalogRef::Id(msg.crust_id)))?;
        let sauce = self
            .0
            .sauce_name(msg.sauce_id)?
            .ok_or(StoreError::UnknownSauce(CatalogRef::Id(msg.sauce_id)))?;

        let mut toppings = Vec::with_capacity(msg.topping_ids.len());
        for topping_id in msg.topping_ids {
            match self.0.topping_name(topping_id)? {
                Some(name) => toppings.push(Topping {
                    id: topping_id,
                    name,
                }),
                None => debug!(topping_id, "skipping unknown topping"),
            }
        }

        Ok(OrderSummary {
            customer: msg.customer,
            crust_id: msg.crust_id,
            crust,
            sauce_id: msg.sauce_id,
            sauce,
            toppings,
        })
    }
}

impl Handler<CommitOrder> for DbActor {
    type Result = StoreResult<CommittedOrder>;

    fn handle(&mut self, msg: CommitOrder, _ctx: &mut Self::Context) -> Self::Result {
        let mut order = msg.0;
        // the same topping may be picked in several selects; link it once
        let mut seen = HashSet::new();
        order
            .topping_ids
            .retain(|id| *id != NO_TOPPING_ID && seen.insert(*id));

        self.0.commit_order(&order).inspect_err(|err| {
            error!(
                customer = %order.customer.name,
                crust = %order.crust,
                sauce = %order.sauce,
                "order rolled back: {err}"
            )
        })
    }
}

impl Handler<FetchPendingOrders> for DbActor {
    type Result = StoreResult<Vec<PendingOrder>>;

    fn handle(&mut self, _msg: FetchPendingOrders, _ctx: &mut Self::Context) -> Self::Result {
        self.0.pending_orders()
    }
}

impl Handler<DeleteOrder> for DbActor {
    type Result = StoreResult<usize>;

    fn handle(&mut self, msg: DeleteOrder, _ctx: &mut Self::Context) -> Self::Result {
        let deleted = self.0.delete_order(msg.0)?;
        debug!(order_id = msg.0, deleted, "delete order");

        Ok(deleted)
    }
}
