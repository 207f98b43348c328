//! In-process `OrderStore` with the same observable behaviour as `PgStore`:
//! find-or-create customers, all-or-nothing commits, cascading deletes and the
//! inner-join shape of the pending queue.

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error};

use crate::services::db_models::{Catalog, CrustType, PendingOrder, SauceType, Topping};
use crate::services::messages::{CommittedOrder, CustomerDetails, PizzaOrder};
use crate::services::store::OrderStore;
use crate::types::{CatalogRef, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    catalog: Catalog,
    customers: Vec<(i32, CustomerDetails)>,
    orders: Vec<(i32, i32, NaiveDateTime)>,
    pizzas: Vec<(i32, i32, i32, i32)>,
    pizza_toppings: Vec<(i32, i32)>,
    queue: Vec<(i32, NaiveDateTime)>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore(Mutex<Tables>);

impl MemoryStore {
    pub fn with_catalog(catalog: Catalog) -> Self {
        MemoryStore(Mutex::new(Tables {
            catalog,
            ..Tables::default()
        }))
    }

    /// Crusts: 1 Classique, 2 Mince. Sauces: 1 Tomate, 2 Alfredo.
    /// Toppings: 1 Aucune (sentinel), 2 Olives, 3 Champignons, 4 Anchois, 5 Bacon.
    pub fn seeded() -> Self {
        let topping = |id: i32, name: &str| Topping { id, name: name.into() };

        Self::with_catalog(Catalog {
            crusts: vec![
                CrustType { id: 1, name: "Classique".into() },
                CrustType { id: 2, name: "Mince".into() },
            ],
            sauces: vec![
                SauceType { id: 1, name: "Tomate".into() },
                SauceType { id: 2, name: "Alfredo".into() },
            ],
            toppings: vec![
                topping(1, "Aucune"),
                topping(2, "Olives"),
                topping(3, "Champignons"),
                topping(4, "Anchois"),
                topping(5, "Bacon"),
            ],
        })
    }

    pub fn customer_count(&self) -> usize {
        self.tables().customers.len()
    }

    pub fn order_customer(&self, order_id: i32) -> Option<i32> {
        self.tables()
            .orders
            .iter()
            .find(|(id, _, _)| *id == order_id)
            .map(|(_, customer_id, _)| *customer_id)
    }

    pub fn toppings_of_order(&self, order_id: i32) -> Vec<i32> {
        let tables = self.tables();
        let pizza_ids: Vec<i32> = tables
            .pizzas
            .iter()
            .filter(|(_, order, _, _)| *order == order_id)
            .map(|(pizza_id, _, _, _)| *pizza_id)
            .collect();

        tables
            .pizza_toppings
            .iter()
            .filter(|(pizza_id, _)| pizza_ids.contains(pizza_id))
            .map(|(_, topping_id)| *topping_id)
            .collect()
    }

    pub fn row_count(&self) -> usize {
        let tables = self.tables();
        tables.orders.len() + tables.pizzas.len() + tables.pizza_toppings.len() + tables.queue.len()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // a failed assertion on another thread may have poisoned the lock
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn db_error(kind: DatabaseErrorKind, constraint: &str) -> StoreError {
    StoreError::Database(Error::DatabaseError(
        kind,
        Box::new(format!("violates constraint \"{constraint}\"")),
    ))
}

fn resolve<'a, I>(rows: I, reference: &CatalogRef) -> Option<i32>
where
    I: Iterator<Item = (i32, &'a str)>,
{
    let mut rows = rows;
    match reference {
        CatalogRef::Id(wanted) => rows.find(|(id, _)| id == wanted).map(|(id, _)| id),
        CatalogRef::Name(wanted) => rows
            .find(|(_, name)| *name == wanted.as_str())
            .map(|(id, _)| id),
    }
}

impl OrderStore for MemoryStore {
    fn catalog(&self) -> StoreResult<Catalog> {
        Ok(self.tables().catalog.clone())
    }

    fn crust_name(&self, crust_id: i32) -> StoreResult<Option<String>> {
        Ok(self
            .tables()
            .catalog
            .crusts
            .iter()
            .find(|c| c.id == crust_id)
            .map(|c| c.name.clone()))
    }

    fn sauce_name(&self, sauce_id: i32) -> StoreResult<Option<String>> {
        Ok(self
            .tables()
            .catalog
            .sauces
            .iter()
            .find(|s| s.id == sauce_id)
            .map(|s| s.name.clone()))
    }

    fn topping_name(&self, topping_id: i32) -> StoreResult<Option<String>> {
        Ok(self
            .tables()
            .catalog
            .toppings
            .iter()
            .find(|t| t.id == topping_id)
            .map(|t| t.name.clone()))
    }

    fn commit_order(&self, order: &PizzaOrder) -> StoreResult<CommittedOrder> {
        let mut tables = self.tables();

        // every check happens before the first write, so a failure leaves nothing behind
        let crust_id = resolve(
            tables.catalog.crusts.iter().map(|c| (c.id, c.name.as_str())),
            &order.crust,
        )
        .ok_or_else(|| StoreError::UnknownCrust(order.crust.clone()))?;
        let sauce_id = resolve(
            tables.catalog.sauces.iter().map(|s| (s.id, s.name.as_str())),
            &order.sauce,
        )
        .ok_or_else(|| StoreError::UnknownSauce(order.sauce.clone()))?;

        for (i, topping_id) in order.topping_ids.iter().enumerate() {
            if !tables.catalog.toppings.iter().any(|t| t.id == *topping_id) {
                return Err(db_error(
                    DatabaseErrorKind::ForeignKeyViolation,
                    "pizzas_garnitures_garniture_id_fkey",
                ));
            }
            // (pizza_id, garniture_id) is the link's primary key
            if order.topping_ids[..i].contains(topping_id) {
                return Err(db_error(
                    DatabaseErrorKind::UniqueViolation,
                    "pizzas_garnitures_pkey",
                ));
            }
        }

        let now = Utc::now().naive_utc();
        let existing = tables
            .customers
            .iter()
            .find(|(_, customer)| *customer == order.customer)
            .map(|(id, _)| *id);
        let customer_id = match existing {
            Some(id) => id,
            None => {
                let id = tables.next_id();
                tables.customers.push((id, order.customer.clone()));
                id
            }
        };

        let order_id = tables.next_id();
        tables.orders.push((order_id, customer_id, now));

        let pizza_id = tables.next_id();
        tables.pizzas.push((pizza_id, order_id, crust_id, sauce_id));

        for topping_id in &order.topping_ids {
            tables.pizza_toppings.push((pizza_id, *topping_id));
        }

        tables.queue.push((order_id, now));

        Ok(CommittedOrder {
            order_id,
            customer_id,
            pizza_id,
        })
    }

    fn pending_orders(&self) -> StoreResult<Vec<PendingOrder>> {
        let tables = self.tables();
        let mut pending = Vec::new();

        for (order_id, queued_at) in &tables.queue {
            let Some((_, customer_id, ordered_at)) =
                tables.orders.iter().find(|(id, _, _)| id == order_id)
            else {
                continue;
            };
            let Some((_, customer)) = tables.customers.iter().find(|(id, _)| id == customer_id)
            else {
                continue;
            };

            for (pizza_id, _, crust_id, sauce_id) in
                tables.pizzas.iter().filter(|(_, order, _, _)| order == order_id)
            {
                let crust = tables.catalog.crusts.iter().find(|c| c.id == *crust_id);
                let sauce = tables.catalog.sauces.iter().find(|s| s.id == *sauce_id);
                let mut toppings: Vec<&str> = tables
                    .pizza_toppings
                    .iter()
                    .filter(|(pizza, _)| pizza == pizza_id)
                    .filter_map(|(_, topping_id)| {
                        tables.catalog.toppings.iter().find(|t| t.id == *topping_id)
                    })
                    .map(|t| t.name.as_str())
                    .collect();

                let (Some(crust), Some(sauce)) = (crust, sauce) else {
                    continue;
                };
                if toppings.is_empty() {
                    continue;
                }
                toppings.sort_unstable();

                pending.push(PendingOrder {
                    order_id: *order_id,
                    customer_name: customer.name.clone(),
                    customer_phone: customer.phone.clone(),
                    customer_address: customer.address.clone(),
                    ordered_at: *ordered_at,
                    crust: crust.name.clone(),
                    sauce: sauce.name.clone(),
                    toppings: toppings.join(","),
                    queued_at: *queued_at,
                });
            }
        }

        pending.sort_by_key(|p| (p.queued_at, p.order_id));
        Ok(pending)
    }

    fn delete_order(&self, order_id: i32) -> StoreResult<usize> {
        let mut tables = self.tables();
        let before = tables.orders.len();
        tables.orders.retain(|(id, _, _)| *id != order_id);
        let deleted = before - tables.orders.len();

        let pizza_ids: Vec<i32> = tables
            .pizzas
            .iter()
            .filter(|(_, order, _, _)| *order == order_id)
            .map(|(pizza_id, _, _, _)| *pizza_id)
            .collect();
        tables.pizzas.retain(|(_, order, _, _)| *order != order_id);
        tables
            .pizza_toppings
            .retain(|(pizza_id, _)| !pizza_ids.contains(pizza_id));
        tables.queue.retain(|(id, _)| *id != order_id);

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(topping_ids: Vec<i32>) -> PizzaOrder {
        PizzaOrder {
            customer: CustomerDetails {
                name: "A".into(),
                phone: "555".into(),
                address: "X".into(),
            },
            crust: CatalogRef::Id(1),
            sauce: CatalogRef::Id(1),
            topping_ids,
        }
    }

    #[test]
    fn repeated_topping_link_is_rejected_like_the_primary_key() {
        let store = MemoryStore::seeded();

        let res = store.commit_order(&order(vec![2, 2]));

        assert!(matches!(
            res,
            Err(StoreError::Database(Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _
            )))
        ));
        assert_eq!(store.customer_count(), 0);
        assert_eq!(store.row_count(), 0);
    }

    #[test]
    fn unknown_topping_is_rejected_like_the_foreign_key() {
        let store = MemoryStore::seeded();

        let res = store.commit_order(&order(vec![2, 77]));

        assert!(matches!(
            res,
            Err(StoreError::Database(Error::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                _
            )))
        ));
        assert_eq!(store.row_count(), 0);
    }
}
