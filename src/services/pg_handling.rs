use diesel::dsl::now;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::{ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};
use tracing::{debug, info};

use crate::services::db_models::{Catalog, CrustType, PendingOrder, SauceType, Topping};
use crate::services::db_utils::PgPool;
use crate::services::insertable::{NewCustomer, NewPizza, PizzaTopping};
use crate::services::messages::{CommittedOrder, CustomerDetails, PizzaOrder};
use crate::services::store::OrderStore;
use crate::types::{CatalogRef, StoreError, StoreResult};

const PENDING_ORDERS_QUERY: &str = r#"
SELECT
    c.nom AS client_nom,
    c.telephone AS client_telephone,
    c.adresse AS client_adresse,
    co.commande_id,
    co.date_commande,
    tc.nom AS croute_nom,
    ts.nom AS sauce_nom,
    string_agg(g.nom, ',' ORDER BY g.nom ASC) AS garnitures,
    ca.date_ajout AS date_ajout_attente
FROM commandes_attente ca
JOIN commandes co ON ca.commande_id = co.commande_id
JOIN clients c ON co.client_id = c.client_id
JOIN pizzas p ON co.commande_id = p.commande_id
JOIN types_croute tc ON p.croute_id = tc.croute_id
JOIN types_sauce ts ON p.sauce_id = ts.sauce_id
JOIN pizzas_garnitures pg ON p.pizza_id = pg.pizza_id
JOIN garnitures g ON pg.garniture_id = g.garniture_id
GROUP BY
    co.commande_id, c.nom, c.telephone, c.adresse, co.date_commande, tc.nom, ts.nom, ca.date_ajout
ORDER BY ca.date_ajout, co.commande_id
"#;

/// `OrderStore` backed by PostgreSQL through an r2d2 pool.
pub struct PgStore(pub PgPool);

impl PgStore {
    fn establish_connection(
        &self,
    ) -> StoreResult<PooledConnection<ConnectionManager<PgConnection>>> {
        self.0
            .get()
            .map_err(|err| StoreError::Connection(err.to_string()))
    }
}

fn resolve_crust(conn: &mut PgConnection, crust: &CatalogRef) -> StoreResult<i32> {
    use crate::schema::types_croute::{croute_id, dsl::types_croute, nom};

    let found = match crust {
        CatalogRef::Id(id) => types_croute
            .find(*id)
            .select(croute_id)
            .first::<i32>(conn)
            .optional()?,
        CatalogRef::Name(name) => types_croute
            .filter(nom.eq(name))
            .order(croute_id)
            .select(croute_id)
            .first::<i32>(conn)
            .optional()?,
    };

    found.ok_or_else(|| StoreError::UnknownCrust(crust.clone()))
}

fn resolve_sauce(conn: &mut PgConnection, sauce: &CatalogRef) -> StoreResult<i32> {
    use crate::schema::types_sauce::{dsl::types_sauce, nom, sauce_id};

    let found = match sauce {
        CatalogRef::Id(id) => types_sauce
            .find(*id)
            .select(sauce_id)
            .first::<i32>(conn)
            .optional()?,
        CatalogRef::Name(name) => types_sauce
            .filter(nom.eq(name))
            .order(sauce_id)
            .select(sauce_id)
            .first::<i32>(conn)
            .optional()?,
    };

    found.ok_or_else(|| StoreError::UnknownSauce(sauce.clone()))
}

fn find_or_create_customer(conn: &mut PgConnection, customer: &CustomerDetails) -> StoreResult<i32> {
    use crate::schema::clients::{adresse, client_id, dsl::clients, nom, telephone};

    let existing = clients
        .filter(nom.eq(&customer.name))
        .filter(telephone.eq(&customer.phone))
        .filter(adresse.eq(&customer.address))
        .order(client_id)
        .select(client_id)
        .first::<i32>(conn)
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = diesel::insert_into(clients)
        .values(NewCustomer {
            nom: &customer.name,
            telephone: &customer.phone,
            adresse: &customer.address,
        })
        .returning(client_id)
        .get_result::<i32>(conn)?;

    debug!(customer_id = id, "created customer");
    Ok(id)
}

impl OrderStore for PgStore {
    fn catalog(&self) -> StoreResult<Catalog> {
        use crate::schema::garnitures::{dsl::garnitures, garniture_id};
        use crate::schema::types_croute::{croute_id, dsl::types_croute};
        use crate::schema::types_sauce::{dsl::types_sauce, sauce_id};

        let mut conn = self.establish_connection()?;

        Ok(Catalog {
            crusts: types_croute
                .order(croute_id)
                .get_results::<CrustType>(&mut conn)?,
            sauces: types_sauce
                .order(sauce_id)
                .get_results::<SauceType>(&mut conn)?,
            toppings: garnitures
                .order(garniture_id)
                .get_results::<Topping>(&mut conn)?,
        })
    }

    fn crust_name(&self, crust_id: i32) -> StoreResult<Option<String>> {
        use crate::schema::types_croute::{dsl::types_croute, nom};

        let mut conn = self.establish_connection()?;

        Ok(types_croute
            .find(crust_id)
            .select(nom)
            .first::<String>(&mut conn)
            .optional()?)
    }

    fn sauce_name(&self, sauce_id: i32) -> StoreResult<Option<String>> {
        use crate::schema::types_sauce::{dsl::types_sauce, nom};

        let mut conn = self.establish_connection()?;

        Ok(types_sauce
            .find(sauce_id)
            .select(nom)
            .first::<String>(&mut conn)
            .optional()?)
    }

    fn topping_name(&self, topping_id: i32) -> StoreResult<Option<String>> {
        use crate::schema::garnitures::{dsl::garnitures, nom};

        let mut conn = self.establish_connection()?;

        Ok(garnitures
            .find(topping_id)
            .select(nom)
            .first::<String>(&mut conn)
            .optional()?)
    }

    fn commit_order(&self, order: &PizzaOrder) -> StoreResult<CommittedOrder> {
        use crate::schema::commandes::{
            client_id, commande_id, date_commande, dsl::commandes,
        };
        use crate::schema::commandes_attente::{
            commande_id as queued_order_id, date_ajout, dsl::commandes_attente,
        };
        use crate::schema::pizzas::{dsl::pizzas, pizza_id};
        use crate::schema::pizzas_garnitures::dsl::pizzas_garnitures;

        let mut conn = self.establish_connection()?;

        let committed = conn.build_transaction().run::<_, StoreError, _>(|trx_conn| {
            let crust_id = resolve_crust(trx_conn, &order.crust)?;
            let sauce_id = resolve_sauce(trx_conn, &order.sauce)?;
            let customer_id = find_or_create_customer(trx_conn, &order.customer)?;

            let order_id = diesel::insert_into(commandes)
                .values((client_id.eq(customer_id), date_commande.eq(now)))
                .returning(commande_id)
                .get_result::<i32>(trx_conn)?;

            let new_pizza_id = diesel::insert_into(pizzas)
                .values(NewPizza {
                    commande_id: order_id,
                    croute_id: crust_id,
                    sauce_id,
                })
                .returning(pizza_id)
                .get_result::<i32>(trx_conn)?;

            for topping_id in &order.topping_ids {
                diesel::insert_into(pizzas_garnitures)
                    .values(PizzaTopping {
                        pizza_id: new_pizza_id,
                        garniture_id: *topping_id,
                    })
                    .execute(trx_conn)?;
            }

            diesel::insert_into(commandes_attente)
                .values((queued_order_id.eq(order_id), date_ajout.eq(now)))
                .execute(trx_conn)?;

            Ok(CommittedOrder {
                order_id,
                customer_id,
                pizza_id: new_pizza_id,
            })
        })?;

        info!(
            order_id = committed.order_id,
            customer_id = committed.customer_id,
            "order committed"
        );
        Ok(committed)
    }

    fn pending_orders(&self) -> StoreResult<Vec<PendingOrder>> {
        let mut conn = self.establish_connection()?;

        Ok(diesel::sql_query(PENDING_ORDERS_QUERY).load::<PendingOrder>(&mut conn)?)
    }

    fn delete_order(&self, order_id: i32) -> StoreResult<usize> {
        use crate::schema::commandes::dsl::commandes;

        let mut conn = self.establish_connection()?;

        Ok(diesel::delete(commandes.find(order_id)).execute(&mut conn)?)
    }
}
