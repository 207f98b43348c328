use diesel::Insertable;
use serde::Serialize;

use crate::schema::clients;
use crate::schema::pizzas;
use crate::schema::pizzas_garnitures;

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = clients)]
pub struct NewCustomer<'a> {
    pub nom: &'a str,
    pub telephone: &'a str,
    pub adresse: &'a str,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = pizzas)]
pub struct NewPizza {
    pub commande_id: i32,
    pub croute_id: i32,
    pub sauce_id: i32,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = pizzas_garnitures)]
pub struct PizzaTopping {
    pub pizza_id: i32,
    pub garniture_id: i32,
}
