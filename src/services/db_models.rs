use chrono::NaiveDateTime;
use diesel::sql_types::{Int4, Text, Timestamp};
use diesel::{Queryable, QueryableByName};
use serde::{Serialize, Serializer};

fn minutes<S: Serializer>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&at.format("%Y-%m-%d %H:%M"))
}

#[derive(Queryable, Debug, Clone, PartialEq, Serialize)]
pub struct CrustType {
    pub id: i32,
    pub name: String,
}

#[derive(Queryable, Debug, Clone, PartialEq, Serialize)]
pub struct SauceType {
    pub id: i32,
    pub name: String,
}

#[derive(Queryable, Debug, Clone, PartialEq, Serialize)]
pub struct Topping {
    pub id: i32,
    pub name: String,
}

/// Option sets offered by the order form.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Catalog {
    pub crusts: Vec<CrustType>,
    pub sauces: Vec<SauceType>,
    pub toppings: Vec<Topping>,
}

/// One line of the staff queue: a pending order joined with its customer,
/// pizza and toppings. `toppings` is comma separated, alphabetical.
#[derive(QueryableByName, Debug, Clone, PartialEq, Serialize)]
pub struct PendingOrder {
    #[diesel(sql_type = Int4, column_name = commande_id)]
    pub order_id: i32,
    #[diesel(sql_type = Text, column_name = client_nom)]
    pub customer_name: String,
    #[diesel(sql_type = Text, column_name = client_telephone)]
    pub customer_phone: String,
    #[diesel(sql_type = Text, column_name = client_adresse)]
    pub customer_address: String,
    #[diesel(sql_type = Timestamp, column_name = date_commande)]
    #[serde(serialize_with = "minutes")]
    pub ordered_at: NaiveDateTime,
    #[diesel(sql_type = Text, column_name = croute_nom)]
    pub crust: String,
    #[diesel(sql_type = Text, column_name = sauce_nom)]
    pub sauce: String,
    #[diesel(sql_type = Text, column_name = garnitures)]
    pub toppings: String,
    #[diesel(sql_type = Timestamp, column_name = date_ajout_attente)]
    #[serde(serialize_with = "minutes")]
    pub queued_at: NaiveDateTime,
}
