use std::sync::Arc;

use actix::{Actor, Addr, SyncArbiter, SyncContext};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use tera::Tera;

use crate::services::store::OrderStore;
use crate::types::PoolInitializationError;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Synchronous actor owning the store. Runs on a `SyncArbiter`, so blocking
/// database calls stay off the HTTP workers.
pub struct DbActor(pub Arc<dyn OrderStore>);

pub struct AppState {
    pub db: Addr<DbActor>,
    pub templates: Tera,
}

impl Actor for DbActor {
    type Context = SyncContext<Self>;
}

pub fn start_db_actor(store: Arc<dyn OrderStore>, workers: usize) -> Addr<DbActor> {
    SyncArbiter::start(workers, move || DbActor(store.clone()))
}

pub fn get_db_pool(db_url: &str, max_size: u32) -> Result<PgPool, PoolInitializationError> {
    let manager: ConnectionManager<PgConnection> = ConnectionManager::<PgConnection>::new(db_url);
    match Pool::builder().max_size(max_size).build(manager) {
        Ok(val) => Ok(val),
        Err(err) => Err(PoolInitializationError(err.to_string())),
    }
}
