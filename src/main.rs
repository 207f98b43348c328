use std::io;
use std::sync::Arc;

use actix::Addr;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use services::db_utils::{get_db_pool, start_db_actor, AppState, DbActor};
use services::pg_handling::PgStore;
use settings::Settings;

mod schema;
mod services;
mod settings;
mod types;

fn startup_err(what: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{what}: {err}");
    io::Error::other(format!("{what}: {err}"))
}

fn init_pg_db(settings: &Settings) -> io::Result<Addr<DbActor>> {
    let db_url = settings
        .database_url()
        .map_err(|err| startup_err("Invalid database settings", err))?;
    let pool = get_db_pool(&db_url, settings.db_pool_size)
        .map_err(|err| startup_err("Unable to create connection pool", err))?;

    Ok(start_db_actor(Arc::new(PgStore(pool)), settings.db_workers))
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    setup_tracing();

    let settings = Settings::from_env().map_err(|err| startup_err("Invalid configuration", err))?;
    info!(?settings, "starting pizzeria");

    let db = init_pg_db(&settings)?;
    let templates = services::load_templates(&settings.templates_dir)
        .map_err(|err| startup_err("Unable to load templates", err))?;
    let state = Data::new(AppState { db, templates });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(services::configure)
    })
        .bind(&settings.bind_address)?
        .run()
        .await
}
