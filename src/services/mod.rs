use actix_web::web::{self, Data};
use actix_web::{get, HttpResponse, Responder};
use tera::{Context, Tera};

use crate::services::db_utils::AppState;
use crate::types::AppError;

pub mod db_handling;
pub mod db_models;
pub mod db_utils;
pub mod forms;
pub mod insertable;
#[cfg(test)]
pub mod memory_store;
pub mod messages;
pub mod pg_handling;
pub mod store;

pub fn load_templates(dir: &str) -> Result<Tera, tera::Error> {
    Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Result<HttpResponse, AppError> {
    let page = state.templates.render(template, ctx)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home_page)
        .service(healthcheck)
        .service(order_route::order_form)
        .service(order_route::order_summary)
        .service(order_route::validate_order)
        .service(queue_route::pending_orders)
        .service(queue_route::delete_order);
}

#[get("/")]
pub async fn home_page(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    render(&state, "index.html", &Context::new())
}

#[get("/healthcheck")]
pub async fn healthcheck() -> impl Responder {
    HttpResponse::Ok().body("I'm alive!")
}

// order taking: form, summary, confirmation
pub mod order_route {
    use actix_web::web::{Bytes, Data, Form};
    use actix_web::{get, post, HttpResponse};
    use tera::Context;
    use tracing::info;

    use super::{queue_route, render};
    use crate::services::db_utils::AppState;
    use crate::services::forms::{parse_confirmation, OrderForm};
    use crate::services::messages::{CommitOrder, FetchCatalog, SummarizeOrder};
    use crate::types::{AppError, MAX_TOPPINGS};

    #[get("/commande")]
    pub async fn order_form(state: Data<AppState>) -> Result<HttpResponse, AppError> {
        let catalog = state.db.send(FetchCatalog).await??;

        let mut ctx = Context::new();
        ctx.insert("catalog", &catalog);
        ctx.insert("topping_slots", &(1..=MAX_TOPPINGS).collect::<Vec<_>>());

        render(&state, "commande.html", &ctx)
    }

    #[post("/commandeResume")]
    pub async fn order_summary(
        state: Data<AppState>,
        form: Form<OrderForm>,
    ) -> Result<HttpResponse, AppError> {
        let msg = SummarizeOrder::try_from(form.into_inner())?;
        let summary = state.db.send(msg).await??;

        let mut ctx = Context::new();
        ctx.insert("order", &summary);

        render(&state, "resume.html", &ctx)
    }

    #[post("/validation")]
    pub async fn validate_order(state: Data<AppState>, body: Bytes) -> Result<HttpResponse, AppError> {
        let order = parse_confirmation(&body)?;
        let committed = state.db.send(CommitOrder(order)).await??;
        info!(
            order_id = committed.order_id,
            customer_id = committed.customer_id,
            pizza_id = committed.pizza_id,
            "order placed"
        );

        queue_route::render_queue(&state).await
    }
}

// staff queue
pub mod queue_route {
    use actix_web::web::{Data, Path};
    use actix_web::{get, post, HttpResponse};
    use tera::Context;
    use tracing::info;

    use super::render;
    use crate::services::db_utils::AppState;
    use crate::services::messages::{DeleteOrder, FetchPendingOrders};
    use crate::types::AppError;

    pub(super) async fn render_queue(state: &AppState) -> Result<HttpResponse, AppError> {
        let orders = state.db.send(FetchPendingOrders).await??;

        let mut ctx = Context::new();
        ctx.insert("orders", &orders);

        render(state, "commandes_attente.html", &ctx)
    }

    #[get("/commandes_attente")]
    pub async fn pending_orders(state: Data<AppState>) -> Result<HttpResponse, AppError> {
        render_queue(&state).await
    }

    #[post("/supprimer_commande/{order_id}")]
    pub async fn delete_order(state: Data<AppState>, path: Path<i32>) -> Result<HttpResponse, AppError> {
        let order_id = path.into_inner();

        if state.db.send(DeleteOrder(order_id)).await?? > 0 {
            info!(order_id, "order removed from queue");
        }

        render_queue(&state).await
    }
}
