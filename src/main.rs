use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::info;
use sqlx::postgres::PgPoolOptions;

use task_api::repository::PgTaskRepository;
use task_api::routes;
use task_api::service::TaskService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create pool");

    let repo = Arc::new(PgTaskRepository::new(pool));
    let service = web::Data::new(TaskService::new(repo));

    let port = env::var("PORT").unwrap_or_else(|_| "8080".into());
    let server_address = format!("0.0.0.0:{}", port);
    info!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .route("/health", web::get().to(|| async { HttpResponse::Ok().body("OK") }))
            .configure(routes::routes::task_configure)
    })
    .bind(server_address)?
    .run()
    .await
}
