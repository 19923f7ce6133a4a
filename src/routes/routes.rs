use actix_web::web;

use super::tasks::task_handlers;

pub fn task_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tasks")
            .route("", web::post().to(task_handlers::create_task))
            .route("", web::get().to(task_handlers::get_all_tasks))
            .route("/{id}", web::get().to(task_handlers::get_task))
            .route("/{id}", web::put().to(task_handlers::update_task))
            .route("/{id}", web::delete().to(task_handlers::delete_task)),
    );
}
