use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use super::task_models::ErrorResponse;
use crate::models::task::{CreateTaskRequest, UpdateTaskRequest};
use crate::service::{TaskService, TaskServiceError};

/// Maps service failures onto the transport contract: validation faults are
/// the caller's (400), missing records are 404, everything else is a server
/// fault (500) whose chained cause goes to the log, not the client.
fn error_response(err: TaskServiceError) -> HttpResponse {
    match err {
        TaskServiceError::Validation(msg) => HttpResponse::BadRequest().json(ErrorResponse {
            error: msg.to_string(),
        }),
        TaskServiceError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: err.to_string(),
        }),
        TaskServiceError::Repository { .. } => {
            error!("{}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal server error".into(),
            })
        }
    }
}

/// Parses the `{id}` path segment. Non-numeric ids are a caller fault, same
/// as the service's own id validation.
fn parse_id(raw: &str) -> Result<i32, HttpResponse> {
    raw.parse().map_err(|_| {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid task ID format".into(),
        })
    })
}

pub async fn create_task(
    service: web::Data<TaskService>,
    req: web::Json<CreateTaskRequest>,
) -> impl Responder {
    info!("Received request to create task: {}", req.title);
    match service.create_task(&req).await {
        Ok(task) => HttpResponse::Created().json(task),
        Err(e) => error_response(e),
    }
}

pub async fn get_all_tasks(service: web::Data<TaskService>) -> impl Responder {
    match service.get_all_tasks().await {
        Ok(tasks) => HttpResponse::Ok().json(tasks),
        Err(e) => error_response(e),
    }
}

pub async fn get_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match service.get_task(id).await {
        Ok(task) => HttpResponse::Ok().json(task),
        Err(e) => error_response(e),
    }
}

pub async fn update_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
    req: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    info!("Received request to update task {}", id);
    match service.update_task(id, &req).await {
        Ok(task) => HttpResponse::Ok().json(task),
        Err(e) => error_response(e),
    }
}

pub async fn delete_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    info!("Received request to delete task {}", id);
    match service.delete_task(id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}
