//! In-process HTTP tests: the real handler/service stack over the in-memory
//! repository, so no database is needed.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use serde_json::json;

use task_api::models::task::Task;
use task_api::repository::InMemoryTaskRepository;
use task_api::routes;
use task_api::service::TaskService;

fn task_service() -> web::Data<TaskService> {
    web::Data::new(TaskService::new(Arc::new(InMemoryTaskRepository::new())))
}

macro_rules! test_app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data($service.clone())
                .route(
                    "/health",
                    web::get().to(|| async { HttpResponse::Ok().body("OK") }),
                )
                .configure(routes::routes::task_configure),
        )
        .await
    };
}

#[actix_web::test]
async fn health_check_returns_ok() {
    let app = test_app!(task_service());

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn full_task_lifecycle() {
    let app = test_app!(task_service());

    // Create
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({
            "title": "E2E Test Task",
            "description": "A task created during end-to-end testing."
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = test::read_body_json(resp).await;
    assert!(created.id > 0);
    assert_eq!(created.title, "E2E Test Task");
    assert_eq!(created.status.as_str(), "pending");
    assert_eq!(created.created_at, created.updated_at);

    // Get by id
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Task = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    // List
    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = test::read_body_json(resp).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, created.id);

    // Partial update: only the status moves, updated_at advances.
    tokio::time::sleep(Duration::from_millis(5)).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .set_json(json!({"status": "in_progress"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.status.as_str(), "in_progress");
    assert!(updated.updated_at > created.updated_at);

    // Delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone now
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Deleting again reports not found rather than silently succeeding.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_without_title_returns_400() {
    let app = test_app!(task_service());

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({"description": "no title here"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "title is required");
}

#[actix_web::test]
async fn create_with_malformed_body_returns_400() {
    let app = test_app!(task_service());

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn get_with_malformed_id_returns_400() {
    let app = test_app!(task_service());

    let req = test::TestRequest::get().uri("/api/tasks/abc").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid task ID format");
}

#[actix_web::test]
async fn get_missing_task_returns_404() {
    let app = test_app!(task_service());

    let req = test::TestRequest::get().uri("/api/tasks/99").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "task with ID 99 not found");
}

#[actix_web::test]
async fn get_all_on_empty_store_returns_empty_array() {
    let app = test_app!(task_service());

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let tasks: Vec<Task> = test::read_body_json(resp).await;
    assert!(tasks.is_empty());
}

#[actix_web::test]
async fn update_with_bogus_status_returns_400_and_leaves_record_unchanged() {
    let app = test_app!(task_service());

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({"title": "My New Task", "description": "This is a test task."}))
        .to_request();
    let created: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .set_json(json!({"status": "bogus"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid status value");

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let stored: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored, created);
}

#[actix_web::test]
async fn update_missing_task_returns_404() {
    let app = test_app!(task_service());

    let req = test::TestRequest::put()
        .uri("/api/tasks/99")
        .set_json(json!({"title": "New Title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_orders_newest_first() {
    let app = test_app!(task_service());

    for title in ["Task 1", "Task 2", "Task 3"] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({"title": title}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Task 3", "Task 2", "Task 1"]);
}
