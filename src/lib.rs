pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
