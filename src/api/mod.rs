pub mod handler;
pub mod models;
pub mod response;
pub mod routes;
pub mod validate;
