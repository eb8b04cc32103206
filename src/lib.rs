pub mod auth;
pub mod batch;
pub mod config;
pub mod cors;
pub mod error;
pub mod export;
pub mod graphql;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;
