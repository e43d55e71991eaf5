pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod master;
pub mod middleware;
pub mod report;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
pub mod testing;
