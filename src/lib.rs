pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod eav;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
