// src/lib.rs

pub mod auth;
pub mod config;
pub mod constants;
pub mod context;
pub mod database;
pub mod editor;
pub mod models;
pub mod render;
pub mod repository;
pub mod routes;
pub mod store;
pub mod views;
pub mod watch;

pub use context::AppContext;
