pub mod backend_client;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod session;
