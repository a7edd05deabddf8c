// eFolder Bridge - files local documents into Encompass loan eFolders

pub mod cli;
pub mod config;
pub mod efolder;
pub mod encompass;
pub mod models;
pub mod routes;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::{EncompassConfig, ServerConfig};
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
