pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod router;
pub mod state;
pub mod templates;
pub mod viewer3d;
