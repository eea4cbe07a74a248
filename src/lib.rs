pub mod config;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod money;
pub mod pricing;
pub mod state;
