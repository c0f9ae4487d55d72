pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod render;
pub mod schema;
pub mod score;
