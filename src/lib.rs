// Catalog caching + normalization core. Page components, routing, and the
// analytics dashboard are external collaborators that call into
// `CatalogService`; nothing above it is aware of caching.

pub mod cache;
pub mod config;
pub mod mapper;
pub mod models;
pub mod origin;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::CatalogService;
