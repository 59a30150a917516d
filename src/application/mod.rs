// Application layer - Use cases over the domain
pub mod catalog_service;
pub mod dashboard_service;
pub mod error;
pub mod series_provider;
pub mod streaming_service;
