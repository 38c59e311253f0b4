//! Business logic services for the application layer.

pub mod resolver;
pub mod shortener_service;

pub use resolver::Resolver;
pub use shortener_service::{ShortenerService, ShortenerSettings};
