//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose the operations the HTTP layer and
//! the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Short link creation
//! - [`services::resolver::Resolver`] - Short code resolution and visit counting

pub mod services;
