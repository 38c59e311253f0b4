//! Core domain entities.
//!
//! Entities are plain data structures. Creation input lives in a separate struct:
//!
//! - [`Link`] - A stored short link
//! - [`NewLink`] - Data needed to create a link

pub mod link;

pub use link::{Link, NewLink};
