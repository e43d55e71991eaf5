//! Request bodies and query strings accepted by the HTTP handlers

pub mod requests;

pub use requests::*;
