//! Middleware applied around the HTTP handlers.

pub mod request_id;
