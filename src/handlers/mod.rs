//! HTTP handlers: one module per endpoint family.

pub mod forecast;
pub mod health;
pub mod optimize;
pub mod stockout;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
