//! # Middleware crate
//!
//! Ready-made middlewares for the handler chain: request logging and a sender allowlist.

mod middleware;

#[cfg(test)]
mod test;

pub use middleware::{AuthMiddleware, LoggingMiddleware};
