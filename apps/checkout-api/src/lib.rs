//! # checkout-api library
//!
//! The HTTP surface of the Bazaar pricing engine, exposed as a library so
//! integration tests can build the router without binding a socket.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorCode};
pub use state::AppState;
