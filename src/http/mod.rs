//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign / propagate request ID)
//!     → quote.rs (fetch → save → JSON)  |  status.rs (health + breaker state)
//!     → Send to client
//! ```

pub mod quote;
pub mod request;
pub mod server;
pub mod status;

pub use quote::QuoteResponse;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
