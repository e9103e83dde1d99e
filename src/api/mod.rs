//! API Module
//!
//! HTTP handlers and routing for the tutor gateway. The gateway speaks the
//! same `/api/...` contract as the tutor backend and answers through the
//! shared, cache-aware `ApiClient`.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
