//! HTTP surface: DTOs, the response envelope, shared state, handlers, and
//! route assembly.

pub mod dto;
pub mod envelope;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
