//! HTTP surface: five read-only JSON endpoints under `/api`.
//!
//! Every endpoint answers 200 with a JSON array. Upstream trouble shows up as
//! an empty array, never as an error status.

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
