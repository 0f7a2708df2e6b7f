pub mod packing;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod trips;

// Re-export the router builder to make it easily accessible
// to the binary and the integration tests.
pub use rest::{router, ApiDoc};
pub use state::AppState;
