//! Inventory backend REST client.
//!
//! Provides the typed HTTP wrapper over `/api/...`, error classification,
//! the throttling retry policy and the [`InventoryBackend`] trait the app
//! layer is written against.

pub mod api;
pub mod backend;
pub mod error;
pub mod retry;

pub use api::InventoryApi;
pub use backend::InventoryBackend;
pub use error::ApiError;
pub use retry::RetryPolicy;
