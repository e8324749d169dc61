//! Application layer: one [`AppContext`](context::AppContext) per mounted
//! view, holding the caches, view state, notifications and pending
//! confirmations, plus the workflows that drive them.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod mutation;
pub mod notifications;
pub mod pending;
pub mod telemetry;
pub mod workflows;

pub use context::AppContext;
pub use error::{AppError, AppResult};
