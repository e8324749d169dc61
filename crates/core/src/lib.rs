//! `stockroom-core`: the inventory domain without I/O.
//!
//! Entities and their wire formats, derived values (product status,
//! shipping eligibility, relocations), form state machines, table
//! filtering and the optimistic command store used by the app crate.

pub mod billing;
pub mod category;
pub mod error;
pub mod forms;
pub mod location;
pub mod member;
pub mod office;
pub mod product;
pub mod profile;
pub mod relocation;
pub mod serde_helpers;
pub mod shipment;
pub mod status;
pub mod store;
pub mod table;
pub mod team;
pub mod types;
pub mod view;

pub use error::CoreError;
