//! Form state machines behind the product, bulk-create, member and
//! offboarding wizards.
//!
//! Forms hold plain state plus the operations a view calls when a field
//! changes. `validate`/`submit` either yield a request body or a set of
//! [`FieldErrors`]; nothing here talks to the network.

pub mod bulk;
pub mod errors;
pub mod member;
pub mod offboarding;
pub mod product;

pub use errors::FieldErrors;
