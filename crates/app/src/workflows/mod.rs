//! User-facing operations composed from forms, the resolver, the caches
//! and the backend.
//!
//! Every write goes through [`AppContext::mutate`](crate::context::AppContext::mutate):
//! invalid input is rejected before any request, the cache is patched
//! optimistically, and failures roll back and raise an alert.

pub mod member;
pub mod offboarding;
pub mod product;
pub mod reassign;
pub mod shipment;
pub mod team;

use stockroom_core::store::Entity;
use stockroom_core::CoreError;

use crate::error::AppResult;

/// Find `id` in a freshly read list.
pub(crate) fn find_in<T: Entity>(items: Vec<T>, id: &str) -> AppResult<T> {
    items
        .into_iter()
        .find(|item| item.entity_id() == id)
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: T::KIND,
                id: id.to_string(),
            }
            .into()
        })
}
