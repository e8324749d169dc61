//! The optimistic mutation lifecycle.
//!
//! 1. apply the commands to the cache, keeping their receipts;
//! 2. run the backend call;
//! 3. on error, roll the receipts back newest first and raise an alert;
//! 4. on success, release the receipts and settle the cache with the
//!    server's answer, then invalidate and refetch the list and every list
//!    derived from it.

use std::future::Future;

use stockroom_client::ApiError;
use stockroom_core::store::{Command, Entity, EntityStore};

use crate::cache::QueryCache;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

impl AppContext {
    /// Run `call` with `commands` applied optimistically to `cache`.
    ///
    /// `settle` runs under the cache lock with the call's result, typically
    /// to swap provisional records for the server's.
    pub async fn mutate<T, R, Fut, S>(
        &self,
        cache: &QueryCache<T>,
        label: &str,
        commands: Vec<Command<T>>,
        call: Fut,
        settle: S,
    ) -> AppResult<R>
    where
        T: Entity,
        Fut: Future<Output = Result<R, ApiError>>,
        S: FnOnce(&mut EntityStore<T>, &R),
    {
        let resource = cache.resource();
        let mut receipts = Vec::with_capacity(commands.len());
        for command in commands {
            match cache.apply(command).await {
                Ok(applied) => receipts.push(applied),
                Err(e) => {
                    for applied in receipts.into_iter().rev() {
                        cache.rollback(applied).await;
                    }
                    return Err(e.into());
                }
            }
        }

        match call.await {
            Ok(result) => {
                cache
                    .with_store(|store| {
                        for applied in &receipts {
                            store.release(applied);
                        }
                        settle(store, &result)
                    })
                    .await;
                tracing::info!(
                    resource = resource.as_str(),
                    mutation = label,
                    "Mutation succeeded",
                );
                self.invalidate_related(resource).await;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    resource = resource.as_str(),
                    mutation = label,
                    error = %e,
                    "Mutation failed, rolling back",
                );
                for applied in receipts.into_iter().rev() {
                    cache.rollback(applied).await;
                }
                self.notifier.error(label, e.user_message()).await;
                Err(AppError::Api(e))
            }
        }
    }
}
