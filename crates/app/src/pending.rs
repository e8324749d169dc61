//! Destructive actions waiting on a confirmation dialog.
//!
//! A view calls [`AppContext::request_confirmation`] to stage an action and
//! shows its prompt; the action runs only when the user confirms. At most
//! one action is pending per context, a new request replaces the old one.

use stockroom_core::types::EntityId;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflows;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteProduct { id: EntityId, name: String },
    DeleteMember { id: EntityId, name: String },
    DeleteTeam { id: EntityId, name: String },
    CancelShipment { id: EntityId },
    DeleteShipment { id: EntityId },
}

impl PendingAction {
    /// Question to show in the confirmation dialog.
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteProduct { name, .. } => format!("Delete {name}? This cannot be undone."),
            Self::DeleteMember { name, .. } => format!("Delete member {name}? This cannot be undone."),
            Self::DeleteTeam { name, .. } => format!("Delete team {name}? Its members will be left without a team."),
            Self::CancelShipment { id } => format!("Cancel shipment {id}?"),
            Self::DeleteShipment { id } => format!("Delete shipment {id}? This cannot be undone."),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::DeleteProduct { .. } => "delete_product",
            Self::DeleteMember { .. } => "delete_member",
            Self::DeleteTeam { .. } => "delete_team",
            Self::CancelShipment { .. } => "cancel_shipment",
            Self::DeleteShipment { .. } => "delete_shipment",
        }
    }
}

impl AppContext {
    /// Stage `action` and return the prompt to show.
    pub async fn request_confirmation(&self, action: PendingAction) -> String {
        let prompt = action.prompt();
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.replace(action) {
            tracing::debug!(action = previous.label(), "Replaced pending action");
        }
        prompt
    }

    pub async fn pending_action(&self) -> Option<PendingAction> {
        self.pending.lock().await.clone()
    }

    /// Drop the staged action without running it.
    pub async fn cancel_pending(&self) -> Option<PendingAction> {
        self.pending.lock().await.take()
    }

    /// Run the staged action. Returns `Ok(false)` if nothing was pending.
    pub async fn confirm_pending(&self) -> AppResult<bool> {
        let Some(action) = self.pending.lock().await.take() else {
            return Ok(false);
        };
        tracing::info!(action = action.label(), "Confirmed pending action");
        match action {
            PendingAction::DeleteProduct { id, .. } => workflows::product::delete_product(self, &id).await?,
            PendingAction::DeleteMember { id, .. } => workflows::member::delete_member(self, &id).await?,
            PendingAction::DeleteTeam { id, .. } => workflows::team::delete_team(self, &id).await?,
            PendingAction::CancelShipment { id } => {
                workflows::shipment::cancel_shipment(self, &id).await?;
            }
            PendingAction::DeleteShipment { id } => workflows::shipment::delete_shipment(self, &id).await?,
        }
        Ok(true)
    }
}
