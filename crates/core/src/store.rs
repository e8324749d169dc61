//! Optimistic command store.
//!
//! Every local list is a cache of server truth. A mutation is applied as a
//! [`Command`] before the server answers; the returned [`Applied`] receipt
//! carries the pre-command state of the touched record so the command can be
//! undone on failure. Receipts undo only their own record, so rolling back
//! one command leaves other in-flight commands intact.
//!
//! Updates to the same record stack. Rolling back an update that a newer
//! in-flight update sits on top of keeps the newer state and hands the
//! older baseline down to it, so the record only reverts once every update
//! above the baseline has failed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::member::Member;
use crate::office::Office;
use crate::product::Product;
use crate::shipment::Shipment;
use crate::team::Team;
use crate::types::EntityId;

/// A record kept in an [`EntityStore`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Lower-case entity name used in errors and logs.
    const KIND: &'static str;

    fn entity_id(&self) -> &str;

    fn set_entity_id(&mut self, id: EntityId);
}

macro_rules! impl_entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn entity_id(&self) -> &str {
                &self.id
            }

            fn set_entity_id(&mut self, id: EntityId) {
                self.id = id;
            }
        }
    };
}

impl_entity!(Product, "product");
impl_entity!(Member, "member");
impl_entity!(Shipment, "shipment");
impl_entity!(Office, "office");
impl_entity!(Team, "team");

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Command<T> {
    /// Insert a record, usually carrying a temporary id.
    Create(T),
    /// Replace the record with the same id.
    Update(T),
    Delete(EntityId),
}

impl<T: Entity> Command<T> {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Create(_) => CommandKind::Create,
            Self::Update(_) => CommandKind::Update,
            Self::Delete(_) => CommandKind::Delete,
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            Self::Create(item) | Self::Update(item) => item.entity_id(),
            Self::Delete(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Update,
    Delete,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Undo<T> {
    /// Undo a create.
    Remove(EntityId),
    /// Undo an update.
    Restore(T),
    /// Undo a delete.
    Reinsert { index: usize, item: T },
}

/// Receipt for an applied command, holding what is needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub kind: CommandKind,
    pub entity_id: EntityId,
    pub applied_at: DateTime<Utc>,
    seq: u64,
    undo: Undo<T>,
}

impl<T> Applied<T> {
    /// The record as it was before the command, when there was one.
    pub fn original(&self) -> Option<&T> {
        match &self.undo {
            Undo::Remove(_) => None,
            Undo::Restore(item) | Undo::Reinsert { item, .. } => Some(item),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// An in-flight update and the state it replaced.
#[derive(Debug, Clone)]
struct UpdateLayer<T> {
    seq: u64,
    baseline: T,
}

/// Ordered, id-unique list of records.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    items: Vec<T>,
    /// Outstanding updates per record, oldest first.
    layers: HashMap<EntityId, Vec<UpdateLayer<T>>>,
    next_seq: u64,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            layers: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.entity_id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.entity_id() == id)
    }

    fn not_found(id: &str) -> CoreError {
        CoreError::NotFound {
            entity: T::KIND,
            id: id.to_string(),
        }
    }

    /// Apply a command and return its undo receipt.
    pub fn apply(&mut self, command: Command<T>) -> Result<Applied<T>, CoreError> {
        let kind = command.kind();
        let entity_id = command.target_id().to_string();
        let seq = self.next_seq;

        let undo = match command {
            Command::Create(item) => {
                if self.position(item.entity_id()).is_some() {
                    return Err(CoreError::Conflict(format!(
                        "{} {} already exists",
                        T::KIND,
                        item.entity_id()
                    )));
                }
                self.items.push(item);
                Undo::Remove(entity_id.clone())
            }
            Command::Update(item) => {
                let index = self
                    .position(item.entity_id())
                    .ok_or_else(|| Self::not_found(&entity_id))?;
                let original = std::mem::replace(&mut self.items[index], item);
                self.layers
                    .entry(entity_id.clone())
                    .or_default()
                    .push(UpdateLayer {
                        seq,
                        baseline: original.clone(),
                    });
                Undo::Restore(original)
            }
            Command::Delete(id) => {
                let index = self.position(&id).ok_or_else(|| Self::not_found(&id))?;
                let item = self.items.remove(index);
                Undo::Reinsert { index, item }
            }
        };

        self.next_seq += 1;
        Ok(Applied {
            kind,
            entity_id,
            applied_at: Utc::now(),
            seq,
            undo,
        })
    }

    /// Undo a previously applied command.
    pub fn rollback(&mut self, applied: Applied<T>) {
        match applied.undo {
            Undo::Remove(id) => self.items.retain(|i| i.entity_id() != id),
            Undo::Restore(original) => {
                let Some(baseline) = self.unstack(&applied.entity_id, applied.seq, original) else {
                    return;
                };
                match self.position(baseline.entity_id()) {
                    Some(index) => self.items[index] = baseline,
                    None => self.items.push(baseline),
                }
            }
            Undo::Reinsert { index, item } => {
                if self.position(item.entity_id()).is_none() {
                    let index = index.min(self.items.len());
                    self.items.insert(index, item);
                }
            }
        }
    }

    /// Forget a command the server accepted. Its state becomes the baseline
    /// of any newer update on the same record.
    pub fn release(&mut self, applied: &Applied<T>) {
        if applied.kind != CommandKind::Update {
            return;
        }
        if let Some(stack) = self.layers.get_mut(&applied.entity_id) {
            stack.retain(|l| l.seq != applied.seq);
            if stack.is_empty() {
                self.layers.remove(&applied.entity_id);
            }
        }
    }

    /// Remove the update layer `seq` of `id`. Returns the state to restore,
    /// or `None` when a newer update still owns the record.
    fn unstack(&mut self, id: &str, seq: u64, fallback: T) -> Option<T> {
        let Some(stack) = self.layers.get_mut(id) else {
            return Some(fallback);
        };
        let Some(pos) = stack.iter().position(|l| l.seq == seq) else {
            return Some(fallback);
        };
        let layer = stack.remove(pos);
        let restore = if pos < stack.len() {
            stack[pos].baseline = layer.baseline;
            None
        } else {
            Some(layer.baseline)
        };
        if stack.is_empty() {
            self.layers.remove(id);
        }
        restore
    }

    /// Swap an optimistic record for the one the server returned.
    ///
    /// The server record keeps the optimistic record's position. If the
    /// optimistic record is gone the server record is appended.
    pub fn confirm(&mut self, provisional_id: &str, confirmed: T) {
        let existing = self.position(confirmed.entity_id());
        match (self.position(provisional_id), existing) {
            (Some(index), Some(dup)) if index != dup => {
                self.items[dup] = confirmed;
                self.items.remove(index);
            }
            (Some(index), _) => self.items[index] = confirmed,
            (None, Some(dup)) => self.items[dup] = confirmed,
            (None, None) => self.items.push(confirmed),
        }
    }

    /// Replace the contents with a fresh server list.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }
}
