//! Alert banners and post-success dialogs.
//!
//! [`Notifier`] fans every [`Notice`] out over a `tokio::sync::broadcast`
//! channel to whatever view is listening, and keeps the most recent ones so
//! a view that subscribes late can still render them.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use stockroom_core::relocation::{MissingData, Side};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// How many notices [`Notifier::recent`] keeps.
const HISTORY_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(level: AlertLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// One holder's missing fields inside a [`MissingDataDialog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDataEntry {
    pub side: Side,
    pub holder: String,
    /// Human-readable field labels, e.g. "Personal Email".
    pub fields: Vec<String>,
}

/// Shown after a successful relocation whose endpoints lack shipping data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDataDialog {
    pub title: String,
    pub entries: Vec<MissingDataEntry>,
}

impl MissingDataDialog {
    /// `None` when there is nothing to report.
    pub fn from_missing<'a, I>(missing: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a MissingData>,
    {
        let mut entries: Vec<MissingDataEntry> = Vec::new();
        for gap in missing {
            let labels: Vec<String> = gap.fields.iter().map(|f| f.label().to_string()).collect();
            match entries
                .iter_mut()
                .find(|e| e.holder == gap.holder && e.side == gap.side)
            {
                Some(entry) => {
                    for label in labels {
                        if !entry.fields.contains(&label) {
                            entry.fields.push(label);
                        }
                    }
                }
                None => entries.push(MissingDataEntry {
                    side: gap.side,
                    holder: gap.holder.clone(),
                    fields: labels,
                }),
            }
        }
        (!entries.is_empty()).then(|| Self {
            title: "Missing shipping data".to_string(),
            entries,
        })
    }

    /// Every missing field label across all entries.
    pub fn field_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.fields.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Alert(Alert),
    MissingData(MissingDataDialog),
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

pub struct Notifier {
    sender: broadcast::Sender<Notice>,
    history: RwLock<VecDeque<Notice>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            history: RwLock::new(VecDeque::with_capacity(HISTORY_LEN)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub async fn publish(&self, notice: Notice) {
        {
            let mut history = self.history.write().await;
            if history.len() == HISTORY_LEN {
                history.pop_front();
            }
            history.push_back(notice.clone());
        }
        // A send error only means nobody is subscribed.
        let _ = self.sender.send(notice);
    }

    pub async fn success(&self, title: &str, message: impl Into<String>) {
        self.publish(Notice::Alert(Alert::new(AlertLevel::Success, title, message)))
            .await;
    }

    pub async fn error(&self, title: &str, message: impl Into<String>) {
        self.publish(Notice::Alert(Alert::new(AlertLevel::Error, title, message)))
            .await;
    }

    pub async fn missing_data(&self, dialog: MissingDataDialog) {
        self.publish(Notice::MissingData(dialog)).await;
    }

    /// Most recent notices, oldest first.
    pub async fn recent(&self) -> Vec<Notice> {
        self.history.read().await.iter().cloned().collect()
    }

    /// The last alert published, if any.
    pub async fn last_alert(&self) -> Option<Alert> {
        self.history
            .read()
            .await
            .iter()
            .rev()
            .find_map(|n| match n {
                Notice::Alert(a) => Some(a.clone()),
                Notice::MissingData(_) => None,
            })
    }

    pub async fn last_dialog(&self) -> Option<MissingDataDialog> {
        self.history
            .read()
            .await
            .iter()
            .rev()
            .find_map(|n| match n {
                Notice::MissingData(d) => Some(d.clone()),
                Notice::Alert(_) => None,
            })
    }
}
