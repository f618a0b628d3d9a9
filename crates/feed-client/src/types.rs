//! Wire types for the realtime change feed.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the server when a subscription is acknowledged.
pub type SubscriptionId = u64;

/// Kind of database change a subscription can watch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeEventKind {
    /// Row insertion.
    Insert,
    /// Row update.
    Update,
    /// Row deletion.
    Delete,
}

impl ChangeEventKind {
    /// Wire representation of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeEventKind::Insert => "INSERT",
            ChangeEventKind::Update => "UPDATE",
            ChangeEventKind::Delete => "DELETE",
        }
    }
}

/// Server-side filter applied to a change subscription.
///
/// Only rows from `table` changed by `event` are delivered.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    /// Change kind to listen for.
    pub event: ChangeEventKind,
    /// Table whose changes are delivered.
    pub table: String,
}

impl ChangeFilter {
    /// Filter for INSERTs on the given table.
    pub fn inserts(table: impl Into<String>) -> Self {
        Self {
            event: ChangeEventKind::Insert,
            table: table.into(),
        }
    }
}

/// A water alert row as inserted by the ingest service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Row ID, if the server includes it.
    #[serde(default)]
    pub id: Option<i64>,

    /// Measured water level in meters.
    pub water_level: f64,

    /// When the reading was recorded (RFC 3339), if included.
    #[serde(default)]
    pub recorded_at: Option<String>,
}

/// Acknowledgement frame sent once the server has registered a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedFrame {
    /// Server-assigned subscription ID.
    pub subscription_id: SubscriptionId,
}

/// A change frame carrying one database event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeFrame {
    /// Table the change happened in.
    #[serde(default)]
    pub table: String,

    /// Change kind ("INSERT", "UPDATE", "DELETE").
    #[serde(default)]
    pub event_type: String,

    /// The affected row.
    pub record: serde_json::Value,
}
