//! The state payload the router attaches to native history entries.
//!
//! The platform's history stack is the source of truth: the router never keeps
//! a parallel list of entries. Each entry carries a [`HistoryEntry`] as JSON,
//! which survives back/forward traversal the same way browser
//! `history.state` does.
//!
//! ```
//! use spa_navigator::{HistoryEntry, ScrollPosition};
//!
//! let mut entry = HistoryEntry::new(1, false).with_scroll_to_id("comments");
//! entry.scroll_position = Some(ScrollPosition::new(0.0, 480.0));
//!
//! let state = entry.to_state();
//! assert_eq!(state["blockPageScroll"], false);
//! assert_eq!(HistoryEntry::from_state(&state), Some(entry));
//! ```

use crate::debug_log;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scroll offset in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    /// The document origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Router metadata stored in one native history entry.
///
/// Created when the entry is pushed; `scroll_position` is filled in while the
/// entry is active (debounced scrolling) or when navigating away from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Router-managed depth of this entry; 0 is the page the browser loaded.
    #[serde(default)]
    pub index: usize,
    /// The matched route blocked page scrolling.
    pub block_page_scroll: bool,
    /// Element to center when returning to this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_to_id: Option<String>,
    /// Last captured scroll offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<ScrollPosition>,
}

impl HistoryEntry {
    pub fn new(index: usize, block_page_scroll: bool) -> Self {
        Self {
            index,
            block_page_scroll,
            scroll_to_id: None,
            scroll_position: None,
        }
    }

    pub fn with_scroll_to_id(mut self, id: impl Into<String>) -> Self {
        self.scroll_to_id = Some(id.into());
        self
    }

    /// Serialize to the JSON payload handed to the platform.
    pub fn to_state(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Read a platform payload back.
    ///
    /// Returns `None` for payloads the router did not write (missing
    /// `blockPageScroll`, wrong types, non-objects).
    pub fn from_state(state: &Value) -> Option<Self> {
        match serde_json::from_value(state.clone()) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug_log!("History state is not a router entry: {}", err);
                None
            }
        }
    }
}
