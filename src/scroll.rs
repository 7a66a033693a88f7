//! Scroll capture, restoration, and element centering.
//!
//! Free scrolling is debounced: each scroll event hands out a new
//! [`ScrollTicket`] and the host settles it after [`SCROLL_DEBOUNCE`]. Only the
//! ticket of the most recent event still writes the scroll offset into the
//! active history entry, so a burst of scroll events results in one
//! non-navigating history replace.
//!
//! ```
//! use spa_navigator::scroll::ScrollTracker;
//!
//! let tracker = ScrollTracker::new();
//! let first = tracker.on_scroll();
//! let second = tracker.on_scroll();
//! assert!(!tracker.is_latest(first));
//! assert!(tracker.is_latest(second));
//! ```

use crate::error::NavigationError;
use crate::history::{HistoryEntry, ScrollPosition};
use crate::platform::Platform;
use crate::{error_log, trace_log};
use std::cell::Cell;
use std::time::Duration;

/// Quiet period after the last scroll event before its offset is saved.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(250);

/// Where to scroll after a navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// The document origin.
    Origin,
    /// A previously captured offset.
    Position(ScrollPosition),
    /// Center the element with this id in the viewport.
    Element(String),
}

/// Scroll offset that centers element `id` in the viewport.
///
/// The offset is the element's document position minus half the viewport,
/// clamped at zero on both axes.
pub fn centered_position_of<P: Platform + ?Sized>(
    platform: &P,
    id: &str,
) -> Result<ScrollPosition, NavigationError> {
    let Some(rect) = platform.element_rect(id) else {
        error_log!("Element id \"{}\" doesn't exist in the page", id);
        return Err(NavigationError::MissingScrollTarget { id: id.to_string() });
    };

    let scrolled = platform.scroll_position();
    let viewport = platform.viewport();

    let x = rect.left + scrolled.x - viewport.width / 2.0;
    let y = rect.top + scrolled.y - viewport.height / 2.0;

    Ok(ScrollPosition::new(x.max(0.0), y.max(0.0)))
}

/// Save the current scroll offset into the active history entry.
///
/// Does nothing (and returns `false`) when the active entry carries no router
/// state, e.g. before the router stamped the initial entry.
pub fn capture_scroll<P: Platform + ?Sized>(platform: &P) -> bool {
    let Some(mut entry) = platform
        .history_state()
        .as_ref()
        .and_then(HistoryEntry::from_state)
    else {
        return false;
    };

    let position = platform.scroll_position();
    entry.scroll_position = Some(position);
    platform.replace_state(Some(entry.to_state()), &platform.location());
    trace_log!(
        "Captured scroll ({}, {}) into entry #{}",
        position.x,
        position.y,
        entry.index
    );
    true
}

/// Scroll to `target`, returning the offset that was applied.
pub fn restore_scroll<P: Platform + ?Sized>(
    platform: &P,
    target: &ScrollTarget,
) -> Result<ScrollPosition, NavigationError> {
    let position = match target {
        ScrollTarget::Origin => ScrollPosition::ORIGIN,
        ScrollTarget::Position(position) => *position,
        ScrollTarget::Element(id) => centered_position_of(platform, id)?,
    };
    platform.scroll_to(position);
    Ok(position)
}

// ============================================================================
// Debounce bookkeeping
// ============================================================================

/// Identifies one scroll event for debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTicket(u64);

/// Tracks which scroll event is the most recent.
#[derive(Debug, Default)]
pub struct ScrollTracker {
    generation: Cell<u64>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll event; the returned ticket supersedes all earlier ones.
    pub fn on_scroll(&self) -> ScrollTicket {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        ScrollTicket(next)
    }

    /// Check whether no scroll event happened after `ticket`'s.
    pub fn is_latest(&self, ticket: ScrollTicket) -> bool {
        self.generation.get() == ticket.0
    }

    /// Debounce expiry for `ticket`: capture only if it is still the latest.
    pub fn settle<P: Platform + ?Sized>(&self, platform: &P, ticket: ScrollTicket) -> bool {
        if !self.is_latest(ticket) {
            trace_log!("Scroll ticket {:?} superseded", ticket);
            return false;
        }
        capture_scroll(platform)
    }
}
